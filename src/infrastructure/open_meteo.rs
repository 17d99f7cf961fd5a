// Open-Meteo client - current conditions for one fixed location
use crate::application::weather_source::{FetchError, WeatherSource};
use crate::domain::weather::WeatherSample;
use crate::infrastructure::config::{current_weather_url, WeatherSettings};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::ACCEPT;
use serde::Deserialize;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    url: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    time: String,
    temperature_2m: f64,
    wind_speed_10m: f64,
}

impl OpenMeteoClient {
    pub fn new(settings: &WeatherSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build weather HTTP client")?;

        Ok(Self {
            client,
            url: current_weather_url(settings),
            timeout_secs: settings.timeout_secs,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(&self) -> Result<WeatherSample, FetchError> {
        tracing::debug!("Fetching current weather: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        let current = parsed.current;
        let timestamp = parse_observation_time(&current.time)?;

        Ok(WeatherSample::new(
            timestamp,
            current.temperature_2m,
            current.wind_speed_10m,
        ))
    }
}

/// Accepts RFC 3339 or Open-Meteo's offset-less `YYYY-MM-DDTHH:MM[:SS]`, read as UTC.
fn parse_observation_time(raw: &str) -> Result<DateTime<Utc>, FetchError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(time.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FetchError::Malformed(format!("unrecognised time {:?}", raw)))
}
