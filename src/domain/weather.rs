// Weather domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One observation of current conditions, identified by its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub wind_speed: f64,
}

impl WeatherSample {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, wind_speed: f64) -> Self {
        Self {
            timestamp,
            temperature,
            wind_speed,
        }
    }
}

/// A single (x, y) pair on a time-axis chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: DateTime<Utc>,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: DateTime<Utc>, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<&WeatherSample> for ChartPoint {
    fn from(sample: &WeatherSample) -> Self {
        Self::new(sample.timestamp, sample.temperature)
    }
}
