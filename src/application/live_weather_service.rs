// Live weather service - one render pass: cache -> fetch -> history -> page
use crate::application::refresh_driver::{RefreshCycle, RefreshDriver, RefreshInterval, RefreshState};
use crate::application::session::Session;
use crate::application::weather_source::WeatherSource;
use crate::domain::dashboard::{AutoRefreshStatus, LineChart, WeatherPage};
use crate::domain::history::{AppendOutcome, WeatherHistory};
use crate::domain::weather::ChartPoint;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

const NO_DATA_MESSAGE: &str = "No weather data available yet.";

#[derive(Clone)]
pub struct LiveWeatherService {
    source: Arc<dyn WeatherSource>,
    location_name: String,
    cache_ttl: Duration,
    default_interval: RefreshInterval,
}

impl LiveWeatherService {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        location_name: String,
        cache_ttl: Duration,
        default_interval: RefreshInterval,
    ) -> Self {
        Self {
            source,
            location_name,
            cache_ttl,
            default_interval,
        }
    }

    /// Fetch (through the session's cache), record the sample and build the page.
    /// A failed fetch leaves the history untouched and is reported as a warning.
    pub async fn render_pass(&self, session: &Session) -> WeatherPage {
        let mut state = session.lock().await;
        let mut warning = None;

        match state.cache.get_or_fetch(self.source.as_ref(), self.cache_ttl).await {
            Ok(sample) => {
                let timestamp = sample.timestamp;
                let outcome = state.history.append(sample);
                match outcome {
                    AppendOutcome::Appended { evicted } => tracing::debug!(
                        "Session {}: appended sample at {} ({} in history, evicted {})",
                        session.id(),
                        timestamp,
                        state.history.len(),
                        evicted
                    ),
                    AppendOutcome::Duplicate => tracing::debug!(
                        "Session {}: sample at {} already recorded",
                        session.id(),
                        timestamp
                    ),
                }
            }
            Err(e) => {
                tracing::warn!("Session {}: {}", session.id(), e);
                warning = Some(e.to_string());
            }
        }

        self.build_page(&state.history, session.refresh(), warning)
    }

    pub async fn invalidate(&self, session: &Session) {
        session.lock().await.cache.invalidate();
    }

    /// Flip the session's auto-refresh toggle and return the resulting status.
    pub fn set_auto_refresh(
        self: &Arc<Self>,
        session: Arc<Session>,
        enabled: bool,
        interval_secs: Option<u64>,
    ) -> AutoRefreshStatus {
        let requested = interval_secs.map(RefreshInterval::from_secs);
        if enabled {
            let interval = requested
                .or(session.refresh().chosen_interval())
                .unwrap_or(self.default_interval);
            let cycle = Arc::new(SessionRefresh {
                service: self.clone(),
                session: session.clone(),
            });
            session.refresh().enable(interval, cycle);
        } else {
            session.refresh().disable();
            if let Some(interval) = requested {
                session.refresh().remember(interval);
            }
        }

        self.auto_refresh_status(session.refresh())
    }

    fn auto_refresh_status(&self, refresh: &RefreshDriver) -> AutoRefreshStatus {
        match refresh.state() {
            RefreshState::Idle => AutoRefreshStatus {
                enabled: false,
                interval_secs: refresh
                    .chosen_interval()
                    .unwrap_or(self.default_interval)
                    .as_secs(),
            },
            RefreshState::Cycling { interval } => AutoRefreshStatus {
                enabled: true,
                interval_secs: interval.as_secs(),
            },
        }
    }

    fn build_page(
        &self,
        history: &WeatherHistory,
        refresh: &RefreshDriver,
        warning: Option<String>,
    ) -> WeatherPage {
        let (chart, info) = if history.is_empty() {
            (None, Some(NO_DATA_MESSAGE.to_string()))
        } else {
            let points = history.snapshot().iter().map(ChartPoint::from).collect();
            let chart = LineChart::new(
                format!("Live Temperature in {}", self.location_name),
                "time".to_string(),
                "temperature (C)".to_string(),
                points,
            );
            (Some(chart), None)
        };

        WeatherPage {
            title: format!("Live Weather in {}", self.location_name),
            caption: "Using the Open-Meteo API - auto-refreshing line chart of temperature over time."
                .to_string(),
            last_refreshed: Utc::now(),
            auto_refresh: self.auto_refresh_status(refresh),
            warning,
            info,
            chart,
            latest: history.latest().cloned(),
        }
    }
}

/// Binds the refresh driver's tick to one session's render pass.
struct SessionRefresh {
    service: Arc<LiveWeatherService>,
    session: Arc<Session>,
}

#[async_trait]
impl RefreshCycle for SessionRefresh {
    async fn invalidate(&self) {
        self.service.invalidate(&self.session).await;
    }

    async fn render(&self) {
        let page = self.service.render_pass(&self.session).await;
        self.session.publish(page);
    }
}
