// Shared fakes for application-layer tests
use crate::application::weather_source::{FetchError, WeatherSource};
use crate::domain::weather::WeatherSample;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn sample_at(minute: i64) -> WeatherSample {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    WeatherSample::new(base + Duration::minutes(minute), 5.0 + minute as f64, 3.2)
}

/// Replays scripted results in order and counts calls.
pub struct StubSource {
    results: Mutex<VecDeque<Result<WeatherSample, FetchError>>>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(results: Vec<Result<WeatherSample, FetchError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for StubSource {
    async fn fetch(&self) -> Result<WeatherSample, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("stub exhausted".to_string())))
    }
}
