// Single-slot TTL cache in front of a WeatherSource
use crate::application::weather_source::{FetchError, WeatherSource};
use crate::domain::weather::WeatherSample;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Result<WeatherSample, FetchError>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() <= ttl
    }
}

/// Memoizes the last fetch result, errors included, until it is older than the TTL.
#[derive(Debug, Default)]
pub struct ResultCache {
    slot: Option<CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch(
        &mut self,
        source: &dyn WeatherSource,
        ttl: Duration,
    ) -> Result<WeatherSample, FetchError> {
        if let Some(entry) = self.slot.as_ref().filter(|e| e.is_fresh(ttl)) {
            tracing::debug!(
                "Weather cache hit (age {:?}, ok={})",
                entry.fetched_at.elapsed(),
                entry.value.is_ok()
            );
            return entry.value.clone();
        }

        tracing::debug!("Weather cache miss, fetching");
        let value = source.fetch().await;
        self.slot = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        value
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
