// Port for fetching current weather conditions
use crate::domain::weather::WeatherSample;
use async_trait::async_trait;
use thiserror::Error;

/// Everything that can go wrong with a single fetch attempt.
///
/// Errors carry only strings so they can be cached and replayed like a
/// successful sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Weather API error: request timed out after {0}s")]
    Timeout(u64),
    #[error("Weather API error: {0}")]
    Transport(String),
    #[error("Weather API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Weather API error: malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Issue exactly one request for current conditions. No retries.
    async fn fetch(&self) -> Result<WeatherSample, FetchError>;
}
