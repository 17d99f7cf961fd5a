// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::live_weather_service::LiveWeatherService;
use crate::application::pie_service::PieService;
use crate::application::refresh_driver::RefreshInterval;
use crate::application::session::SessionStore;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::open_meteo::OpenMeteoClient;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load dashboard configuration")?;

    // Weather source (infrastructure layer)
    let weather_source = Arc::new(OpenMeteoClient::new(&config.weather)?);

    // Services (application layer)
    let weather_service = Arc::new(LiveWeatherService::new(
        weather_source,
        config.weather.location_name.clone(),
        config.weather.cache_ttl(),
        RefreshInterval::from_secs(config.weather.default_refresh_secs),
    ));
    let pie_service = PieService::new(
        config.pie.csv_path.clone().into(),
        config.pie.default_title.clone(),
    );

    // Sessions are released once abandoned, which also stops their auto-refresh
    let sessions = SessionStore::new(config.weather.history_cap, config.weather.session_idle());
    sessions.spawn_idle_sweeper(config.weather.session_sweep());

    let state = Arc::new(AppState {
        weather_service,
        pie_service,
        sessions,
        bio: config.bio.to_page(),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    tracing::info!(
        "Starting live-dashboard on {} (weather for {})",
        config.server.bind_addr,
        config.weather.location_name
    );

    axum::serve(listener, router).await?;

    Ok(())
}
