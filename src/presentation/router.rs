// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_bio, get_pie, get_weather, health_check, set_auto_refresh, stream_weather,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/bio", get(get_bio))
        .route("/pie", get(get_pie))
        .route("/weather", get(get_weather))
        .route("/weather/auto-refresh", post(set_auto_refresh))
        .route("/weather/stream", get(stream_weather))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
