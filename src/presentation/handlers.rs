// HTTP request handlers
use crate::application::session::DEFAULT_SESSION_ID;
use crate::domain::dashboard::{AutoRefreshStatus, BioPage, WeatherPage};
use crate::domain::pie::PiePage;
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

pub const SESSION_HEADER: &str = "x-session-id";
const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Deserialize)]
pub struct PieQuery {
    pub title: Option<String>,
    pub category: Option<String>,
    pub value: Option<String>,
}

#[derive(Deserialize)]
pub struct AutoRefreshRequest {
    pub enabled: bool,
    pub interval_secs: Option<u64>,
}

/// Session id from the `x-session-id` header, or the shared default session.
fn session_id(headers: &HeaderMap) -> Result<String, AppError> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(DEFAULT_SESSION_ID.to_string());
    };

    let id = value
        .to_str()
        .map_err(|_| AppError::BadRequest("session id must be visible ASCII".to_string()))?
        .trim();

    if id.is_empty() {
        return Ok(DEFAULT_SESSION_ID.to_string());
    }
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(AppError::BadRequest(format!(
            "session id longer than {} characters",
            MAX_SESSION_ID_LEN
        )));
    }

    Ok(id.to_string())
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_bio(State(state): State<Arc<AppState>>) -> Json<BioPage> {
    Json(state.bio.clone())
}

pub async fn get_pie(
    Query(query): Query<PieQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PiePage>, AppError> {
    let page = state
        .pie_service
        .render(query.title, query.category.as_deref(), query.value.as_deref())
        .await?;
    Ok(Json(page))
}

/// One render pass for the caller's session
pub async fn get_weather(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WeatherPage>, AppError> {
    let session = state.sessions.get_or_create(&session_id(&headers)?).await;
    Ok(Json(state.weather_service.render_pass(&session).await))
}

pub async fn set_auto_refresh(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutoRefreshRequest>,
) -> Result<Json<AutoRefreshStatus>, AppError> {
    let session = state.sessions.get_or_create(&session_id(&headers)?).await;
    let status =
        state
            .weather_service
            .set_auto_refresh(session, request.enabled, request.interval_secs);
    Ok(Json(status))
}

/// Server-sent events carrying every page rendered by the session's auto-refresh
pub async fn stream_weather(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let session = state.sessions.get_or_create(&session_id(&headers)?).await;
    let mut rx = session.subscribe();
    let session_id = session.id().to_string();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(page) => match Event::default().event("weather").json_data(&page) {
                    Ok(event) => yield Ok::<Event, Infallible>(event),
                    Err(e) => tracing::warn!("Failed to encode weather event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Stream for session {} skipped {} pages", session_id, skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
