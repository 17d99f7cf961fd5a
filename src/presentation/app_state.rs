// Application state for HTTP handlers
use crate::application::live_weather_service::LiveWeatherService;
use crate::application::pie_service::PieService;
use crate::application::session::SessionStore;
use crate::domain::dashboard::BioPage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<LiveWeatherService>,
    pub pie_service: PieService,
    pub sessions: SessionStore,
    pub bio: BioPage,
}
