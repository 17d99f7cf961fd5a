// Application layer - Use cases and ports
pub mod live_weather_service;
pub mod pie_service;
pub mod refresh_driver;
pub mod result_cache;
pub mod session;
pub mod weather_source;

#[cfg(test)]
pub mod test_support;
