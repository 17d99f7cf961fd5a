use crate::domain::dashboard::BioPage;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub weather: WeatherSettings,
    pub pie: PieSettings,
    pub bio: BioSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherSettings {
    pub api_base: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub history_cap: usize,
    pub default_refresh_secs: u64,
    pub session_idle_secs: u64,
    pub session_sweep_secs: u64,
}

impl WeatherSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn session_sweep(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PieSettings {
    pub csv_path: String,
    pub default_title: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BioSettings {
    pub name: String,
    pub program: String,
    pub intro: String,
    #[serde(default)]
    pub fun_facts: Vec<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
}

impl BioSettings {
    pub fn to_page(&self) -> BioPage {
        BioPage {
            title: "My Bio".to_string(),
            name: self.name.clone(),
            program: self.program.clone(),
            intro: self.intro.clone(),
            fun_facts: self.fun_facts.clone(),
            photo_path: self.photo_path.clone(),
        }
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("weather.api_base", "https://api.open-meteo.com/v1/forecast")?
        .set_default("weather.latitude", 39.7392)?
        .set_default("weather.longitude", -104.9903)?
        .set_default("weather.location_name", "Denver")?
        .set_default("weather.user_agent", "msudenver-dataviz-class/1.0")?
        .set_default("weather.timeout_secs", 10_i64)?
        .set_default("weather.cache_ttl_secs", 600_i64)?
        .set_default("weather.history_cap", 20_i64)?
        .set_default("weather.default_refresh_secs", 30_i64)?
        .set_default("weather.session_idle_secs", 900_i64)?
        .set_default("weather.session_sweep_secs", 60_i64)?
        .set_default("pie.csv_path", "data/pie_demo.csv")?
        .set_default("pie.default_title", "My Sample Pie Chart")?
        .set_default("bio.name", "Your Name")?
        .set_default("bio.program", "Your Program")?
        .set_default("bio.intro", "")
}

fn env_overrides() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Defaults, then `config/dashboard.*` if present, then `DASHBOARD__SECTION__KEY` env vars.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(env_overrides())
        .build()?;

    Ok(settings.try_deserialize()?)
}

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m";

/// Open-Meteo "current conditions" URL for the configured coordinates
pub fn current_weather_url(settings: &WeatherSettings) -> String {
    format!(
        "{}?latitude={}&longitude={}&current={}",
        settings.api_base.trim_end_matches('/'),
        settings.latitude,
        settings.longitude,
        CURRENT_FIELDS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> DashboardConfig {
        with_defaults(config::Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let loaded = defaults();

        assert_eq!(loaded.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(loaded.weather.timeout(), Duration::from_secs(10));
        assert_eq!(loaded.weather.cache_ttl(), Duration::from_secs(600));
        assert_eq!(loaded.weather.history_cap, 20);
        assert_eq!(loaded.weather.default_refresh_secs, 30);
        assert_eq!(loaded.weather.session_idle(), Duration::from_secs(900));
        assert_eq!(loaded.weather.session_sweep(), Duration::from_secs(60));
        assert_eq!(loaded.pie.csv_path, "data/pie_demo.csv");
        assert!(loaded.bio.fun_facts.is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [weather]
            location_name = "Boulder"
            cache_ttl_secs = 60

            [bio]
            name = "Ada"
            program = "Math"
            intro = "Hi"
            fun_facts = ["one", "two"]
        "#;
        let loaded: DashboardConfig = with_defaults(config::Config::builder())
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(loaded.weather.location_name, "Boulder");
        assert_eq!(loaded.weather.cache_ttl_secs, 60);
        assert_eq!(loaded.weather.latitude, 39.7392);
        assert_eq!(loaded.bio.fun_facts, vec!["one", "two"]);
    }

    #[test]
    fn test_env_overrides_file() {
        let toml = r#"
            [weather]
            location_name = "Boulder"
        "#;
        let mut env = config::Map::new();
        env.insert("DASHBOARD__WEATHER__LOCATION_NAME".to_string(), "Golden".to_string());
        env.insert("DASHBOARD__WEATHER__CACHE_TTL_SECS".to_string(), "60".to_string());
        env.insert("DASHBOARD__SERVER__BIND_ADDR".to_string(), "127.0.0.1:9000".to_string());
        env.insert("OTHER__WEATHER__LATITUDE".to_string(), "1.0".to_string());

        let loaded: DashboardConfig = with_defaults(config::Config::builder())
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .add_source(env_overrides().source(Some(env)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(loaded.weather.location_name, "Golden");
        assert_eq!(loaded.weather.cache_ttl(), Duration::from_secs(60));
        assert_eq!(loaded.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(loaded.weather.latitude, 39.7392);
    }

    #[test]
    fn test_current_weather_url() {
        let mut settings = defaults().weather;
        settings.api_base = "http://localhost:1234/v1/forecast/".to_string();

        assert_eq!(
            current_weather_url(&settings),
            "http://localhost:1234/v1/forecast?latitude=39.7392&longitude=-104.9903&current=temperature_2m,wind_speed_10m"
        );
    }
}
