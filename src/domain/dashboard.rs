// Dashboard page models handed to the rendering surface
use super::weather::{ChartPoint, WeatherSample};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub markers: bool,
    pub points: Vec<ChartPoint>,
}

impl LineChart {
    pub fn new(title: String, x_label: String, y_label: String, points: Vec<ChartPoint>) -> Self {
        Self {
            title,
            x_label,
            y_label,
            markers: true,
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoRefreshStatus {
    pub enabled: bool,
    pub interval_secs: u64,
}

/// One rendered pass of the live weather page
#[derive(Debug, Clone, Serialize)]
pub struct WeatherPage {
    pub title: String,
    pub caption: String,
    pub last_refreshed: DateTime<Utc>,
    pub auto_refresh: AutoRefreshStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<LineChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<WeatherSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BioPage {
    pub title: String,
    pub name: String,
    pub program: String,
    pub intro: String,
    pub fun_facts: Vec<String>,
    pub photo_path: Option<String>,
}
