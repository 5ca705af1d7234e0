use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinates, WeatherError};
use crate::provider::{ForecastApi, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Field selections sent with every forecast request. The response echoes
/// these as parallel arrays (daily) and a flat object (current).
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";
const CURRENT_FIELDS: &str =
    "temperature_2m,weather_code,wind_speed_10m,precipitation,rain,relative_humidity_2m";

/// Open-Meteo forecast client.
///
/// Unlike the geocoder, failures here are surfaced to the caller: a report
/// without weather data is useless, so there is nothing to substitute.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timezone: timezone.into(),
        }
    }
}

#[async_trait]
impl ForecastApi for OpenMeteoClient {
    async fn fetch(&self, coords: Coordinates) -> Result<OpenMeteoResponse, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("daily", DAILY_FIELDS),
                ("current", CURRENT_FIELDS),
                ("timezone", self.timezone.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OpenMeteoResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

/// Raw forecast payload: a `current` object plus `daily` parallel arrays.
/// The `*_units` blocks ride along but nothing downstream reads them.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub current: CurrentBlock,
    #[serde(default)]
    pub current_units: CurrentUnits,
    pub daily: DailyBlock,
    #[serde(default)]
    pub daily_units: DailyUnits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBlock {
    #[serde(default)]
    pub time: String,
    pub temperature_2m: f64,
    pub weather_code: i32,
    pub wind_speed_10m: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub relative_humidity_2m: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentUnits {
    #[serde(default)]
    pub temperature_2m: String,
    #[serde(default)]
    pub weather_code: String,
    #[serde(default)]
    pub wind_speed_10m: String,
    #[serde(default)]
    pub precipitation: String,
    #[serde(default)]
    pub rain: String,
    #[serde(default)]
    pub relative_humidity_2m: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub weather_code: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyUnits {
    #[serde(default)]
    pub temperature_2m_max: String,
    #[serde(default)]
    pub temperature_2m_min: String,
    #[serde(default)]
    pub weather_code: String,
}
