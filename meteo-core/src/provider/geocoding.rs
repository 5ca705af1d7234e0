use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinates, WeatherError};
use crate::provider::{GeocodingApi, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://geocoding.geo.census.gov/geocoder";

/// Forward-geocoding client: free-text place name to coordinates.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    base_url: String,
}

impl GeocodingClient {
    /// `base_url` is the provider root without the endpoint path, so tests
    /// can point this at a local mock server.
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GeocodingApi for GeocodingClient {
    async fn geocode(&self, address: &str, limit: u32) -> Result<GeocodingResponse, WeatherError> {
        let url = format!(
            "{}/geocoding/v1/forward",
            self.base_url.trim_end_matches('/')
        );
        let limit = limit.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[("address", address), ("limit", limit.as_str())])
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

        let parsed: GeocodingResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    pub results: Vec<GeocodingResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    #[serde(default)]
    pub name: String,
    pub geometry: Geometry,
}

impl GeocodingResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.geometry.latitude,
            longitude: self.geometry.longitude,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}
