use crate::model::{Coordinates, WeatherError};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod geocoding;
pub mod open_meteo;

pub use geocoding::GeocodingClient;
pub use open_meteo::OpenMeteoClient;

const TIMEOUT_SECS: u64 = 10;

/// Name → coordinates lookup.
///
/// Implemented by [`GeocodingClient`] over HTTP; tests substitute fakes
/// since the client is injected rather than reached through a global.
#[async_trait]
pub trait GeocodingApi: Send + Sync + Debug {
    async fn geocode(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<geocoding::GeocodingResponse, WeatherError>;
}

/// Coordinates → raw forecast payload.
#[async_trait]
pub trait ForecastApi: Send + Sync + Debug {
    async fn fetch(
        &self,
        coords: Coordinates,
    ) -> Result<open_meteo::OpenMeteoResponse, WeatherError>;
}

/// Build the HTTP client shared by both provider clients.
///
/// Connect and overall request timeouts are bounded at 10 seconds; a
/// timed-out call is a plain provider failure, never retried here.
pub fn http_client() -> Result<Client, WeatherError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(TIMEOUT_SECS))
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()?;

    Ok(client)
}

/// Keep provider error bodies readable when they end up in error messages.
/// The cut must land on a char boundary; error pages are not always ASCII.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_leaves_short_bodies_alone() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_body_backs_off_to_a_char_boundary() {
        // 199 ASCII bytes put the cut point inside the first multibyte char.
        let body = format!("{}天気予報エラー", "x".repeat(199));
        let truncated = truncate_body(&body);
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));
    }

    #[test]
    fn truncate_body_keeps_multibyte_chars_that_fit() {
        let body = "天".repeat(100); // 300 bytes, boundary at 198
        let truncated = truncate_body(&body);
        assert_eq!(truncated, format!("{}...", "天".repeat(66)));
    }
}
