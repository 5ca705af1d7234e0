use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latitude/longitude pair in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// How WMO snow codes (71-77, 85, 86) are classified.
///
/// The canonical table folds snow into [`Condition::Rainy`]; a deployment
/// that wants a dedicated snow category flips this in its config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnowHandling {
    #[default]
    Rainy,
    Snowy,
}

/// Closed set of sky/precipitation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Unknown,
}

impl Condition {
    /// Classify a WMO weather code as reported by Open-Meteo.
    /// See <https://open-meteo.com/en/docs> for the code table.
    ///
    /// Total over all integers: codes outside the table are an expected
    /// case and map to [`Condition::Unknown`], never an error.
    pub fn from_weather_code(code: i32, snow: SnowHandling) -> Self {
        match code {
            0 | 1 => Self::Sunny,                // Clear sky, mainly clear
            2 => Self::PartlyCloudy,             // Partly cloudy
            3 => Self::Cloudy,                   // Overcast
            45 | 48 => Self::Cloudy,             // Fog and depositing rime fog
            51 | 53 | 55 => Self::Rainy,         // Drizzle
            56 | 57 => Self::Rainy,              // Freezing drizzle
            61 | 63 | 65 => Self::Rainy,         // Rain
            66 | 67 => Self::Rainy,              // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => match snow {
                SnowHandling::Rainy => Self::Rainy,
                SnowHandling::Snowy => Self::Snowy,
            },
            80 | 81 | 82 => Self::Rainy,         // Rain showers
            95 | 96 | 99 => Self::Stormy,        // Thunderstorm
            _ => Self::Unknown,
        }
    }

    /// Classify rainfall intensity (mm/h) when no weather code is available.
    ///
    /// Bands are half-open on the upper bound, so exactly 1.0 mm/h is
    /// `Cloudy` and exactly 20.0 mm/h is `Stormy`. Negative or NaN input
    /// is a data error and degrades to `Unknown`.
    pub fn from_rainfall(mm_per_hour: f64) -> Self {
        if mm_per_hour.is_nan() || mm_per_hour < 0.0 {
            return Self::Unknown;
        }

        if mm_per_hour == 0.0 {
            Self::Sunny
        } else if mm_per_hour < 1.0 {
            Self::PartlyCloudy
        } else if mm_per_hour < 3.0 {
            Self::Cloudy
        } else if mm_per_hour < 20.0 {
            Self::Rainy
        } else {
            Self::Stormy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::PartlyCloudy => "partly cloudy",
            Condition::Cloudy => "cloudy",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
            Condition::Stormy => "stormy",
            Condition::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instantaneous conditions at the requested location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// °C, rounded to the nearest integer (half away from zero).
    pub temperature: i32,
    /// Relative humidity, 0-100 percent.
    pub humidity: u8,
    /// m/s.
    pub wind_speed: f64,
    /// mm/h.
    pub rainfall: f64,
    pub condition: Condition,
}

/// One day of the multi-day outlook, in the order the provider returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Provider-supplied date label, e.g. "2023-10-26". Opaque to the core.
    pub date: String,
    pub max_temperature: i32,
    pub min_temperature: i32,
    pub condition: Condition,
}

/// Fully assembled output of one pipeline invocation.
///
/// Constructed populated or not at all; a failed invocation yields a
/// [`WeatherError`] instead of a partial report. `city` echoes the name the
/// caller asked for, not whatever the geocoder resolved it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub current: CurrentConditions,
    pub daily_forecasts: Vec<DailyForecast>,
}

/// Failure modes of a provider call.
///
/// Only the weather fetch surfaces these to the pipeline's caller; the
/// location resolver absorbs its own provider errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
}
