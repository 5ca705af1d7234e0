use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::{
    Condition, CurrentConditions, DailyForecast, SnowHandling, WeatherError, WeatherReport,
};
use crate::provider::ForecastApi;
use crate::provider::open_meteo::{DailyBlock, OpenMeteoResponse};
use crate::resolver::{DEFAULT_CITIES, LocationResolver};

/// Configuration-level variations between the two report shapes this
/// pipeline has to produce: with or without the multi-day outlook, and
/// with snow folded into rain or kept separate.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub snow_handling: SnowHandling,
    pub include_daily: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            snow_handling: SnowHandling::default(),
            include_daily: true,
        }
    }
}

/// Orchestrates one city-name → report resolution.
///
/// Each invocation is stateless and sequential: resolve coordinates
/// (infallible), fetch the forecast (the only fallible step, one attempt,
/// no retry), classify and round, assemble. Retrying is the caller's
/// re-invocation, not a loop in here.
#[derive(Debug)]
pub struct ForecastPipeline {
    resolver: LocationResolver,
    forecast: Box<dyn ForecastApi>,
    options: PipelineOptions,
}

impl ForecastPipeline {
    pub fn new(
        resolver: LocationResolver,
        forecast: Box<dyn ForecastApi>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            resolver,
            forecast,
            options,
        }
    }

    /// Resolve `city` to a fully populated report, or fail with the
    /// forecast provider's error. Never returns a partial report, and
    /// never fabricates data on failure.
    pub async fn get_weather_for_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let coords = self.resolver.resolve(city).await;
        tracing::debug!(city, coords.latitude, coords.longitude, "fetching forecast");

        let raw = self.forecast.fetch(coords).await?;
        Ok(self.build_report(city, &raw))
    }

    /// Fixed, ordered list of cities shown before the user types anything.
    pub fn default_cities(&self) -> Vec<String> {
        DEFAULT_CITIES.iter().map(|city| city.to_string()).collect()
    }

    fn build_report(&self, city: &str, raw: &OpenMeteoResponse) -> WeatherReport {
        let snow = self.options.snow_handling;

        let current = CurrentConditions {
            temperature: round_to_int(raw.current.temperature_2m),
            humidity: raw.current.relative_humidity_2m,
            wind_speed: raw.current.wind_speed_10m,
            rainfall: raw.current.rain,
            condition: Condition::from_weather_code(raw.current.weather_code, snow),
        };

        let daily_forecasts = if self.options.include_daily {
            build_daily_forecasts(&raw.daily, snow)
        } else {
            Vec::new()
        };

        WeatherReport {
            city: city.to_string(),
            current,
            daily_forecasts,
        }
    }
}

/// Zip the provider's parallel arrays into per-day forecasts, preserving
/// the provider's order. Unequal array lengths are a provider data error;
/// truncate to the shortest array instead of indexing past the end.
fn build_daily_forecasts(daily: &DailyBlock, snow: SnowHandling) -> Vec<DailyForecast> {
    let days = daily
        .time
        .len()
        .min(daily.temperature_2m_max.len())
        .min(daily.temperature_2m_min.len())
        .min(daily.weather_code.len());

    (0..days)
        .map(|i| DailyForecast {
            date: daily.time[i].clone(),
            max_temperature: round_to_int(daily.temperature_2m_max[i]),
            min_temperature: round_to_int(daily.temperature_2m_min[i]),
            condition: Condition::from_weather_code(daily.weather_code[i], snow),
        })
        .collect()
}

/// Nearest integer, ties rounding half away from zero (24.5 → 25).
fn round_to_int(value: f64) -> i32 {
    value.round() as i32
}

/// Monotonic ticket counter for discarding stale responses.
///
/// A new city selection can arrive while an older request is still in
/// flight; the core does not cancel requests, so the presentation layer
/// tags each invocation with [`RequestSequence::issue`] and applies a
/// result only while its ticket [`is_latest`](RequestSequence::is_latest).
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ticket; strictly greater than every previously issued one.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::Relaxed) == ticket
    }
}
