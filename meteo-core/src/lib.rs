//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - HTTP clients for the geocoding and Open-Meteo providers
//! - The city-name → weather resolution pipeline and its domain models
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod resolver;

pub use config::Config;
pub use model::{
    Condition, Coordinates, CurrentConditions, DailyForecast, SnowHandling, WeatherError,
    WeatherReport,
};
pub use pipeline::{ForecastPipeline, PipelineOptions, RequestSequence};
pub use provider::{ForecastApi, GeocodingApi, GeocodingClient, OpenMeteoClient};
pub use resolver::{DEFAULT_CITIES, LocationResolver};
