use anyhow::Context;
use clap::{Parser, Subcommand};
use meteo_core::provider::{GeocodingClient, OpenMeteoClient, http_client};
use meteo_core::{Config, ForecastPipeline, LocationResolver, WeatherReport};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "City weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions and the daily outlook for a city.
    Forecast {
        /// City name, e.g. "東京" or any free-text place name.
        city: String,
    },

    /// List the default cities.
    Cities,

    /// Write a default config file (if none exists) and print its path.
    Init,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load().context("Failed to load configuration")?;

        match self.command {
            Command::Forecast { city } => {
                let pipeline = build_pipeline(&config)?;
                let report = pipeline
                    .get_weather_for_city(&city)
                    .await
                    .with_context(|| format!("Failed to fetch weather for '{city}'"))?;
                print_report(&report);
            }
            Command::Cities => {
                let pipeline = build_pipeline(&config)?;
                for city in pipeline.default_cities() {
                    println!("{city}");
                }
            }
            Command::Init => {
                let path = Config::config_file_path()?;
                if !path.exists() {
                    config.save().context("Failed to write default config")?;
                }
                println!("{}", path.display());
            }
        }

        Ok(())
    }
}

fn build_pipeline(config: &Config) -> anyhow::Result<ForecastPipeline> {
    // One shared client with bounded timeouts, injected into both providers.
    let http = http_client().context("Failed to build HTTP client")?;

    let geocoder = GeocodingClient::new(http.clone(), config.geocoding_base_url.as_str());
    let forecast = OpenMeteoClient::new(
        http,
        config.forecast_base_url.as_str(),
        config.timezone.as_str(),
    );
    let resolver = LocationResolver::new(Box::new(geocoder));

    Ok(ForecastPipeline::new(
        resolver,
        Box::new(forecast),
        config.pipeline_options(),
    ))
}

fn print_report(report: &WeatherReport) {
    println!("{}", report.city);
    println!(
        "  now: {}°C, {}  (humidity {}%, wind {} m/s, rain {} mm/h)",
        report.current.temperature,
        report.current.condition,
        report.current.humidity,
        report.current.wind_speed,
        report.current.rainfall,
    );

    for day in &report.daily_forecasts {
        println!(
            "  {}: {} / {}°C, {}",
            day.date, day.max_temperature, day.min_temperature, day.condition
        );
    }
}
