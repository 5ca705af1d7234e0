//! End-to-end pipeline tests against a mock HTTP server.
//!
//! Both providers are pointed at a single wiremock instance, exercising the
//! real reqwest clients and JSON parsing without touching the network.

use meteo_core::provider::{GeocodingClient, OpenMeteoClient, http_client};
use meteo_core::{ForecastPipeline, LocationResolver, PipelineOptions, SnowHandling, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline_for(server: &MockServer, options: PipelineOptions) -> ForecastPipeline {
    let http = http_client().expect("client should build");
    let geocoder = GeocodingClient::new(http.clone(), server.uri());
    let forecast = OpenMeteoClient::new(http, server.uri(), "Asia/Tokyo");

    ForecastPipeline::new(LocationResolver::new(Box::new(geocoder)), Box::new(forecast), options)
}

fn geocode_fixture(lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [
            {"name": "Resolved Name", "geometry": {"lat": lat, "lng": lng}}
        ]
    })
}

/// Fixture mirroring a real Open-Meteo payload, units blocks included.
fn forecast_fixture() -> serde_json::Value {
    serde_json::json!({
        "latitude": 10.0,
        "longitude": 20.0,
        "timezone": "Asia/Tokyo",
        "current": {
            "time": "2023-10-26T12:00",
            "temperature_2m": 25.0,
            "weather_code": 0,
            "wind_speed_10m": 5.0,
            "precipitation": 0.0,
            "rain": 0.0,
            "relative_humidity_2m": 60
        },
        "current_units": {
            "temperature_2m": "°C",
            "weather_code": "wmo code",
            "wind_speed_10m": "km/h",
            "precipitation": "mm",
            "rain": "mm",
            "relative_humidity_2m": "%"
        },
        "daily": {
            "time": ["2023-10-26", "2023-10-27", "2023-10-28"],
            "temperature_2m_max": [28.0, 29.0, 27.0],
            "temperature_2m_min": [20.0, 21.0, 19.0],
            "weather_code": [0, 1, 2]
        },
        "daily_units": {
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "weather_code": "wmo code"
        }
    })
}

async fn mount_geocode(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/geocoding/v1/forward"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolves_a_city_into_a_full_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v1/forward"))
        .and(query_param("address", "Test City"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_fixture(10.0, 20.0)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "10"))
        .and(query_param("longitude", "20"))
        .and(query_param("timezone", "Asia/Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture()))
        .mount(&server)
        .await;

    let pipeline = pipeline_for(&server, PipelineOptions::default());
    let report = pipeline.get_weather_for_city("Test City").await.unwrap();

    // The requested name is echoed back, not the geocoder's resolved name.
    assert_eq!(report.city, "Test City");

    assert_eq!(report.current.temperature, 25);
    assert_eq!(report.current.humidity, 60);
    assert_eq!(report.current.wind_speed, 5.0);
    assert_eq!(report.current.rainfall, 0.0);
    assert_eq!(report.current.condition, meteo_core::Condition::Sunny);

    assert_eq!(report.daily_forecasts.len(), 3);
    let first = &report.daily_forecasts[0];
    assert_eq!(first.date, "2023-10-26");
    assert_eq!(first.max_temperature, 28);
    assert_eq!(first.min_temperature, 20);
    assert_eq!(first.condition, meteo_core::Condition::Sunny);
    assert_eq!(report.daily_forecasts[2].condition, meteo_core::Condition::PartlyCloudy);
}

#[tokio::test]
async fn unknown_city_with_empty_geocode_still_succeeds() {
    let server = MockServer::start().await;

    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []}))).await;

    // An unknown name falls through the static table to Tokyo.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "35.6762"))
        .and(query_param("longitude", "139.6503"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture()))
        .mount(&server)
        .await;

    let pipeline = pipeline_for(&server, PipelineOptions::default());
    let report = pipeline.get_weather_for_city("Atlantis").await.unwrap();

    assert_eq!(report.city, "Atlantis");
    assert_eq!(report.daily_forecasts.len(), 3);
}

#[tokio::test]
async fn geocoder_outage_still_succeeds_via_fallback_table() {
    let server = MockServer::start().await;

    mount_geocode(&server, ResponseTemplate::new(503).set_body_string("unavailable")).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "34.6937"))
        .and(query_param("longitude", "135.5023"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture()))
        .mount(&server)
        .await;

    let pipeline = pipeline_for(&server, PipelineOptions::default());
    let report = pipeline.get_weather_for_city("大阪").await.unwrap();

    assert_eq!(report.city, "大阪");
}

#[tokio::test]
async fn forecast_provider_failure_is_surfaced_not_masked() {
    let server = MockServer::start().await;

    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(geocode_fixture(10.0, 20.0))).await;
    mount_forecast(&server, ResponseTemplate::new(500).set_body_string("internal error")).await;

    let pipeline = pipeline_for(&server, PipelineOptions::default());
    let err = pipeline.get_weather_for_city("Test City").await.unwrap_err();

    match &err {
        WeatherError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("internal error"));
}

#[tokio::test]
async fn malformed_forecast_payload_is_a_parse_error() {
    let server = MockServer::start().await;

    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(geocode_fixture(10.0, 20.0))).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_string("not json at all")).await;

    let pipeline = pipeline_for(&server, PipelineOptions::default());
    let err = pipeline.get_weather_for_city("Test City").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn identical_fixtures_yield_structurally_equal_reports() {
    let server = MockServer::start().await;

    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(geocode_fixture(10.0, 20.0))).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_fixture())).await;

    let pipeline = pipeline_for(&server, PipelineOptions::default());
    let first = pipeline.get_weather_for_city("Test City").await.unwrap();
    let second = pipeline.get_weather_for_city("Test City").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn current_only_variant_omits_daily_forecasts() {
    let server = MockServer::start().await;

    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(geocode_fixture(10.0, 20.0))).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_fixture())).await;

    let options = PipelineOptions {
        include_daily: false,
        ..PipelineOptions::default()
    };
    let pipeline = pipeline_for(&server, options);
    let report = pipeline.get_weather_for_city("Test City").await.unwrap();

    assert!(report.daily_forecasts.is_empty());
    assert_eq!(report.current.temperature, 25);
}

#[tokio::test]
async fn snowy_variant_classifies_snow_codes_separately() {
    let server = MockServer::start().await;

    let mut fixture = forecast_fixture();
    fixture["current"]["weather_code"] = serde_json::json!(71);
    fixture["daily"]["weather_code"] = serde_json::json!([71, 85, 0]);

    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(geocode_fixture(10.0, 20.0))).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(fixture)).await;

    let options = PipelineOptions {
        snow_handling: SnowHandling::Snowy,
        ..PipelineOptions::default()
    };
    let pipeline = pipeline_for(&server, options);
    let report = pipeline.get_weather_for_city("札幌").await.unwrap();

    assert_eq!(report.current.condition, meteo_core::Condition::Snowy);
    assert_eq!(report.daily_forecasts[0].condition, meteo_core::Condition::Snowy);
    assert_eq!(report.daily_forecasts[2].condition, meteo_core::Condition::Sunny);
}
