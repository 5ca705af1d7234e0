use crate::model::Coordinates;
use crate::provider::GeocodingApi;

/// Default city set, in display order.
pub const DEFAULT_CITIES: [&str; 5] = ["東京", "大阪", "札幌", "福岡", "名古屋"];

/// Fallback coordinates for the default city set.
const CITY_TABLE: [(&str, Coordinates); 5] = [
    ("東京", Coordinates { latitude: 35.6762, longitude: 139.6503 }),
    ("大阪", Coordinates { latitude: 34.6937, longitude: 135.5023 }),
    ("札幌", Coordinates { latitude: 43.0621, longitude: 141.3544 }),
    ("福岡", Coordinates { latitude: 33.5904, longitude: 130.4017 }),
    ("名古屋", Coordinates { latitude: 35.1815, longitude: 136.9066 }),
];

/// Used when the name is not in the table either (Tokyo).
const DEFAULT_COORDINATES: Coordinates = CITY_TABLE[0].1;

/// Best-effort city-name → coordinates resolution.
///
/// The geocoder is tried first; any failure or empty result falls back to
/// the static table, then to [`DEFAULT_COORDINATES`]. Resolution therefore
/// never fails, and geocoder errors stop here instead of reaching the
/// pipeline's caller.
#[derive(Debug)]
pub struct LocationResolver {
    geocoder: Box<dyn GeocodingApi>,
}

impl LocationResolver {
    pub fn new(geocoder: Box<dyn GeocodingApi>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, city: &str) -> Coordinates {
        match self.geocoder.geocode(city, 1).await {
            Ok(response) => match response.results.first() {
                Some(first) => first.coordinates(),
                None => {
                    tracing::debug!(city, "geocoder returned no results, using fallback");
                    fallback_coordinates(city)
                }
            },
            Err(err) => {
                tracing::warn!(city, error = %err, "geocoding failed, using fallback");
                fallback_coordinates(city)
            }
        }
    }
}

fn fallback_coordinates(city: &str) -> Coordinates {
    CITY_TABLE
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, coords)| *coords)
        .unwrap_or(DEFAULT_COORDINATES)
}
