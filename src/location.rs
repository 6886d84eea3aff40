//! Turns the location fields of a request into coordinates.
//!
//! First match wins: `latitude`/`longitude`, then `lat`/`lon`, then a
//! `"lat,lon"` string in `location`, and only then a geocoding lookup of the
//! `location` text.

use std::future::Future;

use serde_json::Value;

use crate::error::{GeocodeError, WeatherError};
use crate::models::{as_float, ActionRequest, Coordinates};

/// Resolves a free-text address to coordinates.
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}

/// Resolve the request's location. `geocoder` is `None` when geocoding is
/// disabled.
pub async fn resolve_location<G: Geocoder>(
    request: &ActionRequest,
    geocoder: Option<&G>,
) -> Result<Coordinates, WeatherError> {
    if let (Some(lat), Some(lon)) = (present(&request.latitude), present(&request.longitude)) {
        return numeric_pair(lat, lon)
            .ok_or(WeatherError::InvalidCoordinates("latitude/longitude"));
    }

    if let (Some(lat), Some(lon)) = (present(&request.lat), present(&request.lon)) {
        return numeric_pair(lat, lon).ok_or(WeatherError::InvalidCoordinates("lat/lon"));
    }

    let Some(location) = request.location.as_ref().and_then(Value::as_str) else {
        return Err(WeatherError::MissingLocation);
    };

    if let Some(coordinates) = parse_lat_lon(location) {
        return Ok(coordinates);
    }

    let Some(geocoder) = geocoder else {
        return Err(WeatherError::GeocodingDisabled);
    };

    tracing::debug!("Geocoding location: {}", location);

    geocoder
        .geocode(location)
        .await
        .map_err(|source| WeatherError::Geocode {
            location: location.to_string(),
            source,
        })
}

/// Parse `"<number>,<number>"` with optional surrounding whitespace and signs.
pub fn parse_lat_lon(value: &str) -> Option<Coordinates> {
    let (lat, lon) = value.split_once(',')?;
    Some(Coordinates::new(
        parse_decimal(lat.trim())?,
        parse_decimal(lon.trim())?,
    ))
}

/// Accepts `[+-]?digits`, `[+-]?digits.digits` and `[+-]?.digits`; a trailing
/// dot or an exponent is rejected.
fn parse_decimal(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or(("", unsigned));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if fraction.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    text.parse().ok()
}

fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

fn numeric_pair(lat: &Value, lon: &Value) -> Option<Coordinates> {
    Some(Coordinates::new(as_float(lat)?, as_float(lon)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder stub that answers with a fixed result and counts calls.
    struct StubGeocoder {
        answer: Result<Coordinates, GeocodeError>,
        calls: AtomicUsize,
    }

    impl StubGeocoder {
        fn answering(answer: Result<Coordinates, GeocodeError>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocoder for StubGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    fn request(value: Value) -> ActionRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn explicit_coordinates_win_over_location() {
        let geocoder = StubGeocoder::answering(Ok(Coordinates::new(0.0, 0.0)));
        let req = request(json!({
            "latitude": 40.7128,
            "longitude": -74.006,
            "location": "Paris, France"
        }));

        let coords = resolve_location(&req, Some(&geocoder)).await.unwrap();
        assert_eq!(coords, Coordinates::new(40.7128, -74.006));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn numeric_strings_are_accepted() {
        let req = request(json!({ "latitude": "47.6", "longitude": "-122.3" }));

        let coords = resolve_location::<StubGeocoder>(&req, None).await.unwrap();
        assert_eq!(coords, Coordinates::new(47.6, -122.3));
    }

    #[tokio::test]
    async fn non_numeric_coordinates_rejected() {
        let req = request(json!({ "latitude": "north", "longitude": 10 }));

        let err = resolve_location::<StubGeocoder>(&req, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid latitude/longitude values; must be numeric.");
    }

    #[tokio::test]
    async fn lat_lon_synonyms() {
        let req = request(json!({ "lat": 51.5, "lon": "-0.12" }));
        let coords = resolve_location::<StubGeocoder>(&req, None).await.unwrap();
        assert_eq!(coords, Coordinates::new(51.5, -0.12));

        let bad = request(json!({ "lat": [1], "lon": 2 }));
        let err = resolve_location::<StubGeocoder>(&bad, None).await.unwrap_err();
        assert_eq!(err, WeatherError::InvalidCoordinates("lat/lon"));
    }

    #[tokio::test]
    async fn half_a_pair_falls_through_to_location() {
        let req = request(json!({ "latitude": 1.0, "lon": 2.0, "location": "3,4" }));

        let coords = resolve_location::<StubGeocoder>(&req, None).await.unwrap();
        assert_eq!(coords, Coordinates::new(3.0, 4.0));
    }

    #[tokio::test]
    async fn coordinate_string_skips_geocoding() {
        let geocoder = StubGeocoder::answering(Ok(Coordinates::new(0.0, 0.0)));
        let req = request(json!({ "location": "47.6062,-122.3321" }));

        let coords = resolve_location(&req, Some(&geocoder)).await.unwrap();
        assert_eq!(coords, Coordinates::new(47.6062, -122.3321));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn place_name_is_geocoded() {
        let geocoder = StubGeocoder::answering(Ok(Coordinates::new(47.6, -122.3)));
        let req = request(json!({ "location": "Seattle, WA" }));

        let coords = resolve_location(&req, Some(&geocoder)).await.unwrap();
        assert_eq!(coords, Coordinates::new(47.6, -122.3));
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn geocoding_failure_is_embedded() {
        let geocoder =
            StubGeocoder::answering(Err(GeocodeError::Status("ZERO_RESULTS".to_string())));
        let req = request(json!({ "location": "Nowhere" }));

        let err = resolve_location(&req, Some(&geocoder)).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Could not geocode location 'Nowhere'"));
        assert!(msg.contains("ZERO_RESULTS"));
    }

    #[tokio::test]
    async fn place_name_without_geocoding() {
        let req = request(json!({ "location": "Nowhere" }));

        let err = resolve_location::<StubGeocoder>(&req, None).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("latitude and longitude"));
        assert!(msg.contains("geocoding"));
    }

    #[tokio::test]
    async fn missing_location() {
        let req = request(json!({ "latitude": 10.0, "location": 42 }));

        let err = resolve_location::<StubGeocoder>(&req, None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing location. Provide latitude and longitude or a 'location' string."
        );
    }

    #[test]
    fn parse_lat_lon_formats() {
        assert_eq!(
            parse_lat_lon("  47.6062 , -122.3321 "),
            Some(Coordinates::new(47.6062, -122.3321))
        );
        assert_eq!(parse_lat_lon("+1,.5"), Some(Coordinates::new(1.0, 0.5)));
        assert_eq!(parse_lat_lon("48,2"), Some(Coordinates::new(48.0, 2.0)));

        assert_eq!(parse_lat_lon("47.,2"), None);
        assert_eq!(parse_lat_lon("1e3,2"), None);
        assert_eq!(parse_lat_lon("1.2.3,4"), None);
        assert_eq!(parse_lat_lon("Seattle, WA"), None);
        assert_eq!(parse_lat_lon("1,2,3"), None);
        assert_eq!(parse_lat_lon(""), None);
    }
}
