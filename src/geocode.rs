//! Forward geocoding through the Google Maps Geocoding API.

use reqwest::Client;
use serde_json::Value;

use crate::error::GeocodeError;
use crate::location::Geocoder;
use crate::models::{Coordinates, GeocodeResult};

const STATUS_OK: &str = "OK";

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn lookup(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await?;

        tracing::debug!("Geocoding responded with HTTP {}", response.status());

        let bytes = response.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes).map_err(|_| GeocodeError::NotJson)?;

        first_coordinates(&data)
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let coordinates = self.lookup(address).await?;
        tracing::info!("Geocoded '{}' to {}", address, coordinates);
        Ok(coordinates)
    }
}

/// Coordinates of the first result of a successful geocoding payload.
fn first_coordinates(data: &Value) -> Result<Coordinates, GeocodeError> {
    let status = data.get("status");
    let first = data
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first());

    let first = match (status.and_then(Value::as_str), first) {
        (Some(STATUS_OK), Some(first)) => first,
        _ => return Err(GeocodeError::Status(describe_status(status))),
    };

    let result: GeocodeResult =
        serde_json::from_value(first.clone()).map_err(|_| GeocodeError::MalformedResult)?;

    Ok(Coordinates::new(
        result.geometry.location.lat,
        result.geometry.location.lng,
    ))
}

fn describe_status(status: Option<&Value>) -> String {
    match status {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "MISSING".to_string(),
    }
}
