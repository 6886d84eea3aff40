use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::Client;

use crate::error::WeatherError;
use crate::models::{Action, Coordinates, ResponseBody, ToolResult};

/// A fully resolved weather lookup
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub action: Action,
    pub coordinates: Coordinates,
    pub units: String,
    pub language: String,
}

impl WeatherQuery {
    /// Query string for the endpoint. The key is omitted when none is set.
    pub fn query_params(&self, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(key) = api_key {
            params.push(("key", key.to_string()));
        }
        params.push(("location.latitude", self.coordinates.latitude.to_string()));
        params.push(("location.longitude", self.coordinates.longitude.to_string()));
        params.push(("unitsSystem", self.units.clone()));
        params.push(("languageCode", self.language.clone()));
        if let Some((name, count)) = self.action.count_param() {
            params.push((name, count.to_string()));
        }
        params
    }
}

/// Client for the Google Weather API lookup endpoints
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Issues the lookup and returns the upstream response as-is. Non-2xx
    /// statuses are not errors here.
    pub async fn lookup(&self, query: &WeatherQuery) -> Result<ToolResult, WeatherError> {
        let url = format!("{}{}", self.base_url, query.action.path());

        let response = self
            .client
            .get(&url)
            .query(&query.query_params(self.api_key.as_deref()))
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        tracing::debug!(
            "{} responded with HTTP {}",
            query.action.name(),
            status_code
        );

        let bytes = response.bytes().await?;

        Ok(ToolResult::Response {
            status_code,
            headers,
            body: ResponseBody::from_bytes(&bytes),
        })
    }
}

/// Header map as name -> value; repeated headers are joined with ", ".
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    flat
}
