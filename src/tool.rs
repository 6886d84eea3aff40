//! The weather tool and the capability interface hosts call it through.

use std::future::Future;

use reqwest::Client;
use serde_json::{json, Value};

use crate::config::{JsonObject, ResolvedSettings, ToolConfiguration};
use crate::constants::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{ConfigError, WeatherError};
use crate::geocode::GoogleGeocoder;
use crate::location::resolve_location;
use crate::models::{Action, ActionRequest, ToolResult};
use crate::weather::{WeatherClient, WeatherQuery};

/// What a host needs from a tool: a parameter schema and a way to call it.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the accepted call parameters.
    fn describe(&self) -> Value;

    /// Run one call. Failures come back as [`ToolResult::Error`].
    fn invoke(&self, request: ActionRequest) -> impl Future<Output = ToolResult> + Send;

    /// `{name, description, parameters}` definition for tool discovery.
    fn definition(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": self.describe(),
        })
    }
}

/// Google Weather lookups: current conditions, hourly and daily forecasts.
#[derive(Debug, Clone)]
pub struct GoogleWeatherTool {
    name: String,
    description: String,
    settings: ResolvedSettings,
    weather: WeatherClient,
    geocoder: Option<GoogleGeocoder>,
}

impl GoogleWeatherTool {
    /// Build the tool, resolving API keys against the process environment.
    pub fn new(config: ToolConfiguration) -> Result<Self, ConfigError> {
        let settings = ResolvedSettings::resolve(&config.params)?;
        Self::from_settings(&config.name, config.effective_description(), settings)
    }

    pub fn from_settings(
        name: &str,
        description: &str,
        settings: ResolvedSettings,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let weather = WeatherClient::new(
            client.clone(),
            settings.base_url.clone(),
            settings.api_key.clone(),
        );
        let geocoder = settings.geocoding_enabled.then(|| {
            GoogleGeocoder::new(
                client,
                settings.geocoding_base_url.clone(),
                settings.geocoding_api_key.clone(),
            )
        });

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            settings,
            weather,
            geocoder,
        })
    }

    pub fn settings(&self) -> &ResolvedSettings {
        &self.settings
    }

    /// Entry point for hosts that pass a loose named-parameter bag.
    pub async fn execute(&self, params: JsonObject) -> ToolResult {
        match serde_json::from_value::<ActionRequest>(Value::Object(params)) {
            Ok(request) => self.invoke(request).await,
            Err(e) => ToolResult::error(WeatherError::InvalidParams(e.to_string())),
        }
    }

    async fn run(&self, request: ActionRequest) -> Result<ToolResult, WeatherError> {
        let name = request
            .action
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(WeatherError::MissingAction)?;
        // Action and count are validated before any geocoding round trip.
        let action = Action::parse(name, &request)?;

        let coordinates = resolve_location(&request, self.geocoder.as_ref()).await?;

        let query = WeatherQuery {
            action,
            coordinates,
            units: request
                .requested_units()
                .map_or_else(|| self.settings.units.to_string(), str::to_string),
            language: request
                .language
                .clone()
                .unwrap_or_else(|| self.settings.language.clone()),
        };

        tracing::info!(
            "Running {} for coordinates: {}, {}",
            action.name(),
            coordinates.latitude,
            coordinates.longitude
        );

        self.weather.lookup(&query).await
    }
}

impl Tool for GoogleWeatherTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn describe(&self) -> Value {
        parameters_schema()
    }

    async fn invoke(&self, request: ActionRequest) -> ToolResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Weather tool call failed: {}", e);
                ToolResult::error(e)
            }
        }
    }
}

/// Schema generated from [`ActionRequest`], with `action` required and
/// restricted to the known names.
pub fn parameters_schema() -> Value {
    let mut schema = schemars::schema_for!(ActionRequest).to_value();
    schema["required"] = json!(["action"]);
    if let Some(action) = schema
        .pointer_mut("/properties/action")
        .and_then(Value::as_object_mut)
    {
        action.insert("enum".to_string(), json!(Action::NAMES));
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_tool(params: Value) -> GoogleWeatherTool {
        let Value::Object(params) = params else {
            panic!("params must be an object");
        };
        let settings = ResolvedSettings::resolve_with(&params, |_| None).unwrap();
        GoogleWeatherTool::from_settings("google_weather", "test tool", settings).unwrap()
    }

    #[tokio::test]
    async fn unknown_action_is_reported() {
        let tool = offline_tool(json!({}));
        let request = ActionRequest {
            action: Some("bogus_action".to_string()),
            latitude: Some(json!(1.0)),
            longitude: Some(json!(2.0)),
            ..Default::default()
        };

        let result = tool.invoke(request).await;
        assert_eq!(result, ToolResult::error("Unknown action: bogus_action"));
    }

    #[tokio::test]
    async fn action_is_checked_before_location() {
        // Unroutable geocoder: reaching it would surface a geocode failure.
        let tool = offline_tool(json!({
            "api_key": "k",
            "geocoding_base_url": "http://127.0.0.1:9/geocode/json"
        }));

        let bogus = ActionRequest {
            action: Some("bogus_action".to_string()),
            location: Some(json!("Seattle, WA")),
            ..Default::default()
        };
        assert_eq!(
            tool.invoke(bogus).await.error_message(),
            Some("Unknown action: bogus_action")
        );

        let bad_hours = ActionRequest {
            action: Some("hourly_forecast".to_string()),
            hours: Some(json!("lots")),
            ..Default::default()
        };
        let result = tool.invoke(bad_hours).await;
        assert!(result.error_message().unwrap().starts_with("Execution failed:"));
    }

    #[tokio::test]
    async fn missing_action_is_reported() {
        let tool = offline_tool(json!({}));

        let result = tool.invoke(ActionRequest::default()).await;
        assert_eq!(
            result.error_message(),
            Some("Missing required 'action' parameter")
        );

        let empty = ActionRequest {
            action: Some(String::new()),
            ..Default::default()
        };
        assert!(tool.invoke(empty).await.is_error());
    }

    #[tokio::test]
    async fn location_errors_surface_as_results() {
        let tool = offline_tool(json!({ "geocoding_enabled": false }));

        let mut params = JsonObject::new();
        params.insert("action".to_string(), json!("current_conditions"));
        params.insert("location".to_string(), json!("Nowhere"));

        let result = tool.execute(params).await;
        let msg = result.error_message().unwrap();
        assert!(msg.contains("latitude and longitude"));
        assert!(msg.contains("geocoding"));
    }

    #[tokio::test]
    async fn malformed_bag_is_reported() {
        let tool = offline_tool(json!({}));

        let mut params = JsonObject::new();
        params.insert("action".to_string(), json!(["current_conditions"]));

        let result = tool.execute(params).await;
        assert!(result.error_message().unwrap().starts_with("Invalid parameters:"));
    }

    #[test]
    fn schema_documents_action_and_location() {
        let schema = parameters_schema();

        assert_eq!(schema["required"], json!(["action"]));
        let properties = schema["properties"].as_object().unwrap();
        for key in [
            "action",
            "location",
            "latitude",
            "longitude",
            "unitsSystem",
            "language",
            "hours",
            "days",
        ] {
            assert!(properties.contains_key(key), "schema is missing {key}");
        }
        assert_eq!(
            properties["action"]["enum"],
            json!(["current_conditions", "hourly_forecast", "daily_forecast"])
        );
    }

    #[test]
    fn definition_wraps_schema() {
        let tool = offline_tool(json!({}));
        let definition = tool.definition();

        assert_eq!(definition["name"], "google_weather");
        assert_eq!(definition["description"], "test tool");
        assert_eq!(definition["parameters"], tool.describe());
    }
}
