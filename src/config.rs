//! Tool configuration and the settings derived from it.
//!
//! A [`ToolConfiguration`] is the raw `{name, description, params}` block a
//! host hands to the tool. [`ResolvedSettings`] is computed from it exactly
//! once: `${NAME}` placeholders are expanded, API keys fall back to the
//! environment, and defaults are applied. Missing API keys are not an error
//! here; they only matter once a request is attempted.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{
    DEFAULT_LANGUAGE, DEFAULT_TOOL_DESCRIPTION, DEFAULT_TOOL_NAME, ENV_GOOGLE_API_KEY,
    ENV_MAPS_API_KEY, ENV_WEATHER_API_KEY, GEOCODING_API_BASE, WEATHER_API_BASE,
};
use crate::error::ConfigError;

pub type JsonObject = Map<String, Value>;

/// Raw tool configuration as provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfiguration {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub params: JsonObject,
}

fn default_name() -> String {
    DEFAULT_TOOL_NAME.to_string()
}

impl Default for ToolConfiguration {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: String::new(),
            params: JsonObject::new(),
        }
    }
}

impl ToolConfiguration {
    /// Load a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Configured description, or the built-in one when left empty.
    pub fn effective_description(&self) -> &str {
        if self.description.trim().is_empty() {
            DEFAULT_TOOL_DESCRIPTION
        } else {
            &self.description
        }
    }
}

/// Unit convention applied to returned measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitsSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitsSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitsSystem::Imperial => "imperial",
            UnitsSystem::Metric => "metric",
        }
    }
}

impl fmt::Display for UnitsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitsSystem {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "imperial" => Ok(UnitsSystem::Imperial),
            "metric" => Ok(UnitsSystem::Metric),
            _ => Err(ConfigError::InvalidUnits(value.to_string())),
        }
    }
}

/// Typed view over the recognized `params` keys. Anything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeatherParams {
    api_key: Option<String>,
    base_url: Option<String>,
    units: Option<String>,
    #[serde(rename = "unitsSystem")]
    units_system: Option<String>,
    language: Option<String>,
    geocoding_enabled: Option<Value>,
    geocoding_api_key: Option<String>,
    geocoding_base_url: Option<String>,
}

/// Effective settings of one tool instance. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub units: UnitsSystem,
    pub language: String,
    pub geocoding_enabled: bool,
    pub geocoding_api_key: Option<String>,
    pub geocoding_base_url: String,
}

impl ResolvedSettings {
    /// Resolve against the process environment.
    pub fn resolve(params: &JsonObject) -> Result<Self, ConfigError> {
        Self::resolve_with(params, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with<F>(params: &JsonObject, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded: JsonObject = params
            .iter()
            .map(|(key, value)| (key.clone(), expand_env(value, &env)))
            .collect();
        let params: WeatherParams = serde_json::from_value(Value::Object(expanded))?;

        let env_key = |name: &str| non_empty(env(name));

        let api_key = non_empty(params.api_key)
            .or_else(|| env_key(ENV_WEATHER_API_KEY))
            .or_else(|| env_key(ENV_GOOGLE_API_KEY));

        let geocoding_api_key = non_empty(params.geocoding_api_key)
            .or_else(|| env_key(ENV_MAPS_API_KEY))
            .or_else(|| api_key.clone());

        let units = match non_empty(params.units).or_else(|| non_empty(params.units_system)) {
            Some(units) => units.parse()?,
            None => UnitsSystem::default(),
        };

        Ok(Self {
            api_key,
            base_url: base_url(params.base_url, WEATHER_API_BASE),
            units,
            language: non_empty(params.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            geocoding_enabled: flag("geocoding_enabled", params.geocoding_enabled, true)?,
            geocoding_api_key,
            geocoding_base_url: base_url(params.geocoding_base_url, GEOCODING_API_BASE),
        })
    }
}

/// Replace a string of the exact form `${NAME}` with the value of `NAME`, or
/// null when it is unset. Other values pass through untouched.
pub fn expand_env<F>(value: &Value, env: F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) => match s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            Some(name) => env(name).map(Value::String).unwrap_or(Value::Null),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Boolean param that may also arrive as a string, e.g. from a `${NAME}`
/// placeholder. Null and empty strings take the default.
fn flag(key: &'static str, value: Option<Value>, default: bool) -> Result<bool, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, value: s }),
        },
        Some(other) => Err(ConfigError::InvalidFlag {
            key,
            value: other.to_string(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn base_url(configured: Option<String>, default: &str) -> String {
    let url = non_empty(configured).unwrap_or_else(|| default.to_string());
    url.trim_end_matches('/').to_string()
}
