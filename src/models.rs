use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_FORECAST_DAYS, DEFAULT_FORECAST_HOURS};
use crate::error::WeatherError;

// ============================================================================
// Tool Request Models
// ============================================================================

/// Call-time parameters of the weather tool.
///
/// Coordinates and counts are kept as raw JSON so that numeric strings such as
/// `"47.6"` are accepted and malformed values surface as tool errors instead of
/// deserialization failures.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ActionRequest {
    /// One of `current_conditions`, `hourly_forecast`, `daily_forecast`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Latitude in decimal degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub latitude: Option<Value>,

    /// Longitude in decimal degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub longitude: Option<Value>,

    /// Short form of `latitude`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub lat: Option<Value>,

    /// Short form of `longitude`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub lon: Option<Value>,

    /// Either "lat,lon" (e.g. "47.6062,-122.3321") or a place name such as
    /// "Seattle, WA" when geocoding is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub location: Option<Value>,

    /// Unit system: "imperial" or "metric".
    #[serde(
        default,
        rename = "unitsSystem",
        skip_serializing_if = "Option::is_none"
    )]
    pub units_system: Option<String>,

    /// Same as `unitsSystem`, which wins when both are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    /// IETF language code for localized output, e.g. "en".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Number of hours for `hourly_forecast` (default 24).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<i64>")]
    pub hours: Option<Value>,

    /// Number of days for `daily_forecast` (default 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<i64>")]
    pub days: Option<Value>,
}

impl ActionRequest {
    /// Per-call unit override, `unitsSystem` first.
    pub fn requested_units(&self) -> Option<&str> {
        self.units_system.as_deref().or(self.units.as_deref())
    }
}

/// Geographic point in decimal degrees. Ranges are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A weather query the tool knows how to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CurrentConditions,
    HourlyForecast { hours: i64 },
    DailyForecast { days: i64 },
}

impl Action {
    pub const NAMES: [&'static str; 3] = ["current_conditions", "hourly_forecast", "daily_forecast"];

    /// Builds the action named by `name`, coercing its count parameter from
    /// the request.
    pub fn parse(name: &str, request: &ActionRequest) -> Result<Self, WeatherError> {
        match name {
            "current_conditions" => Ok(Self::CurrentConditions),
            "hourly_forecast" => Ok(Self::HourlyForecast {
                hours: coerce_count("hours", request.hours.as_ref(), DEFAULT_FORECAST_HOURS)?,
            }),
            "daily_forecast" => Ok(Self::DailyForecast {
                days: coerce_count("days", request.days.as_ref(), DEFAULT_FORECAST_DAYS)?,
            }),
            other => Err(WeatherError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentConditions => "current_conditions",
            Self::HourlyForecast { .. } => "hourly_forecast",
            Self::DailyForecast { .. } => "daily_forecast",
        }
    }

    /// Endpoint path relative to the weather base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::CurrentConditions => "/currentConditions:lookup",
            Self::HourlyForecast { .. } => "/forecast/hours:lookup",
            Self::DailyForecast { .. } => "/dailyForecast:lookup",
        }
    }

    /// Action-specific count query parameter, if any
    pub fn count_param(&self) -> Option<(&'static str, i64)> {
        match *self {
            Self::CurrentConditions => None,
            Self::HourlyForecast { hours } => Some(("hours", hours)),
            Self::DailyForecast { days } => Some(("days", days)),
        }
    }
}

/// Integer coercion for `hours`/`days`: integers pass, floats truncate,
/// strings must hold an integer literal.
fn coerce_count(name: &str, value: Option<&Value>, default: i64) -> Result<i64, WeatherError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(default);
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        WeatherError::Execution(format!("invalid value for '{}': {}", name, value))
    })
}

/// Numeric conversion for coordinate fields; numbers and numeric strings pass.
pub fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tool Result Models
// ============================================================================

/// Upstream response body: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(json) => Self::Json(json),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Outcome of one tool invocation. Serializes either as
/// `{status_code, headers, body}` or as `{error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Response {
        status_code: u16,
        headers: BTreeMap<String, String>,
        body: ResponseBody,
    },
    Error {
        error: String,
    },
}

impl ToolResult {
    pub fn error(message: impl fmt::Display) -> Self {
        Self::Error {
            error: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            Self::Response { .. } => None,
        }
    }
}

// ============================================================================
// Google Geocoding API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeGeometry {
    pub location: GeocodeLatLng,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeLatLng {
    pub lat: f64,
    pub lng: f64,
}
