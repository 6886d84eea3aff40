use std::path::PathBuf;

/// Errors raised while building a tool from its configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid tool params: {0}")]
    InvalidParams(#[from] serde_json::Error),
    #[error("Invalid units '{0}'; expected 'imperial' or 'metric'")]
    InvalidUnits(String),
    #[error("Invalid value for '{key}': {value}; expected true or false")]
    InvalidFlag { key: &'static str, value: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures of a single geocoding lookup
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodeError {
    #[error("Geocoding is enabled but no geocoding_api_key is configured.")]
    MissingApiKey,
    #[error("Geocoding response was not JSON.")]
    NotJson,
    #[error("Geocoding failed with status {0}")]
    Status(String),
    #[error("Geocoding result had no usable geometry.location")]
    MalformedResult,
    #[error("Geocoding request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        Self::Transport(err.without_url().to_string())
    }
}

/// Every failure an invocation can report back to its caller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("Missing required 'action' parameter")]
    MissingAction,
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Missing location. Provide latitude and longitude or a 'location' string.")]
    MissingLocation,
    #[error("Invalid {0} values; must be numeric.")]
    InvalidCoordinates(&'static str),
    #[error("Provide latitude and longitude or enable geocoding with a resolvable location string.")]
    GeocodingDisabled,
    #[error("Could not geocode location '{location}'. {source}")]
    Geocode {
        location: String,
        #[source]
        source: GeocodeError,
    },
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
    #[error("Execution failed: {0}")]
    Execution(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Execution(err.without_url().to_string())
    }
}
