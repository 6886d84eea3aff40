use std::time::Duration;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "google-weather-tool/0.1.0";

/// Google Weather API base URL
pub const WEATHER_API_BASE: &str = "https://weather.googleapis.com/v1";

/// Google Maps Geocoding API endpoint
pub const GEOCODING_API_BASE: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Per-request timeout for both weather and geocoding calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tool name used when the configuration leaves it out
pub const DEFAULT_TOOL_NAME: &str = "google_weather";

/// Description used when the configured one is empty
pub const DEFAULT_TOOL_DESCRIPTION: &str = "Google Weather tool: current conditions, hourly, and daily forecasts. \
    Actions: current_conditions, hourly_forecast, daily_forecast. \
    Params: provide 'action' and either (latitude & longitude) or 'location' string. \
    Optional: units ('imperial'|'metric'), language, hours (hourly), days (daily).";

/// Language code sent as `languageCode` unless overridden
pub const DEFAULT_LANGUAGE: &str = "en";

/// Hours requested by `hourly_forecast` when none are given
pub const DEFAULT_FORECAST_HOURS: i64 = 24;

/// Days requested by `daily_forecast` when none are given
pub const DEFAULT_FORECAST_DAYS: i64 = 10;

// Environment fallbacks for API keys, in precedence order
pub const ENV_WEATHER_API_KEY: &str = "GOOGLE_WEATHER_API_KEY";
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
