//! Google Weather lookups exposed as an agent tool.
//!
//! The crate provides:
//! - Configuration resolution (`${NAME}` expansion, API key fallbacks)
//! - Location resolution from coordinates, "lat,lon" strings or place names
//! - Forward geocoding through the Google Maps Geocoding API
//! - Current conditions, hourly and daily forecast lookups
//! - An MCP server adapter hosting the tool over rmcp

pub mod config;
pub mod constants;
pub mod error;
pub mod geocode;
pub mod location;
pub mod models;
pub mod service;
pub mod tool;
pub mod weather;

pub use config::{JsonObject, ResolvedSettings, ToolConfiguration, UnitsSystem};
pub use error::{ConfigError, GeocodeError, WeatherError};
pub use geocode::GoogleGeocoder;
pub use location::{parse_lat_lon, resolve_location, Geocoder};
pub use models::{Action, ActionRequest, Coordinates, ResponseBody, ToolResult};
pub use service::WeatherServer;
pub use tool::{GoogleWeatherTool, Tool};
pub use weather::{WeatherClient, WeatherQuery};
