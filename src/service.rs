use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::models::{ActionRequest, ToolResult};
use crate::tool::{GoogleWeatherTool, Tool as _};

/// MCP server exposing the weather tool over any rmcp transport
#[derive(Clone)]
pub struct WeatherServer {
    tool: Arc<GoogleWeatherTool>,
    tool_router: ToolRouter<Self>,
}

impl WeatherServer {
    pub fn new(tool: GoogleWeatherTool) -> Self {
        Self {
            tool: Arc::new(tool),
            tool_router: Self::tool_router(),
        }
    }

    /// Renders a tool result as MCP content; `{error}` results are flagged as
    /// tool errors so the calling model sees them as such.
    fn to_call_result(result: &ToolResult) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(result).map_err(|e| {
            McpError::internal_error(format!("Failed to encode tool result: {}", e), None)
        })?;

        if result.is_error() {
            Ok(CallToolResult::error(vec![Content::text(text)]))
        } else {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.tool.name().to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(self.tool.description().to_string()),
        }
    }
}

#[tool_router]
impl WeatherServer {
    /// Runs one Google Weather lookup
    #[tool(
        name = "google_weather",
        description = "Google Weather: current conditions, hourly and daily forecasts. Always include 'action' \
        (current_conditions, hourly_forecast or daily_forecast). Provide either latitude and longitude, or a \
        'location' string: \"lat,lon\" (e.g. \"47.6062,-122.3321\") or a place name such as \"Seattle, WA\" when \
        geocoding is enabled. Optional: unitsSystem ('imperial'|'metric'), language, hours (hourly, default 24), \
        days (daily, default 10). Returns the raw API response as {status_code, headers, body}."
    )]
    async fn google_weather(
        &self,
        Parameters(request): Parameters<ActionRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Tool call: action={}",
            request.action.as_deref().unwrap_or("<none>")
        );

        let result = self.tool.invoke(request).await;

        Self::to_call_result(&result)
    }
}
