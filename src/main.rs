use anyhow::Result;
use clap::Parser;
use google_weather_tool::{GoogleWeatherTool, Tool, ToolConfiguration, WeatherServer};
use rmcp::ServiceExt;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MCP server for Google Weather lookups over stdio
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// YAML tool configuration (name, description, params)
    #[arg(short, long, env = "WEATHER_TOOL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "google_weather_tool=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            tracing::info!("Loading tool configuration from {}", path.display());
            ToolConfiguration::load(path)?
        }
        None => ToolConfiguration::default(),
    };

    let tool = GoogleWeatherTool::new(config)?;
    let settings = tool.settings();
    if settings.api_key.is_none() {
        tracing::warn!("No weather API key configured; lookups will be rejected upstream");
    }
    tracing::info!(
        "Starting MCP weather server: tool={}, units={}, language={}, geocoding={}",
        tool.name(),
        settings.units,
        settings.language,
        settings.geocoding_enabled
    );
    tracing::debug!("Tool definition: {}", tool.definition());

    let server = WeatherServer::new(tool).serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
