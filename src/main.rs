//! Landed Cost Engine HTTP server entry point.

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use landed_cost_engine::api::{AppState, create_router};
use landed_cost_engine::config::ConfigLoader;

const CONFIG_ENV: &str = "LANDED_COST_CONFIG";
const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Landed Cost Engine v{}", env!("CARGO_PKG_VERSION"));

    let config_dir = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    info!(config_dir = %config_dir, "Loading configuration");
    let config = ConfigLoader::load(&config_dir)?;

    let addr = config.server().bind_addr();
    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
