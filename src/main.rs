//! Temperature forecast dashboard server
//!
//! Fetches the 5 day forecast for the configured city on every request, fits a linear
//! model of maximum temperature and serves the predictions as HTML, JSON and CSV.

use std::net::SocketAddr;
use tempcast::config::Config;
use tempcast::{create_app, Dashboard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; library `log` records are forwarded by the subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempcast=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting temperature dashboard for {}", config.weather.city);
    tracing::debug!("Configuration: {:?}", config);

    let dashboard = Dashboard::from_config(&config)?;
    let app = create_app(dashboard);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
