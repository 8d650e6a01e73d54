mod api;
mod config;
mod feed;
mod models;
mod server;
mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{FeedEnvelope, LineFeedClient};
use crate::config::Config;
use crate::feed::{normalize_batch, Dataset};
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "betfeed=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting betfeed");

    let config = Config::from_env()?;
    info!("Configuration loaded");

    storage::bootstrap(&config.data_dir)?;

    let client = LineFeedClient::new(&config.feed_base_url)?;
    info!("Line feed client initialized");

    // Seed the dataset from the on-disk sample, if one is there
    let initial = load_initial_dataset(&config);
    let state = AppState {
        dataset: Arc::new(RwLock::new(initial)),
        client: Arc::new(client),
        config: Arc::new(config.clone()),
    };

    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind HTTP listener")?;
    info!("Dashboard API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down betfeed");
    Ok(())
}

/// Load and normalize the sample response, if present. A missing or broken
/// sample file means starting empty, not failing startup.
fn load_initial_dataset(config: &Config) -> Option<Dataset> {
    let raw = match storage::load_sample(&config.data_dir) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No sample data found; use /api/fetch-live to pull the feed");
            return None;
        }
        Err(e) => {
            warn!("Failed to load sample data: {:#}", e);
            return None;
        }
    };

    let envelope = match FeedEnvelope::from_value(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Sample data is not a feed response: {}", e);
            return None;
        }
    };

    let batch = normalize_batch(&envelope.records);
    info!(
        "Loaded {} matches from sample data ({} records skipped)",
        batch.dataset.len(),
        batch.skipped.len()
    );
    Some(batch.dataset)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
