//! Expiring Cache - interactive cached fetcher
//!
//! Reads commands from stdin and fetches resources through an expiring cache.

use std::sync::Arc;

use anyhow::Context;
use tokio::io;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expiring_cache::{repl, CachedClient, Config, ExpiringCache};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the expiring cache (starts its reaper)
/// 4. Build the cached HTTP client
/// 5. Run the command loop until exit, end of input, or Ctrl+C
/// 6. Stop the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expiring_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: eviction_interval={}s, fetch_timeout={}s, base_url={}",
        config.eviction_interval, config.fetch_timeout, config.base_url
    );

    let cache = Arc::new(
        ExpiringCache::new(config.eviction_interval()).context("failed to create cache")?,
    );
    info!("Cache initialized");

    let client = CachedClient::new(cache.clone(), config.fetch_timeout())
        .context("failed to build HTTP client")?;

    // Blocking stdin reads live on their own thread so Ctrl+C never waits on them.
    let lines = repl::spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
        .context("failed to start input reader")?;
    tokio::select! {
        result = repl::run_repl(&client, &config.base_url, lines, io::stdout()) => {
            result.context("command loop failed")?;
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    drop(client);
    match Arc::try_unwrap(cache) {
        Ok(cache) => cache.shutdown().await,
        Err(cache) => {
            warn!("Cache still shared at shutdown, stopping reaper");
            cache.stop_reaper();
        }
    }

    info!("Shutdown complete");
    Ok(())
}
