//! Entry point for the BYT notification server.
//!
//! Loads `.env`, initializes logging, reads configuration from the
//! environment, and serves until `Ctrl-C`.

use std::sync::Arc;

use byt_server::config::ServerConfig;
use byt_server::server::start_server;
use byt_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails to
/// bind or serve.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env");
    }

    let config = ServerConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        ping_timeout_ms = config.ping_timeout.as_millis(),
        poll_wait_ms = config.poll_wait.as_millis(),
        outbox_capacity = config.outbox_capacity,
        "configuration loaded"
    );
    if config.api_key.is_none() {
        warn!("FCC_API_KEY is not set; /notify and /api/* will refuse every request");
    }

    let state = Arc::new(AppState::new(&config)?);
    start_server(&config, state).await?;
    Ok(())
}

/// Structured logging; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
