//! hdkey-ur API
//!
//! HTTP server that turns a BIP-39 mnemonic into a `ur:crypto-hdkey` export
//! and its QR code, and serves the static front end.

mod config;
mod error;
mod qr;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        static_dir = %config.static_dir.display(),
        max_body_bytes = config.max_body_bytes,
        max_fragment_len = config.max_fragment_len,
        "Starting hdkey-ur API"
    );

    let addr = config.listen_addr;
    let app = services::router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Open http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
