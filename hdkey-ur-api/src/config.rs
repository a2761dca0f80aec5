//! Server configuration loaded from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use hdkey_ur::transfer::DEFAULT_MAX_FRAGMENT_LEN;

/// Runtime settings of the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub listen_addr: SocketAddr,
    /// Directory served for every path that is not an API route
    pub static_dir: PathBuf,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// UR fragment length used for the QR payload
    pub max_fragment_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            static_dir: PathBuf::from("public"),
            max_body_bytes: 1024 * 1024,
            max_fragment_len: DEFAULT_MAX_FRAGMENT_LEN,
        }
    }
}

impl ServerConfig {
    /// Read `HDKEY_*` variables, falling back to the defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = match std::env::var("HDKEY_LISTEN_ADDR") {
            Ok(addr) => addr.parse().with_context(|| format!("invalid HDKEY_LISTEN_ADDR {:?}", addr))?,
            Err(_) => defaults.listen_addr,
        };

        let static_dir = std::env::var("HDKEY_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let max_body_bytes = match std::env::var("HDKEY_MAX_BODY_BYTES") {
            Ok(value) => value.parse().with_context(|| format!("invalid HDKEY_MAX_BODY_BYTES {:?}", value))?,
            Err(_) => defaults.max_body_bytes,
        };

        let max_fragment_len = match std::env::var("HDKEY_QR_MAX_FRAGMENT_LEN") {
            Ok(value) => value.parse().with_context(|| format!("invalid HDKEY_QR_MAX_FRAGMENT_LEN {:?}", value))?,
            Err(_) => defaults.max_fragment_len,
        };

        Ok(Self {
            listen_addr,
            static_dir,
            max_body_bytes,
            max_fragment_len,
        })
    }
}
