//! Application state shared across handlers

use crate::config::ServerConfig;

/// Read-only state built once at startup. Requests share nothing mutable.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}
