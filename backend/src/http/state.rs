//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::ItemRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for item storage
    pub repository: Arc<dyn ItemRepository>,
    /// Server settings (page limits, status interval)
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ItemRepository>, config: ServerConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
