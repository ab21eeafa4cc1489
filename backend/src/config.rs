//! Server configuration and environment variable handling.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Pause between two status messages on the WebSocket stream
    pub status_interval: Duration,
    /// `limit` used by `GET /items/` when the query omits it
    pub default_page_limit: usize,
    /// Ceiling applied to any requested `limit`
    pub max_page_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            status_interval: Duration::from_secs(1),
            default_page_limit: 100,
            max_page_limit: 1000,
        }
    }
}

impl ServerConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 8000)
    /// - `STATUS_INTERVAL_MS` (default: 1000)
    /// - `DEFAULT_PAGE_LIMIT` (default: 100)
    /// - `MAX_PAGE_LIMIT` (default: 1000)
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// default page limit exceeds the maximum.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_var("PORT")?.unwrap_or(defaults.port);
        let status_interval = parse_var::<u64>("STATUS_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.status_interval);
        let default_page_limit =
            parse_var("DEFAULT_PAGE_LIMIT")?.unwrap_or(defaults.default_page_limit);
        let max_page_limit = parse_var("MAX_PAGE_LIMIT")?.unwrap_or(defaults.max_page_limit);

        if status_interval.is_zero() {
            return Err("STATUS_INTERVAL_MS must be greater than zero".to_string());
        }
        if default_page_limit > max_page_limit {
            return Err(format!(
                "DEFAULT_PAGE_LIMIT ({}) must not exceed MAX_PAGE_LIMIT ({})",
                default_page_limit, max_page_limit
            ));
        }

        Ok(Self {
            host,
            port,
            status_interval,
            default_page_limit,
            max_page_limit,
        })
    }

    /// Resolve the bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{} must be a valid number, got {:?}", key, raw)),
        Err(_) => Ok(None),
    }
}
