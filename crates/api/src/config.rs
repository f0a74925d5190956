//! # API Configuration Module
//!
//! Configuration for the Courtside API server, read from environment
//! variables with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SESSION_TTL_HOURS`: Lifetime of login sessions (default: 168)
//! - `SLOTS_OPEN_HOUR` / `SLOTS_CLOSE_HOUR`: Court availability grid (default: 6 / 22)

use courtside_core::availability::{DEFAULT_CLOSE_HOUR, DEFAULT_OPEN_HOUR, SlotWindow};
use eyre::{Result, WrapErr, eyre};
use std::env;
use std::str::FromStr;
use tracing::Level;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// Configuration for the Courtside API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use courtside_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub session_ttl_hours: i64,

    /// Opening hours used by the court availability grid
    pub slot_window: SlotWindow,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric value cannot be parsed
    /// - The configured availability window is empty or past midnight
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests can supply
    /// values without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 3000)?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let log_level = match lookup("LOG_LEVEL").as_deref().unwrap_or("info") {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = parse_or(&lookup, "API_REQUEST_TIMEOUT_SECONDS", 30)?;

        let session_ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        if session_ttl_hours <= 0 {
            return Err(eyre!("SESSION_TTL_HOURS must be positive"));
        }

        let slot_window = SlotWindow::new(
            parse_or(&lookup, "SLOTS_OPEN_HOUR", DEFAULT_OPEN_HOUR)?,
            parse_or(&lookup, "SLOTS_CLOSE_HOUR", DEFAULT_CLOSE_HOUR)?,
        )
        .wrap_err("Invalid SLOTS_OPEN_HOUR / SLOTS_CLOSE_HOUR")?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            session_ttl_hours,
            slot_window,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value: {}", key, raw)),
        None => Ok(default),
    }
}
