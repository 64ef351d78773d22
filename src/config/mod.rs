//! Configuration module for the admin core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Output format for the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the admin REST backend
    pub api_base_url: String,
    /// Fixed timeout applied to every backend request
    pub request_timeout: Duration,
    /// Address the metadata API binds to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Default page size for list views
    pub page_size: u32,
    /// Optional JSON file holding the persisted session
    pub session_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/backend-api".to_string(),
            request_timeout: Duration::from_millis(30_000),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            page_size: 20,
            session_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_base_url = env::var("ADMIN_API_BASE_URL").unwrap_or(defaults.api_base_url);
        url::Url::parse(&api_base_url)?;

        let request_timeout = match env::var("ADMIN_REQUEST_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(parse_number(&raw, "ADMIN_REQUEST_TIMEOUT_MS")?),
            Err(_) => defaults.request_timeout,
        };

        let bind_addr = match env::var("ADMIN_BIND_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::Configuration(format!("Invalid ADMIN_BIND_ADDR format: {}", raw))
            })?,
            Err(_) => defaults.bind_addr,
        };

        let log_level = env::var("ADMIN_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match env::var("ADMIN_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => {
                return Err(AppError::Configuration(format!(
                    "Invalid ADMIN_LOG_FORMAT: {}",
                    other
                )))
            }
        };

        let page_size = match env::var("ADMIN_PAGE_SIZE") {
            Ok(raw) => {
                let size: u32 = parse_number(&raw, "ADMIN_PAGE_SIZE")?;
                if size == 0 {
                    return Err(AppError::Configuration(
                        "ADMIN_PAGE_SIZE must be greater than zero".to_string(),
                    ));
                }
                size
            }
            Err(_) => defaults.page_size,
        };

        let session_path = env::var("ADMIN_SESSION_PATH").ok().map(PathBuf::from);

        Ok(Self {
            api_base_url,
            request_timeout,
            bind_addr,
            log_level,
            log_format,
            page_size,
            session_path,
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {} value: {}", key, raw)))
}
