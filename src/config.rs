use std::{env, path::Path, time::Duration};

pub const DEFAULT_SOCKET_SERVER_URL: &str = "http://localhost:3333";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_STREAM_BUFFER_CAPACITY: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend serving `/transaction/getHistory`
    pub server_url: String,
    /// Realtime event endpoint
    pub socket_server_url: String,
    pub page_size: usize,
    /// Records kept per realtime tab; 0 keeps everything
    pub stream_buffer_capacity: usize,
    pub request_timeout: Duration,
    pub rust_log: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to load env file: {0}")]
    EnvFile(#[from] dotenv::Error),
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SERVER_URL` (required)
    /// - `SOCKET_SERVER_URL` (default: http://localhost:3333)
    /// - `PAGE_SIZE` (default: 50)
    /// - `STREAM_BUFFER_CAPACITY` (default: 1000, 0 = unbounded)
    /// - `REQUEST_TIMEOUT_SECS` (default: 10)
    /// - `RUST_LOG` (default: info)
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = env::var("SERVER_URL")
            .map_err(|_| ConfigError::MissingVariable("SERVER_URL".to_string()))?;
        validate_url("SERVER_URL", &server_url)?;

        let socket_server_url = env::var("SOCKET_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SOCKET_SERVER_URL.to_string());
        validate_url("SOCKET_SERVER_URL", &socket_server_url)?;

        let page_size = parse_or_default("PAGE_SIZE", DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "PAGE_SIZE must be greater than zero".to_string(),
            ));
        }

        let stream_buffer_capacity =
            parse_or_default("STREAM_BUFFER_CAPACITY", DEFAULT_STREAM_BUFFER_CAPACITY);

        let request_timeout = Duration::from_secs(parse_or_default(
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ));

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            server_url,
            socket_server_url,
            page_size,
            stream_buffer_capacity,
            request_timeout,
            rust_log,
        })
    }

    /// Load `path` into the environment (existing variables win), then read
    /// the configuration
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenv::from_path(path.as_ref())?;
        Self::from_env()
    }
}

fn validate_url(name: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidValue(format!(
            "{} must start with http:// or https://",
            name
        )));
    }
    Ok(())
}

fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid {} '{}', defaulting to {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
