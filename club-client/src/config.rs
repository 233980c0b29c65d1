//! Client configuration

use chrono_tz::Tz;

use crate::error::{ClientError, ClientResult};

/// Client configuration for connecting to the hosted club backend
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | CLUB_API_URL | (required) | Backend project URL |
/// | CLUB_ANON_KEY | (required) | Public API key sent with every request |
/// | CLUB_TIMEOUT_SECS | 30 | Request timeout in seconds |
/// | CLUB_TIMEZONE | UTC | IANA timezone the club operates in |
/// | CLUB_LOG_LEVEL | info | Default log level (`RUST_LOG` overrides) |
/// | CLUB_LOG_DIR | (unset) | Directory for daily rolling log files |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://project.example.co")
    pub base_url: String,

    /// Public API key
    pub anon_key: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Club timezone: decides what "today" and a slot's wall-clock time mean
    pub timezone: Tz,

    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Log directory; logs go to stdout when unset
    pub log_dir: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout: 30,
            timezone: Tz::UTC,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    /// Load configuration from the environment (and `.env`, if present)
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::new(
            std::env::var("CLUB_API_URL").unwrap_or_default(),
            std::env::var("CLUB_ANON_KEY").unwrap_or_default(),
        );

        if let Ok(raw) = std::env::var("CLUB_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => config.timeout = secs,
                Err(_) => tracing::warn!("Ignoring invalid CLUB_TIMEOUT_SECS '{}'", raw),
            }
        }
        if let Ok(raw) = std::env::var("CLUB_TIMEZONE") {
            match raw.parse::<Tz>() {
                Ok(tz) => config.timezone = tz,
                Err(_) => tracing::warn!("Ignoring unknown CLUB_TIMEZONE '{}', using UTC", raw),
            }
        }
        if let Ok(level) = std::env::var("CLUB_LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = std::env::var("CLUB_LOG_DIR").ok().filter(|d| !d.is_empty());

        config
    }

    /// Check that the required connection settings are present
    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::Config("CLUB_API_URL is required".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ClientError::Config("CLUB_ANON_KEY is required".into()));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the club timezone
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the default log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Write logs to daily files in `dir`
    pub fn with_log_dir(mut self, dir: impl Into<String>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}
