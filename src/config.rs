//! Server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DATA_PATH: &str = "data/food_emissions_with_images.xlsx";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pause enforced between consecutive generation calls
pub const DEFAULT_GENERATION_DELAY_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}

/// Text generation settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Absent key disables generation entirely
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub delay: Duration,
    /// Per-call HTTP timeout
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub port: u16,
    /// Whole-request timeout applied by the HTTP layer
    pub request_timeout: Duration,
    pub generation: GenerationConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Optional:
    /// - `DATA_PATH`: Emissions dataset (default: `data/food_emissions_with_images.xlsx`)
    /// - `PORT`: Listen port (default: 8000)
    /// - `GEMINI_API_KEY`: Enables text generation when set
    /// - `GEMINI_MODEL`: Model name (default: "gemini-1.5-flash")
    /// - `GEMINI_BASE_URL`: API base URL
    /// - `GENERATION_DELAY_MS`: Minimum gap between generation calls (default: 2000)
    /// - `REQUEST_TIMEOUT_SECS`: HTTP request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_path = get("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let delay_ms = parse_or(
            get("GENERATION_DELAY_MS"),
            "GENERATION_DELAY_MS",
            DEFAULT_GENERATION_DELAY_MS,
        )?;
        let timeout_secs = parse_or(
            get("REQUEST_TIMEOUT_SECS"),
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let request_timeout = Duration::from_secs(timeout_secs);

        let generation = GenerationConfig {
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            delay: Duration::from_millis(delay_ms),
            timeout: request_timeout,
        };

        Ok(Self {
            data_path,
            port,
            request_timeout,
            generation,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}
