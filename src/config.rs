//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::CliError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STATE_DIR: &str = ".chatline";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CHATLINE_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `CHATLINE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CHATLINE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CHATLINE_STATE_DIR`: default `.chatline`
    pub fn from_env() -> Result<Self, CliError> {
        let base_url = std::env::var("CHATLINE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let state_dir = std::env::var("CHATLINE_STATE_DIR").unwrap_or_else(|_| DEFAULT_STATE_DIR.to_string());

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            request_timeout_secs: env_parse_u64("CHATLINE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse_u64("CHATLINE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            state_dir: PathBuf::from(state_dir),
        })
    }

    /// Apply a `--base-url` flag over the environment value.
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Result<Self, CliError> {
        if let Some(raw) = base_url {
            self.base_url = parse_base_url(raw)?;
        }
        Ok(self)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_base_url(raw: &str) -> Result<String, CliError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(CliError::InvalidBaseUrl(raw.to_string()))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
