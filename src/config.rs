//! Configuration management for the LINE bot service

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";
pub const DEFAULT_DATA_API_BASE_URL: &str = "https://api-data.line.me";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3001";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LINE Bot configuration is missing: {variable} must be set")]
    Missing { variable: &'static str },

    #[error("Invalid value for {variable}: {message}")]
    Invalid {
        variable: &'static str,
        message: String,
    },
}

/// A credential that must never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct LineConfig {
    pub channel_secret: Secret,
    pub channel_access_token: Secret,
    pub api_base_url: String,
    pub data_api_base_url: String,
    pub http_timeout: Duration,
    pub rich_menu_image_path: Option<PathBuf>,
    pub frontend_url: String,
    pub port: u16,
}

impl LineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated the same as unset ones.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let channel_secret = get("LINE_CHANNEL_SECRET")
            .map(Secret::new)
            .ok_or(ConfigError::Missing {
                variable: "LINE_CHANNEL_SECRET",
            })?;
        let channel_access_token = get("LINE_CHANNEL_ACCESS_TOKEN")
            .map(Secret::new)
            .ok_or(ConfigError::Missing {
                variable: "LINE_CHANNEL_ACCESS_TOKEN",
            })?;

        let http_timeout_secs = match get("LINE_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                variable: "LINE_HTTP_TIMEOUT_SECS",
                message: e.to_string(),
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                variable: "LINE_HTTP_TIMEOUT_SECS",
                message: "timeout must be greater than zero".to_string(),
            });
        }

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                variable: "PORT",
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(LineConfig {
            channel_secret,
            channel_access_token,
            api_base_url: get("LINE_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            data_api_base_url: get("LINE_DATA_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_DATA_API_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
            rich_menu_image_path: get("RICH_MENU_IMAGE_PATH").map(PathBuf::from),
            frontend_url: get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            port,
        })
    }
}
