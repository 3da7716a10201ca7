//! Application configuration.
//!
//! Configuration is environment-driven: the backend base address comes from
//! `LINKIFY_API_URL` with a fixed local-development fallback, the data
//! directory may be overridden with `LINKIFY_DATA_DIR`, and an embedding
//! host hands down its channel endpoint via `LINKIFY_HOST_CHANNEL`.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Fallback backend address used when `LINKIFY_API_URL` is absent.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Environment variable carrying the backend base address.
pub const API_URL_ENV: &str = "LINKIFY_API_URL";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LINKIFY_DATA_DIR";

/// Environment variable an embedding host sets to hand down its channel
/// endpoint. Its presence is the embedding signal; its value is the
/// endpoint path.
pub const HOST_CHANNEL_ENV: &str = "LINKIFY_HOST_CHANNEL";

/// Runtime configuration for the companion application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base address of the backend API.
    pub api_base_url: String,
    /// Override for the data directory; `None` uses the platform default.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Endpoint of the host channel, when an embedding host supplied one.
    #[serde(default)]
    pub host_channel: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            host_channel: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let api_base_url =
            env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let host_channel = env::var_os(HOST_CHANNEL_ENV).map(PathBuf::from);

        Self {
            api_base_url,
            data_dir,
            host_channel,
        }
    }

    /// Returns the OAuth entry URL on the configured backend.
    pub fn oauth_login_url(&self) -> String {
        format!("{}/auth/google", self.api_base_url.trim_end_matches('/'))
    }
}
