//! Data-layer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; with none set the facade runs on the local
//! fallback engine.
//!
//! - `BAZARLINK_SUPABASE_URL` - Remote service URL (alias: `VITE_SUPABASE_URL`)
//! - `BAZARLINK_SUPABASE_ANON_KEY` - Remote anon key (alias: `VITE_SUPABASE_ANON_KEY`)
//! - `BAZARLINK_DATA_DIR` - Directory for the fallback engine's files (default: `.bazarlink`)
//! - `BAZARLINK_HTTP_TIMEOUT_SECS` - Remote connect/request timeout (default: 10)
//! - `BAZARLINK_SEED_DEMO_DATA` - Seed demo records when the fallback store is empty (default: false)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Placeholder the remote URL ships with in `.env.example`.
pub const PLACEHOLDER_URL: &str = "your-supabase-url";

/// Placeholder the remote key ships with in `.env.example`.
pub const PLACEHOLDER_ANON_KEY: &str = "your-supabase-anon-key";

const DEFAULT_DATA_DIR: &str = ".bazarlink";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Data-layer configuration.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Remote service URL, if configured.
    pub supabase_url: Option<String>,
    /// Remote anon key, if configured.
    pub supabase_anon_key: Option<SecretString>,
    /// Directory holding the fallback engine's collections.
    pub data_dir: PathBuf,
    /// Timeout applied to every remote request.
    pub http_timeout: Duration,
    /// Seed demo records on first start of the fallback engine.
    pub seed_demo_data: bool,
}

/// Validated credentials for the remote engine.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Service base URL (e.g., `https://xyzcompany.supabase.co`).
    pub url: String,
    /// Anon (public) API key.
    pub anon_key: SecretString,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            seed_demo_data: false,
        }
    }
}

impl DataConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric or boolean variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric or boolean variable is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = first_present(&lookup, &["BAZARLINK_SUPABASE_URL", "VITE_SUPABASE_URL"]);
        let supabase_anon_key = first_present(
            &lookup,
            &["BAZARLINK_SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"],
        )
        .map(SecretString::from);

        let data_dir = lookup("BAZARLINK_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let http_timeout = match lookup("BAZARLINK_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "BAZARLINK_HTTP_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let seed_demo_data = match lookup("BAZARLINK_SEED_DEMO_DATA") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "BAZARLINK_SEED_DEMO_DATA".to_string(),
                    format!("expected true/false, got '{raw}'"),
                )
            })?,
            None => false,
        };

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            data_dir,
            http_timeout,
            seed_demo_data,
        })
    }

    /// Remote credentials, if both are present and neither is a placeholder.
    #[must_use]
    pub fn remote(&self) -> Option<RemoteConfig> {
        let url = self.supabase_url.as_deref()?;
        let key = self.supabase_anon_key.as_ref()?;

        if url == PLACEHOLDER_URL || key.expose_secret() == PLACEHOLDER_ANON_KEY {
            return None;
        }

        Some(RemoteConfig {
            url: url.to_string(),
            anon_key: key.clone(),
            timeout: self.http_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// First non-empty value among `keys`.
fn first_present<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
}

/// Parse a boolean flag.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
