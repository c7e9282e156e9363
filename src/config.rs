//! Runtime settings resolved from the environment.
//!
//! `main` loads `.env` through `dotenvy` before anything reads these, so a
//! local `.env` file and real environment variables behave the same.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default env var holding the registry token.
pub const DEFAULT_TOKEN_ENV: &str = "FIGMA_TOKEN";
/// Default registry REST base URL.
pub const DEFAULT_API_BASE: &str = "https://api.figma.com";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Name of the env var the token provider reads.
    pub token_env: String,
    /// Registry REST base URL, without trailing slash.
    pub api_base: String,
    /// Per-request timeout for the live registry adapter.
    pub http_timeout: Duration,
    /// Cassette path to record port interactions to, if any.
    pub record_path: Option<PathBuf>,
    /// Cassette path to replay port interactions from, if any.
    pub replay_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            record_path: None,
            replay_path: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error string if `PROPAUDIT_HTTP_TIMEOUT_SECS` is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to a value.
    ///
    /// # Errors
    ///
    /// Returns an error string if the timeout value is malformed, or if both
    /// a record and a replay cassette are requested.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout = match non_empty("PROPAUDIT_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| {
                    format!("PROPAUDIT_HTTP_TIMEOUT_SECS must be a positive integer: {e}")
                })?;
                if secs == 0 {
                    return Err("PROPAUDIT_HTTP_TIMEOUT_SECS must be greater than zero".into());
                }
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        let record_path = non_empty("PROPAUDIT_RECORD").map(PathBuf::from);
        let replay_path = non_empty("PROPAUDIT_REPLAY").map(PathBuf::from);
        if record_path.is_some() && replay_path.is_some() {
            return Err("PROPAUDIT_RECORD and PROPAUDIT_REPLAY are mutually exclusive".into());
        }

        Ok(Self {
            token_env: non_empty("PROPAUDIT_TOKEN_ENV").unwrap_or(defaults.token_env),
            api_base: non_empty("PROPAUDIT_API_BASE")
                .map_or(defaults.api_base, |v| v.trim_end_matches('/').to_string()),
            http_timeout,
            record_path,
            replay_path,
        })
    }
}
