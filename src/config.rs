//! Runtime settings.
//!
//! Settings come from the environment (after loading `.env` via `dotenvy`),
//! with CLI flags layered on top by `app`. Lookup is injectable so tests never
//! touch the process environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const ENV_API_KEY: &str = "UNLEASH_API_KEY";
pub const ENV_BASE_URL: &str = "UNLEASH_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "UNLEASH_TIMEOUT_SECS";
pub const ENV_LOG_FILE: &str = "NFTG_LOG_FILE";

pub const DEFAULT_BASE_URL: &str = "https://api.unleashnfts.com/api/v2/nft/wallet/gaming";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Where the TUI writes logs; unset means no logging while the TUI runs.
    pub log_file: Option<PathBuf>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::usage(format!("Missing {ENV_API_KEY} in environment (.env).")))?;

        let base_url = lookup(ENV_BASE_URL)
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let log_file = lookup(ENV_LOG_FILE)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            log_file,
        })
    }

    /// Apply CLI overrides (flags win over environment).
    pub fn with_overrides(mut self, base_url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self, AppError> {
        if let Some(url) = base_url {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(AppError::usage("--base-url must not be empty."));
            }
            self.base_url = url.to_string();
        }
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(AppError::usage("--timeout-secs must be at least 1."));
            }
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::usage(format!(
            "{ENV_TIMEOUT_SECS} must be a positive whole number of seconds (got '{raw}')."
        ))),
    }
}
