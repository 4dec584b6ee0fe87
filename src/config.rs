use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::pipeline::DEFAULT_CONNECTION_COOLDOWN;
use crate::pushshift::client::DEFAULT_API_URL;
use crate::pushshift::retry::{RetryPolicy, DEFAULT_BASE_BACKOFF, DEFAULT_MAX_RETRIES};

/// Runtime settings loaded from environment variables.
///
/// Everything has a default, so an empty environment is a working setup.
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Search API base URL (PUSHSHIFT_API_URL).
    pub api_url: String,
    /// 429 retry behaviour (OVERLAP_MAX_RETRIES, OVERLAP_RETRY_BASE_SECS).
    pub retry: RetryPolicy,
    /// Wait before skipping an author whose request failed to connect
    /// (OVERLAP_CONNECTION_COOLDOWN_SECS).
    pub connection_cooldown: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_retries = parse_var(&lookup, "OVERLAP_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES);
        let base_backoff = parse_var(&lookup, "OVERLAP_RETRY_BASE_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BASE_BACKOFF);
        let connection_cooldown = parse_var(&lookup, "OVERLAP_CONNECTION_COOLDOWN_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONNECTION_COOLDOWN);

        Ok(Self {
            api_url: lookup("PUSHSHIFT_API_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            retry: RetryPolicy {
                max_retries,
                base_backoff,
            },
            connection_cooldown,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}
