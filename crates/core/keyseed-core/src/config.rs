//! Configuration management and environment variable loading

use crate::expander::ModifierConfig;
use crate::extractor::ExtractionMode;
use crate::fetcher::DEFAULT_ENDPOINT;
use crate::{KeyseedError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default suggestion language (`hl`)
pub const DEFAULT_LANGUAGE: &str = "fr";
/// Default suggestion region (`gl`)
pub const DEFAULT_REGION: &str = "fr";
/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Largest worker pool accepted
pub const MAX_CONCURRENCY: usize = 32;

/// Load environment variables from a .env file
///
/// Returns the path of the loaded file. A missing file is not an error;
/// system environment variables are used as-is. Nothing is logged here so
/// the caller can load the file before installing the subscriber.
pub fn load_env() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(dotenvy::Error::LineParse(line, pos)) => Err(KeyseedError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => Ok(None),
        Err(e) => Err(KeyseedError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Settings for one expansion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Autocomplete endpoint
    pub endpoint: String,
    /// Suggestion language (`hl`)
    pub language: String,
    /// Suggestion region (`gl`)
    pub region: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Concurrent in-flight requests; 1 means sequential
    pub concurrency: usize,
    /// Token extraction strategy
    pub extraction: ExtractionMode,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: 1,
            extraction: ExtractionMode::default(),
        }
    }
}

impl SuggestConfig {
    /// Read settings from `KEYSEED_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: get_env_or("KEYSEED_ENDPOINT", &defaults.endpoint),
            language: get_env_or("KEYSEED_LANGUAGE", &defaults.language),
            region: get_env_or("KEYSEED_REGION", &defaults.region),
            timeout_secs: get_env_int("KEYSEED_TIMEOUT_SECS", defaults.timeout_secs),
            concurrency: get_env_int("KEYSEED_CONCURRENCY", defaults.concurrency),
            extraction: env::var("KEYSEED_EXTRACTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.extraction),
        }
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Worker pool size clamped to `1..=MAX_CONCURRENCY`
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(KeyseedError::config("endpoint cannot be empty"));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(KeyseedError::config(format!(
                "Invalid endpoint '{}'. Must start with http:// or https://",
                endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(KeyseedError::config("timeout must be at least 1 second"));
        }
        if self.language.trim().is_empty() || self.region.trim().is_empty() {
            return Err(KeyseedError::config("language and region cannot be empty"));
        }
        Ok(())
    }
}

impl ModifierConfig {
    /// Read modifier selection from the environment
    ///
    /// `KEYSEED_CUSTOM_MODIFIERS` is a comma-separated list.
    pub fn from_env() -> Self {
        Self {
            include_interrogative: get_env_bool("KEYSEED_INTERROGATIVE", true),
            include_transactional: get_env_bool("KEYSEED_TRANSACTIONAL", true),
            custom_modifiers: env::var("KEYSEED_CUSTOM_MODIFIERS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        }
    }
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
