//! Engine configuration

use crate::error::{Result, WebAcError};
use crate::vocab::DEFAULT_REPOSITORY_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Role cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached role maps
    pub capacity: usize,

    /// Time-to-live for cached role maps, in milliseconds
    pub ttl_millis: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl_millis: 60_000,
        }
    }
}

/// Role resolution engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// URI prefix stripped from link targets and `accessTo` objects
    pub repository_prefix: String,

    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Enable the role cache. Off by default: callers must invalidate it
    /// whenever an ACL or authorization changes.
    pub enable_cache: bool,

    pub cache: CacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repository_prefix: DEFAULT_REPOSITORY_PREFIX.to_string(),
            enable_metrics: true,
            enable_cache: false,
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Defaults overridden by environment variables:
    ///
    /// - `WEBAC_REPOSITORY_PREFIX`
    /// - `WEBAC_ENABLE_METRICS`
    /// - `WEBAC_ENABLE_CACHE`
    /// - `WEBAC_CACHE_CAPACITY`
    /// - `WEBAC_CACHE_TTL_MILLIS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(prefix) = lookup("WEBAC_REPOSITORY_PREFIX") {
            config.repository_prefix = prefix;
        }
        if let Some(raw) = lookup("WEBAC_ENABLE_METRICS") {
            config.enable_metrics = parse_var("WEBAC_ENABLE_METRICS", &raw)?;
        }
        if let Some(raw) = lookup("WEBAC_ENABLE_CACHE") {
            config.enable_cache = parse_var("WEBAC_ENABLE_CACHE", &raw)?;
        }
        if let Some(raw) = lookup("WEBAC_CACHE_CAPACITY") {
            config.cache.capacity = parse_var("WEBAC_CACHE_CAPACITY", &raw)?;
        }
        if let Some(raw) = lookup("WEBAC_CACHE_TTL_MILLIS") {
            config.cache.ttl_millis = parse_var("WEBAC_CACHE_TTL_MILLIS", &raw)?;
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| WebAcError::Config(format!("{} has invalid value '{}'", key, raw)))
}
