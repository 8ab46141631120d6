//! Lookup configuration with TOML persistence.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::SearchMode;
use crate::index::HashAlgorithm;
use crate::types::error::{LookupError, LookupResult};

/// Retrieval budget for a whole lookup when the caller gives none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Hash contexts kept around between derivations.
pub const DEFAULT_HASHER_POOL_SIZE: usize = 16;

/// Tunables for [`FeedLookup`](crate::engine::FeedLookup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Hash function used for topic hashes, identifiers and addresses.
    pub hash: HashAlgorithm,

    /// Sequential or speculative subtree evaluation.
    pub mode: SearchMode,

    /// Whole-lookup budget used by `lookup_latest`.
    pub timeout_secs: u64,

    /// Optional budget for a single fetch. A fetch that overruns it counts as transient.
    pub fetch_timeout_ms: Option<u64>,

    /// Maximum idle hash contexts retained by the pool.
    pub hasher_pool_size: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::default(),
            mode: SearchMode::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fetch_timeout_ms: None,
            hasher_pool_size: DEFAULT_HASHER_POOL_SIZE,
        }
    }
}

impl LookupConfig {
    /// Load configuration from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> LookupResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> LookupResult<Self> {
        toml::from_str(s).map_err(|e| LookupError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> LookupResult<String> {
        toml::to_string_pretty(self).map_err(|e| LookupError::Config(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}
