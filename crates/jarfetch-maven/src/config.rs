//! Fetcher configuration.

use crate::resolver::DEFAULT_MAX_PARENT_DEPTH;
use jarfetch_core::{DEFAULT_CACHE_DIR, DEFAULT_CONNECT_TIMEOUT};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Repository consulted when nothing else is configured.
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetcherConfig {
    /// Local jar cache directory.
    pub cache_dir: PathBuf,
    /// Repository base URLs, highest priority first.
    pub repositories: Vec<String>,
    /// Maximum number of jar downloads in flight.
    pub concurrency: usize,
    pub connect_timeout_secs: u64,
    /// Upper bound on parent POMs walked while filling dangling versions.
    pub max_parent_depth: usize,
}

impl FetcherConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            repositories: vec![MAVEN_CENTRAL.to_string()],
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
        }
    }
}
