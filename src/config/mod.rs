// src/config/mod.rs
//! Service configuration loaded from TOML.
//!
//! Lookup order:
//! 1) `$AGGREGATOR_CONFIG_PATH` (must exist)
//! 2) `config/aggregator.toml`
//! 3) built-in defaults

pub mod sources;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::origin::Origin;
pub use sources::{SourceConfig, SourcesConfig};

pub const DEFAULT_CONFIG_PATH: &str = "config/aggregator.toml";
pub const ENV_CONFIG_PATH: &str = "AGGREGATOR_CONFIG_PATH";

const DEFAULT_USER_AGENT: &str = "feed-aggregator/0.1 (+https://github.com/feed-aggregator)";

fn default_refresh_interval_secs() -> u64 {
    300
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Background refresh period. 0 disables the scheduler.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Per-request HTTP timeout for source adapters.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// GitHub rejects requests without a user agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            sources: SourcesConfig::default(),
        }
    }
}

impl AggregatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AggregatorConfig = toml::from_str(s).context("parsing aggregator config")?;
        Ok(cfg.sanitized())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load using env var + fallbacks (see module docs).
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            return Self::load_from(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    pub fn source(&self, origin: Origin) -> &SourceConfig {
        self.sources.get(origin)
    }

    fn sanitized(mut self) -> Self {
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        self
    }
}
