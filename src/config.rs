//! Explorer configuration, persisted as TOML.
//!
//! Every field has a serde default, so a config file only needs to name the
//! values it changes. `IDEA_GRAPH_ENDPOINT` overrides the endpoint.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding [`ExplorerConfig::endpoint`].
pub const ENDPOINT_ENV: &str = "IDEA_GRAPH_ENDPOINT";

/// Configuration for the explorer and its Query Layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// SPARQL query endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of works fetched for the overview.
    #[serde(default = "default_overview_limit")]
    pub overview_limit: usize,
    /// Maximum visible label length in characters (hover text is never cut).
    #[serde(default = "default_label_max_len")]
    pub label_max_len: usize,
    /// Hop bound for work traversal (1..=3).
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    /// Number of keywords in the keyword cloud.
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,
}

fn default_endpoint() -> String {
    "http://localhost:3030/idea_kg/sparql".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_overview_limit() -> usize {
    500
}
fn default_label_max_len() -> usize {
    40
}
fn default_max_hops() -> usize {
    3
}
fn default_keyword_limit() -> usize {
    30
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            overview_limit: default_overview_limit(),
            label_max_len: default_label_max_len(),
            max_hops: default_max_hops(),
            keyword_limit: default_keyword_limit(),
        }
    }
}

impl ExplorerConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), endpoint = %config.endpoint, "loaded config");
        Ok(config)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `IDEA_GRAPH_ENDPOINT` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint.trim().to_string();
            }
        }
        self
    }

    /// Reject values the explorer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "endpoint must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "timeout_secs must be > 0".into(),
            });
        }
        if !(1..=3).contains(&self.max_hops) {
            return Err(ConfigError::Invalid {
                message: format!("max_hops must be between 1 and 3, got {}", self.max_hops),
            });
        }
        if self.label_max_len == 0 {
            return Err(ConfigError::Invalid {
                message: "label_max_len must be > 0".into(),
            });
        }
        Ok(())
    }
}
