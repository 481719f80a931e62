use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Main configuration structure
///
/// Only the service-facing binaries (`ingest`, `search`) load this; the
/// offline evaluators take every input as a command-line path.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub solr: SolrConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
}

/// Search service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SolrConfig {
    /// Collection base URL, e.g. "http://localhost:8983/solr/passages".
    /// The client derives the select and update endpoints from it.
    pub base_url: String,
    /// Hits requested per query.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Stored field holding the document identifier.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Default field queries are matched against.
    #[serde(default = "default_search_field")]
    pub search_field: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Document feeding configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexingConfig {
    /// Documents sent to the service per update request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Issue a commit after the last batch.
    #[serde(default = "default_commit")]
    pub commit: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            commit: default_commit(),
        }
    }
}

fn default_rows() -> usize {
    100
}

fn default_id_field() -> String {
    "passage_id".to_string()
}

fn default_search_field() -> String {
    "passage".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    1000
}

fn default_commit() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in IREVAL_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("IREVAL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        Url::parse(&self.solr.base_url)
            .with_context(|| format!("solr.base_url is not a valid URL: {}", self.solr.base_url))?;

        if self.solr.rows == 0 {
            anyhow::bail!("solr.rows must be greater than 0");
        }

        if self.solr.id_field.trim().is_empty() {
            anyhow::bail!("solr.id_field must not be empty");
        }

        if self.solr.timeout_secs == 0 {
            anyhow::bail!("solr.timeout_secs must be greater than 0");
        }

        if self.indexing.batch_size == 0 {
            anyhow::bail!("indexing.batch_size must be greater than 0");
        }

        Ok(())
    }
}
