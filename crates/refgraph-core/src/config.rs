//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/refgraph/config.toml)
//! 3. Environment variables (REFGRAPH_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "REFGRAPH";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Zotero user ID
    #[serde(default)]
    pub user_id: Option<String>,

    /// Zotero API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Zotero API base URL (defaults to the public web API)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Directory for the local document cache
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Root of the Logseq graph (contains pages/ and journals/)
    #[serde(default)]
    pub graph_dir: Option<PathBuf>,

    /// Directory holding a custom page template (optional)
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Directory holding keyword lists (optional)
    #[serde(default)]
    pub keyword_dir: Option<PathBuf>,

    /// How many days of journal pages to backfill
    #[serde(default = "default_journal_days")]
    pub journal_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: None,
            api_key: None,
            api_url: None,
            data_dir: default_data_dir(),
            graph_dir: None,
            template_dir: None,
            keyword_dir: None,
            journal_days: default_journal_days(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (REFGRAPH_USER_ID, REFGRAPH_API_KEY, ...)
    /// 2. Config file (~/.config/refgraph/config.toml or REFGRAPH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // REFGRAPH_USER_ID
        if let Ok(val) = std::env::var(format!("{}_USER_ID", ENV_PREFIX)) {
            self.user_id = if val.is_empty() { None } else { Some(val) };
        }

        // REFGRAPH_API_KEY
        if let Ok(val) = std::env::var(format!("{}_API_KEY", ENV_PREFIX)) {
            self.api_key = if val.is_empty() { None } else { Some(val) };
        }

        // REFGRAPH_API_URL
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            self.api_url = if val.is_empty() { None } else { Some(val) };
        }

        // REFGRAPH_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // REFGRAPH_GRAPH_DIR
        if let Ok(val) = std::env::var(format!("{}_GRAPH_DIR", ENV_PREFIX)) {
            self.graph_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // REFGRAPH_TEMPLATE_DIR
        if let Ok(val) = std::env::var(format!("{}_TEMPLATE_DIR", ENV_PREFIX)) {
            self.template_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // REFGRAPH_KEYWORD_DIR
        if let Ok(val) = std::env::var(format!("{}_KEYWORD_DIR", ENV_PREFIX)) {
            self.keyword_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // REFGRAPH_JOURNAL_DAYS
        if let Ok(val) = std::env::var(format!("{}_JOURNAL_DAYS", ENV_PREFIX)) {
            if let Ok(days) = val.parse::<u32>() {
                self.journal_days = days;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with REFGRAPH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("refgraph")
            .join("config.toml")
    }

    /// Path of the curated keyword list, if a keyword directory is configured
    pub fn keywords_path(&self) -> Option<PathBuf> {
        self.keyword_dir.as_ref().map(|dir| dir.join("keywords.txt"))
    }

    /// Path of the detected keyword candidates file, if a keyword directory
    /// is configured
    pub fn keyword_candidates_path(&self) -> Option<PathBuf> {
        self.keyword_dir
            .as_ref()
            .map(|dir| dir.join("ner_results.txt"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("refgraph")
        .join("documents")
}

fn default_journal_days() -> u32 {
    90
}
