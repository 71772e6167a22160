//! Command handlers
//!
//! Each submodule handles one CLI subcommand. Shared setup (remote client,
//! graph directory, keyword annotator) lives here.

pub mod config;
pub mod journals;
pub mod keywords;
pub mod render;
pub mod sync;

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::debug;

use refgraph_core::{Config, KeywordAnnotator, ZoteroClient};

/// Build the remote client from configuration
pub(crate) fn remote_client(config: &Config) -> Result<ZoteroClient> {
    let Some(user_id) = config.user_id.as_deref() else {
        bail!(
            "Zotero user ID not configured. Set it with:\n  \
             refgraph config set user_id <id>"
        );
    };
    let Some(api_key) = config.api_key.as_deref() else {
        bail!(
            "Zotero API key not configured. Set it with:\n  \
             refgraph config set api_key <key>"
        );
    };

    Ok(match config.api_url.as_deref() {
        Some(url) => ZoteroClient::with_base_url(url, user_id, api_key),
        None => ZoteroClient::new(user_id, api_key),
    })
}

/// The graph directory, or an error explaining how to set it
pub(crate) fn require_graph_dir(config: &Config) -> Result<PathBuf> {
    match &config.graph_dir {
        Some(dir) => Ok(dir.clone()),
        None => bail!(
            "Logseq graph directory not configured. Set it with:\n  \
             refgraph config set graph_dir <path>"
        ),
    }
}

/// Load the keyword annotator when a curated keyword list exists
pub(crate) fn load_annotator(config: &Config) -> Result<Option<KeywordAnnotator>> {
    let Some(path) = config.keywords_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = ?path, "no keyword list, rendering without cross references");
        return Ok(None);
    }
    Ok(Some(KeywordAnnotator::from_file(&path)?))
}
