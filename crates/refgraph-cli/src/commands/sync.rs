//! Sync command handler

use anyhow::{Context, Result};

use refgraph_core::{backfill_journal_pages, Config, DocumentCache, GraphWriter, Synchronizer};

use crate::output::Output;

/// Sync the remote library, then render pages and backfill journals
pub fn run(config: &Config, output: &Output) -> Result<()> {
    let client = super::remote_client(config)?;
    let graph_dir = super::require_graph_dir(config)?;
    let cache = DocumentCache::new(&config.data_dir)?;

    output.message("Syncing documents...");
    let summary = Synchronizer::new(&client, &cache)
        .run()
        .context("Document sync failed")?;

    let annotator = super::load_annotator(config)?;
    let writer = GraphWriter::new(&cache, &graph_dir, config.template_dir.as_deref(), annotator)?;
    let pages = writer.render_all()?;
    let journals = backfill_journal_pages(&graph_dir, config.journal_days)?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "added": summary.added,
                "updated": summary.updated,
                "unchanged": summary.unchanged,
                "pages_rendered": pages,
                "journals_created": journals
            })
        );
    } else {
        output.success(&format!(
            "Sync complete - {} added, {} updated, {} unchanged",
            summary.added, summary.updated, summary.unchanged
        ));
        output.message(&format!(
            "  Pages rendered: {}, journal pages created: {}",
            pages, journals
        ));
    }

    Ok(())
}
