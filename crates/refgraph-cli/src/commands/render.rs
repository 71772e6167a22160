//! Render command handler

use anyhow::Result;

use refgraph_core::{backfill_journal_pages, Config, DocumentCache, GraphWriter};

use crate::output::Output;

/// Re-render pages and journals from the local cache
///
/// Never talks to the network; useful after editing the template or the
/// keyword list.
pub fn run(config: &Config, output: &Output) -> Result<()> {
    let graph_dir = super::require_graph_dir(config)?;
    let cache = DocumentCache::new(&config.data_dir)?;

    let annotator = super::load_annotator(config)?;
    let writer = GraphWriter::new(&cache, &graph_dir, config.template_dir.as_deref(), annotator)?;
    let pages = writer.render_all()?;
    let journals = backfill_journal_pages(&graph_dir, config.journal_days)?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "pages_rendered": pages,
                "journals_created": journals
            })
        );
    } else {
        output.success(&format!(
            "Rendered {} page(s), created {} journal page(s)",
            pages, journals
        ));
    }

    Ok(())
}
