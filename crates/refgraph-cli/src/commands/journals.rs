//! Journals command handler

use anyhow::Result;

use refgraph_core::{backfill_journal_pages, Config};

use crate::output::Output;

/// Backfill journal pages for the last `days` days
pub fn run(config: &Config, days: Option<u32>, output: &Output) -> Result<()> {
    let graph_dir = super::require_graph_dir(config)?;
    let days = days.unwrap_or(config.journal_days);

    let created = backfill_journal_pages(&graph_dir, days)?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "days": days,
                "journals_created": created
            })
        );
    } else {
        output.success(&format!(
            "Created {} journal page(s) over the last {} day(s)",
            created, days
        ));
    }

    Ok(())
}
