//! Keywords command handler

use anyhow::{bail, Result};

use refgraph_core::keywords;
use refgraph_core::{Config, DocumentCache};

use crate::output::Output;

/// Detect keyword candidates across the cached documents
///
/// Candidates land in `ner_results.txt` inside the keyword directory.
/// The curated `keywords.txt` is never written by this command.
pub fn run(config: &Config, output: &Output) -> Result<()> {
    let Some(candidates_path) = config.keyword_candidates_path() else {
        bail!(
            "Keyword directory not configured. Set it with:\n  \
             refgraph config set keyword_dir <path>"
        );
    };

    let cache = DocumentCache::new(&config.data_dir)?;

    let mut corpus = Vec::new();
    for key in cache.keys()? {
        if let Some(document) = cache.load(&key)? {
            corpus.extend(keywords::document_corpus(&document));
        }
    }

    let candidates = keywords::detect_keywords(&corpus);
    keywords::write_keyword_file(&candidates_path, &candidates)?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "candidates": candidates.len(),
                "path": candidates_path
            })
        );
    } else {
        output.success(&format!(
            "Wrote {} keyword candidate(s) to {}",
            candidates.len(),
            candidates_path.display()
        ));
        output.message("Move the ones worth linking into keywords.txt");
    }

    Ok(())
}
