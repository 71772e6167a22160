//! Logseq graph rendering
//!
//! Renders cached documents into `pages/` and backfills `journals/`.
//! Page rendering is deterministic: rendering the same cached document
//! twice produces byte-identical output, so unchanged pages never show
//! up as modified.

pub mod date;
mod journal;

pub use journal::backfill_journal_pages;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{atomic_write, DocumentCache};
use crate::keywords::KeywordAnnotator;
use crate::models::{Document, Highlight, Note};

/// Template file name, both for the shipped default and for overrides
pub const TEMPLATE_NAME: &str = "document_page.md";

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/document_page.md");

/// What a page entry originally was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Note,
    Highlight,
}

/// One rendered line of a document page
///
/// The kind is fixed when the entry is built from its source record, so
/// later merging and sorting cannot misattribute it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEntry {
    pub kind: EntryKind,
    pub text: String,
    pub mtime: String,
}

impl PageEntry {
    fn from_note(note: &Note) -> Self {
        Self {
            kind: EntryKind::Note,
            text: note.text.clone(),
            mtime: note.mtime.clone(),
        }
    }

    fn from_highlight(highlight: &Highlight) -> Self {
        Self {
            kind: EntryKind::Highlight,
            text: highlight.text.clone(),
            mtime: highlight.mtime.clone(),
        }
    }
}

/// Renders document pages from the cache into a Logseq graph
pub struct GraphWriter<'a> {
    cache: &'a DocumentCache,
    pages_dir: PathBuf,
    env: Environment<'static>,
    annotator: Option<KeywordAnnotator>,
}

impl<'a> GraphWriter<'a> {
    /// Create a writer for the given graph directory
    ///
    /// When `template_dir` is set, `document_page.md` inside it replaces
    /// the shipped template. The annotator, when present, rewrites entry
    /// text with `[[keyword]]` cross references before rendering.
    pub fn new(
        cache: &'a DocumentCache,
        graph_dir: &Path,
        template_dir: Option<&Path>,
        annotator: Option<KeywordAnnotator>,
    ) -> Result<Self> {
        let source = match template_dir {
            Some(dir) => {
                let path = dir.join(TEMPLATE_NAME);
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template {:?}", path))?
            }
            None => DEFAULT_TEMPLATE.to_string(),
        };

        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source)
            .context("Invalid document page template")?;

        let pages_dir = graph_dir.join("pages");
        fs::create_dir_all(&pages_dir)
            .with_context(|| format!("Failed to create pages directory {:?}", pages_dir))?;

        Ok(Self {
            cache,
            pages_dir,
            env,
            annotator,
        })
    }

    /// Render one cached document into its page
    ///
    /// Documents without any notes or highlights produce no page; returns
    /// the page path when one was written.
    pub fn render_document_page(&self, key: &str) -> Result<Option<PathBuf>> {
        let document = self
            .cache
            .load(key)?
            .ok_or_else(|| anyhow!("Document {} is not in the cache", key))?;

        let entries = self.page_entries(&document)?;
        if entries.is_empty() {
            debug!(key = %key, "document has no entries, skipping page");
            return Ok(None);
        }

        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .context("Document page template is not loaded")?;
        let mut page = template
            .render(context! { document => &document, entries => &entries })
            .with_context(|| format!("Failed to render page for document {}", key))?;
        // The engine trims the template's trailing newline; pages end with one
        if !page.ends_with('\n') {
            page.push('\n');
        }

        let path = self.page_path(&document.title);
        atomic_write(&path, page.as_bytes())
            .with_context(|| format!("Failed to write page {:?}", path))?;
        Ok(Some(path))
    }

    /// Render every cached document; returns how many pages were written
    pub fn render_all(&self) -> Result<usize> {
        let mut written = 0;
        let mut rendered: HashMap<PathBuf, String> = HashMap::new();

        for key in self.cache.keys()? {
            if let Some(path) = self.render_document_page(&key)? {
                if let Some(previous) = rendered.insert(path.clone(), key.clone()) {
                    warn!(
                        first = %previous,
                        second = %key,
                        page = ?path,
                        "documents render to the same page, the later one wins"
                    );
                }
                written += 1;
            }
        }

        Ok(written)
    }

    /// Delete the page for a cached document, if it exists
    pub fn remove_document_page(&self, key: &str) -> Result<()> {
        let document = self
            .cache
            .load(key)?
            .ok_or_else(|| anyhow!("Document {} is not in the cache", key))?;

        let path = self.page_path(&document.title);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to delete page {:?}", path))?;
        }
        Ok(())
    }

    /// Where the page for a given title lives
    pub fn page_path(&self, title: &str) -> PathBuf {
        self.pages_dir.join(format!("{}.md", sanitize_title(title)))
    }

    /// Merge a document's notes and highlights into display order
    ///
    /// Entries are sorted by raw timestamp ascending; the sort is stable,
    /// so same-timestamp notes stay ahead of same-timestamp highlights.
    /// Timestamps are converted to display form afterwards.
    fn page_entries(&self, document: &Document) -> Result<Vec<PageEntry>> {
        let mut entries: Vec<PageEntry> = document
            .notes
            .iter()
            .map(PageEntry::from_note)
            .chain(document.annotations.iter().map(PageEntry::from_highlight))
            .collect();

        entries.sort_by(|a, b| a.mtime.cmp(&b.mtime));

        for entry in &mut entries {
            entry.mtime = date::format_mtime(&entry.mtime).with_context(|| {
                format!(
                    "Invalid timestamp {:?} on document {}",
                    entry.mtime, document.key
                )
            })?;
            if let Some(annotator) = &self.annotator {
                entry.text = annotator.highlight_keywords(&entry.text);
            }
        }

        Ok(entries)
    }
}

/// Make a title usable as a file name
pub fn sanitize_title(title: &str) -> String {
    title.replace('/', "_").replace(':', "_")
}
