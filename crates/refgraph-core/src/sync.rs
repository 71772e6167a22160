//! Incremental library sync
//!
//! Compares the remote `key -> version` listing against the local cache and
//! fetches whatever is missing or stale. A cache miss is an add, a version
//! mismatch replaces the cached entry wholesale, and matching versions are
//! left untouched. Items that disappear from the remote listing are kept
//! locally and reported.
//!
//! Any remote or cache failure aborts the pass; the next run picks up where
//! this one left off, since completed documents are already on disk.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::DocumentCache;
use crate::models::{Document, Highlight, Note, RemoteDocument};
use crate::zotero::RemoteError;

/// Read access to a remote bibliographic library
///
/// `ZoteroClient` is the production implementation; tests substitute
/// in-memory fakes.
pub trait RemoteLibrary {
    /// The `key -> version` listing for every item in the library
    fn item_versions(&self) -> Result<BTreeMap<String, i64>, RemoteError>;

    /// Bibliographic metadata for one item, or `None` if the item is not
    /// a document
    fn document(&self, key: &str) -> Result<Option<RemoteDocument>, RemoteError>;

    /// The item's standalone child notes
    fn child_notes(&self, parent_key: &str) -> Result<Vec<Note>, RemoteError>;

    /// Highlights and notes from the item's attachments
    fn attachment_annotations(
        &self,
        parent_key: &str,
    ) -> Result<(Vec<Highlight>, Vec<Note>), RemoteError>;
}

/// Counts of what a sync pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.added + self.updated + self.unchanged
    }
}

/// Drives one sync pass against a remote library
pub struct Synchronizer<'a, R: RemoteLibrary> {
    remote: &'a R,
    cache: &'a DocumentCache,
}

impl<'a, R: RemoteLibrary> Synchronizer<'a, R> {
    pub fn new(remote: &'a R, cache: &'a DocumentCache) -> Self {
        Self { remote, cache }
    }

    /// Fetch the remote version listing and reconcile the cache against it
    pub fn run(&self) -> Result<SyncSummary> {
        let versions = self.remote.item_versions()?;
        self.reconcile(&versions)
    }

    /// Reconcile the cache against a remote version listing
    pub fn reconcile(&self, remote_versions: &BTreeMap<String, i64>) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        for (key, version) in remote_versions {
            match self.cache.load(key)? {
                None => {
                    if self.fetch_and_store(key)? {
                        debug!(key = %key, "added document");
                        summary.added += 1;
                    }
                }
                Some(cached) if cached.version != *version => {
                    info!(
                        key = %key,
                        from = cached.version,
                        to = *version,
                        "updating document"
                    );
                    if self.fetch_and_store(key)? {
                        summary.updated += 1;
                    } else {
                        // The item is no longer a document; drop the stale entry
                        self.cache.remove(key)?;
                    }
                }
                Some(_) => summary.unchanged += 1,
            }
        }

        let orphaned = self
            .cache
            .keys()?
            .into_iter()
            .filter(|key| !remote_versions.contains_key(key))
            .count();
        if orphaned > 0 {
            warn!(
                count = orphaned,
                "cached documents no longer present remotely were left in place"
            );
        }

        Ok(summary)
    }

    /// Fetch one item with all its annotations and store it
    ///
    /// Returns `false` when the item turned out not to be a document.
    fn fetch_and_store(&self, key: &str) -> Result<bool> {
        let Some(meta) = self.remote.document(key)? else {
            debug!(key = %key, "skipping non-document item");
            return Ok(false);
        };

        let (highlights, mut notes) = self.remote.attachment_annotations(key)?;
        notes.extend(self.remote.child_notes(key)?);

        let document = Document::from_remote(meta, highlights, notes);
        self.cache.store(&document)?;
        Ok(true)
    }
}
