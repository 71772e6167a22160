//! Document cache persistence
//!
//! Stores one JSON file per document under the configured data directory,
//! named `{key}.json`. Uses atomic writes (write to temp file, then rename)
//! to prevent corruption.
//!
//! Storage location: `~/.local/share/refgraph/documents/` (configurable via
//! `Config`)

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Document;

/// Filesystem cache holding the local copy of the document library
pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    /// Open the cache at the given directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
        Ok(Self { dir })
    }

    /// The cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache file for a document key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Check if a document is cached
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Load a cached document
    ///
    /// Returns `None` if the document has never been cached.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self, key: &str) -> Result<Option<Document>> {
        let path = self.path_for(key);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read document from {:?}", path))
            }
        };

        let document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse document from {:?}", path))?;

        Ok(Some(document))
    }

    /// Save a document using atomic write
    ///
    /// This writes to a temporary file first, then renames it to the target
    /// path, so the cache entry is never left in a partially-written state.
    /// An existing entry for the same key is replaced wholesale.
    pub fn store(&self, document: &Document) -> Result<()> {
        let path = self.path_for(&document.key);
        let bytes = serde_json::to_vec(document)
            .with_context(|| format!("Failed to serialize document {}", document.key))?;

        atomic_write(&path, &bytes)
            .with_context(|| format!("Failed to save document to {:?}", path))
    }

    /// Remove a cached document, if present
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
        }
        Ok(())
    }

    /// List all cached document keys, in sorted order
    pub fn keys(&self) -> Result<BTreeSet<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read cache directory {:?}", self.dir))?;

        let mut keys = BTreeSet::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read cache directory {:?}", self.dir))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.insert(stem.to_string());
            }
        }

        Ok(keys)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;

    file.write_all(data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;

    // Sync to disk before rename
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    // Atomic rename
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Highlight, Note};
    use tempfile::TempDir;

    fn sample_document(key: &str, version: i64) -> Document {
        Document {
            key: key.to_string(),
            version,
            title: "A Title".to_string(),
            abstract_text: None,
            collections: vec!["inbox".to_string()],
            annotations: vec![Highlight::new("passage", "2024-04-03T10:15:00Z")],
            notes: vec![Note::new("thought", "2024-04-04T08:00:00Z")],
        }
    }

    #[test]
    fn test_store_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp.path()).unwrap();

        let document = sample_document("KEY1", 3);
        cache.store(&document).unwrap();

        let loaded = cache.load("KEY1").unwrap().unwrap();
        assert_eq!(loaded, document);
        assert!(cache.contains("KEY1"));
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp.path()).unwrap();

        assert!(cache.load("NOPE").unwrap().is_none());
        assert!(!cache.contains("NOPE"));
    }

    #[test]
    fn test_load_corrupt_entry_fails() {
        let temp = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp.path()).unwrap();

        fs::write(cache.path_for("BAD"), "not json").unwrap();
        assert!(cache.load("BAD").is_err());
    }

    #[test]
    fn test_store_replaces_existing_entry() {
        let temp = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp.path()).unwrap();

        cache.store(&sample_document("KEY1", 3)).unwrap();

        let mut updated = sample_document("KEY1", 4);
        updated.annotations.clear();
        cache.store(&updated).unwrap();

        let loaded = cache.load("KEY1").unwrap().unwrap();
        assert_eq!(loaded.version, 4);
        assert!(loaded.annotations.is_empty());
    }

    #[test]
    fn test_keys_lists_sorted_stems() {
        let temp = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp.path()).unwrap();

        cache.store(&sample_document("ZZZ", 1)).unwrap();
        cache.store(&sample_document("AAA", 1)).unwrap();
        // Stray non-JSON files are not document keys
        fs::write(temp.path().join("notes.txt"), "ignore me").unwrap();

        let keys: Vec<String> = cache.keys().unwrap().into_iter().collect();
        assert_eq!(keys, vec!["AAA".to_string(), "ZZZ".to_string()]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp.path()).unwrap();

        cache.store(&sample_document("KEY1", 1)).unwrap();
        cache.remove("KEY1").unwrap();
        assert!(!cache.contains("KEY1"));

        // Removing again is not an error
        cache.remove("KEY1").unwrap();
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("file.json");

        atomic_write(&nested, b"{}").unwrap();
        assert_eq!(fs::read(&nested).unwrap(), b"{}");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("doc.json");

        atomic_write(&target, b"{}").unwrap();
        assert!(!target.with_extension("tmp").exists());
    }
}
