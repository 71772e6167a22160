//! refgraph Core Library
//!
//! This crate provides the core functionality for refgraph, a one-way sync
//! from a Zotero library into a Logseq graph.
//!
//! # Architecture
//!
//! - **Cache**: One JSON file per document is the local source of truth
//! - **Sync**: Incremental reconciliation against the remote version listing
//! - **Graph**: Deterministic rendering of cached documents into pages
//!
//! Rendering never talks to the network; everything it needs is in the
//! cache, so pages can be regenerated offline at any time.
//!
//! # Quick Start
//!
//! ```text
//! let cache = DocumentCache::new(&config.data_dir)?;
//! let client = ZoteroClient::new(user_id, api_key);
//!
//! // Pull down whatever is new or changed
//! let summary = Synchronizer::new(&client, &cache).run()?;
//!
//! // Render pages and backfill journals
//! let writer = GraphWriter::new(&cache, &graph_dir, None, None)?;
//! writer.render_all()?;
//! backfill_journal_pages(&graph_dir, config.journal_days)?;
//! ```
//!
//! # Modules
//!
//! - `sync`: Reconciliation between the remote listing and the cache
//! - `zotero`: Blocking client for the Zotero web API
//! - `cache`: Local JSON document store
//! - `graph`: Page and journal rendering
//! - `keywords`: Keyword cross references and candidate detection
//! - `models`: Data structures for documents and their annotations
//! - `config`: Application configuration

pub mod cache;
pub mod config;
pub mod graph;
pub mod keywords;
pub mod models;
pub mod sync;
pub mod zotero;

pub use cache::DocumentCache;
pub use config::Config;
pub use graph::{backfill_journal_pages, EntryKind, GraphWriter, PageEntry};
pub use keywords::KeywordAnnotator;
pub use models::{Document, Highlight, Note, RemoteDocument};
pub use sync::{RemoteLibrary, SyncSummary, Synchronizer};
pub use zotero::{RemoteError, ZoteroClient, DEFAULT_API_URL};
