//! Blocking client for the Zotero web API
//!
//! Wraps the handful of endpoints the sync needs: the version listing,
//! item metadata, child notes, and attachment annotations (PDF annotations
//! served as items, Kindle notebook exports served as zip archives).

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{Highlight, Note, RemoteDocument};
use crate::sync::RemoteLibrary;
use crate::zotero::html;
use crate::zotero::item::{
    AttachmentItem, DocumentItem, HighlightAnnotation, ItemProbe, NoteAnnotation, NoteItem,
    NON_DOCUMENT_TYPES,
};

/// Base URL of the public Zotero web API
pub const DEFAULT_API_URL: &str = "https://api.zotero.org";

/// Errors from the remote library boundary
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("attachment download was {content_type:?}, expected a zip archive")]
    UnexpectedContentType { content_type: String },
    #[error("zip archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to read archive member: {0}")]
    Io(#[from] std::io::Error),
    #[error("no HTML member found in notebook archive")]
    MissingNotebook,
}

/// Client for one user's Zotero library
pub struct ZoteroClient {
    http: reqwest::blocking::Client,
    base_url: String,
    user_id: String,
    api_key: String,
}

impl ZoteroClient {
    /// Create a client against the public web API
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, user_id, api_key)
    }

    /// Create a client against a specific API base URL
    ///
    /// `base_url` should be like `https://api.zotero.org` (a trailing slash
    /// is tolerated).
    pub fn with_base_url(
        base_url: &str,
        user_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Build an items URL; `rest` is appended verbatim after `/items`
    fn items_url(&self, rest: &str) -> String {
        format!("{}/users/{}/items{}", self.base_url, self.user_id, rest)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        debug!(url = %url, "fetching from remote library");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Fetch the `key -> version` listing for the whole library
    pub fn item_versions(&self) -> Result<BTreeMap<String, i64>, RemoteError> {
        self.get_json(&self.items_url("?format=versions"))
    }

    /// Fetch one item's bibliographic metadata
    ///
    /// Returns `None` when the item is not a document (notes, attachments,
    /// and annotations also appear in the version listing).
    pub fn document(&self, key: &str) -> Result<Option<RemoteDocument>, RemoteError> {
        let value: Value = self.get_json(&self.items_url(&format!("/{key}")))?;

        let probe: ItemProbe = serde_json::from_value(value.clone())?;
        if NON_DOCUMENT_TYPES.contains(&probe.data.item_type.as_str()) {
            return Ok(None);
        }

        let item: DocumentItem = serde_json::from_value(value)?;
        Ok(Some(RemoteDocument {
            key: item.key,
            version: item.version,
            title: item.data.title,
            abstract_text: item.data.abstract_text,
            collections: item.data.collections,
        }))
    }

    /// Fetch an item's child notes, split into one note per line
    pub fn child_notes(&self, parent_key: &str) -> Result<Vec<Note>, RemoteError> {
        let items: Vec<NoteItem> =
            self.get_json(&self.items_url(&format!("/{parent_key}/children?itemType=note")))?;

        let mut notes = Vec::new();
        for item in items {
            for line in html::note_lines(&item.data.html) {
                notes.push(Note::new(line, item.data.mtime.clone()));
            }
        }
        Ok(notes)
    }

    /// Fetch highlights and notes from all of an item's attachments
    ///
    /// PDF attachments carry their annotations as child items. Kindle
    /// notebook exports (`*Notebook.html`) are downloaded and scraped.
    /// Attachments with any other filename are skipped.
    pub fn attachment_annotations(
        &self,
        parent_key: &str,
    ) -> Result<(Vec<Highlight>, Vec<Note>), RemoteError> {
        let attachments: Vec<AttachmentItem> = self.get_json(
            &self.items_url(&format!("/{parent_key}/children?itemType=attachment")),
        )?;

        let mut highlights = Vec::new();
        let mut notes = Vec::new();
        for attachment in attachments {
            if attachment.data.filename.ends_with(".pdf") {
                let (mut pdf_highlights, mut pdf_notes) = self.pdf_annotations(&attachment.key)?;
                highlights.append(&mut pdf_highlights);
                notes.append(&mut pdf_notes);
            } else if attachment.data.filename.ends_with("Notebook.html") {
                let notebook = self.attachment_notebook(&attachment.key)?;
                for text in html::notebook_highlights(&notebook) {
                    highlights.push(Highlight::new(text, attachment.data.mtime.clone()));
                }
            } else {
                debug!(
                    key = %attachment.key,
                    filename = %attachment.data.filename,
                    "skipping unrecognized attachment"
                );
            }
        }
        Ok((highlights, notes))
    }

    /// Fetch the annotations attached to a PDF
    fn pdf_annotations(
        &self,
        attachment_key: &str,
    ) -> Result<(Vec<Highlight>, Vec<Note>), RemoteError> {
        let children: Vec<Value> =
            self.get_json(&self.items_url(&format!("/{attachment_key}/children")))?;

        let mut highlights = Vec::new();
        let mut notes = Vec::new();
        for child in children {
            match child.pointer("/data/annotationType").and_then(Value::as_str) {
                Some("highlight") => {
                    let item: HighlightAnnotation = serde_json::from_value(child)?;
                    let highlight = Highlight::new(item.data.text, item.data.mtime);
                    if !highlight.text.is_empty() {
                        highlights.push(highlight);
                    }
                }
                Some("note") => {
                    let item: NoteAnnotation = serde_json::from_value(child)?;
                    let note = Note::new(item.data.comment, item.data.mtime);
                    if !note.text.is_empty() {
                        notes.push(note);
                    }
                }
                _ => {}
            }
        }
        Ok((highlights, notes))
    }

    /// Download a notebook attachment and pull out its HTML member
    ///
    /// Attachment files are served as zip archives.
    fn attachment_notebook(&self, attachment_key: &str) -> Result<String, RemoteError> {
        let url = self.items_url(&format!("/{attachment_key}/file"));
        debug!(url = %url, "downloading notebook attachment");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/zip") {
            return Err(RemoteError::UnexpectedContentType { content_type });
        }

        let bytes = response.bytes()?;
        extract_notebook_html(bytes.as_ref())
    }
}

impl RemoteLibrary for ZoteroClient {
    fn item_versions(&self) -> Result<BTreeMap<String, i64>, RemoteError> {
        ZoteroClient::item_versions(self)
    }

    fn document(&self, key: &str) -> Result<Option<RemoteDocument>, RemoteError> {
        ZoteroClient::document(self, key)
    }

    fn child_notes(&self, parent_key: &str) -> Result<Vec<Note>, RemoteError> {
        ZoteroClient::child_notes(self, parent_key)
    }

    fn attachment_annotations(
        &self,
        parent_key: &str,
    ) -> Result<(Vec<Highlight>, Vec<Note>), RemoteError> {
        ZoteroClient::attachment_annotations(self, parent_key)
    }
}

/// Find the first `.html` member of a zip archive and return its contents
fn extract_notebook_html(bytes: &[u8]) -> Result<String, RemoteError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        if member.name().ends_with(".html") {
            let mut contents = String::new();
            member.read_to_string(&mut contents)?;
            return Ok(contents);
        }
    }

    Err(RemoteError::MissingNotebook)
}
