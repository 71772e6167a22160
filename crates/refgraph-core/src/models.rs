//! Data models for refgraph
//!
//! Defines the core data structures: Document, Highlight, and Note.
//! Documents are cached locally as JSON and rendered into Logseq pages.

use serde::{Deserialize, Serialize};

/// A bibliographic document with its annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Zotero item key
    pub key: String,
    /// Zotero item version at the time it was fetched
    pub version: i64,
    /// Display title
    pub title: String,
    /// Optional abstract text
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Collections the document belongs to
    pub collections: Vec<String>,
    /// Highlights pulled from the document's attachments
    pub annotations: Vec<Highlight>,
    /// Notes, both attachment comments and standalone child notes
    pub notes: Vec<Note>,
}

impl Document {
    /// Assemble a document from remote metadata and its fetched annotations
    pub fn from_remote(meta: RemoteDocument, annotations: Vec<Highlight>, notes: Vec<Note>) -> Self {
        Self {
            key: meta.key,
            version: meta.version,
            title: meta.title,
            abstract_text: meta.abstract_text,
            collections: meta.collections,
            annotations,
            notes,
        }
    }

    /// Whether the document carries any renderable content
    pub fn has_entries(&self) -> bool {
        !self.annotations.is_empty() || !self.notes.is_empty()
    }
}

/// A highlighted passage with its modification timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    /// Highlighted text, trimmed
    pub text: String,
    /// Raw modification timestamp as reported by the server
    pub mtime: String,
}

impl Highlight {
    pub fn new(text: impl Into<String>, mtime: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            mtime: mtime.into(),
        }
    }
}

/// A note with its modification timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// Note text, trimmed
    pub text: String,
    /// Raw modification timestamp as reported by the server
    pub mtime: String,
}

impl Note {
    pub fn new(text: impl Into<String>, mtime: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            mtime: mtime.into(),
        }
    }
}

/// Document metadata as returned by the remote library, before
/// annotations have been fetched
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub key: String,
    pub version: i64,
    pub title: String,
    pub abstract_text: Option<String>,
    pub collections: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> RemoteDocument {
        RemoteDocument {
            key: "ABCD1234".to_string(),
            version: 7,
            title: "On Test Doubles".to_string(),
            abstract_text: Some("An abstract.".to_string()),
            collections: vec!["testing".to_string()],
        }
    }

    #[test]
    fn test_highlight_trims_text() {
        let highlight = Highlight::new("  some passage \n", "2024-04-03T10:15:00Z");
        assert_eq!(highlight.text, "some passage");
        assert_eq!(highlight.mtime, "2024-04-03T10:15:00Z");
    }

    #[test]
    fn test_note_trims_text() {
        let note = Note::new("\t a thought ", "2024-04-03T10:15:00Z");
        assert_eq!(note.text, "a thought");
    }

    #[test]
    fn test_from_remote_carries_metadata() {
        let annotations = vec![Highlight::new("passage", "2024-04-03T10:15:00Z")];
        let notes = vec![Note::new("thought", "2024-04-04T08:00:00Z")];
        let document = Document::from_remote(sample_meta(), annotations.clone(), notes.clone());

        assert_eq!(document.key, "ABCD1234");
        assert_eq!(document.version, 7);
        assert_eq!(document.title, "On Test Doubles");
        assert_eq!(document.abstract_text.as_deref(), Some("An abstract."));
        assert_eq!(document.collections, vec!["testing".to_string()]);
        assert_eq!(document.annotations, annotations);
        assert_eq!(document.notes, notes);
        assert!(document.has_entries());
    }

    #[test]
    fn test_document_without_annotations_has_no_entries() {
        let document = Document::from_remote(sample_meta(), Vec::new(), Vec::new());
        assert!(!document.has_entries());
    }

    #[test]
    fn test_abstract_serializes_under_original_name() {
        let document = Document::from_remote(sample_meta(), Vec::new(), Vec::new());
        let json = serde_json::to_string(&document).unwrap();
        assert!(json.contains("\"abstract\":\"An abstract.\""));
        assert!(!json.contains("abstract_text"));

        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, document);
    }
}
