//! Wire types for the Zotero web API
//!
//! Struct fields follow the JSON payloads the API returns. Responses carry
//! far more fields than we use; only the ones the sync needs are modeled.

use serde::Deserialize;

/// Item types that never carry document metadata
pub(crate) const NON_DOCUMENT_TYPES: &[&str] = &["note", "attachment", "annotation"];

/// Minimal envelope used to decide whether an item is a document at all
#[derive(Debug, Deserialize)]
pub(crate) struct ItemProbe {
    pub data: ProbeData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProbeData {
    #[serde(rename = "itemType")]
    pub item_type: String,
}

/// A top-level bibliographic item
#[derive(Debug, Deserialize)]
pub(crate) struct DocumentItem {
    pub key: String,
    pub version: i64,
    pub data: DocumentData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentData {
    pub title: String,
    #[serde(rename = "abstractNote")]
    pub abstract_text: Option<String>,
    pub collections: Vec<String>,
}

/// A child note item; the note body is HTML
#[derive(Debug, Deserialize)]
pub(crate) struct NoteItem {
    pub data: NoteData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteData {
    #[serde(rename = "note")]
    pub html: String,
    #[serde(rename = "dateModified")]
    pub mtime: String,
}

/// An attachment child item
#[derive(Debug, Deserialize)]
pub(crate) struct AttachmentItem {
    pub key: String,
    pub data: AttachmentData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttachmentData {
    /// Missing for linked-URL attachments
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "dateModified")]
    pub mtime: String,
}

/// A highlight annotation on a PDF attachment
#[derive(Debug, Deserialize)]
pub(crate) struct HighlightAnnotation {
    pub data: HighlightAnnotationData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HighlightAnnotationData {
    #[serde(rename = "annotationText")]
    pub text: String,
    #[serde(rename = "dateModified")]
    pub mtime: String,
}

/// A note annotation on a PDF attachment
#[derive(Debug, Deserialize)]
pub(crate) struct NoteAnnotation {
    pub data: NoteAnnotationData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteAnnotationData {
    #[serde(rename = "annotationComment")]
    pub comment: String,
    #[serde(rename = "dateModified")]
    pub mtime: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_item() {
        let json = r#"{
            "key": "ABCD1234",
            "version": 12,
            "library": {"type": "user", "id": 1},
            "data": {
                "key": "ABCD1234",
                "itemType": "journalArticle",
                "title": "A Study of Things",
                "abstractNote": "We studied things.",
                "collections": ["COLL1"],
                "dateModified": "2024-04-03T10:15:00Z"
            }
        }"#;

        let item: DocumentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.key, "ABCD1234");
        assert_eq!(item.version, 12);
        assert_eq!(item.data.title, "A Study of Things");
        assert_eq!(item.data.abstract_text.as_deref(), Some("We studied things."));
        assert_eq!(item.data.collections, vec!["COLL1".to_string()]);
    }

    #[test]
    fn test_document_without_abstract_parses() {
        let json = r#"{
            "key": "ABCD1234",
            "version": 1,
            "data": {"title": "No Abstract", "collections": []}
        }"#;

        let item: DocumentItem = serde_json::from_str(json).unwrap();
        assert!(item.data.abstract_text.is_none());
    }

    #[test]
    fn test_document_without_collections_is_an_error() {
        let json = r#"{
            "key": "ABCD1234",
            "version": 1,
            "data": {"title": "Bare"}
        }"#;

        assert!(serde_json::from_str::<DocumentItem>(json).is_err());
    }

    #[test]
    fn test_parse_item_probe() {
        let json = r#"{"key": "K", "version": 2, "data": {"itemType": "attachment"}}"#;
        let probe: ItemProbe = serde_json::from_str(json).unwrap();
        assert_eq!(probe.data.item_type, "attachment");
    }

    #[test]
    fn test_attachment_without_filename_defaults_to_empty() {
        let json = r#"{
            "key": "ATT1",
            "data": {"itemType": "attachment", "dateModified": "2024-04-03T10:15:00Z"}
        }"#;

        let item: AttachmentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.data.filename, "");
    }

    #[test]
    fn test_parse_note_item() {
        let json = r#"{
            "key": "NOTE1",
            "data": {
                "note": "<p>remember this</p>",
                "dateModified": "2024-04-03T10:15:00Z"
            }
        }"#;

        let item: NoteItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.data.html, "<p>remember this</p>");
        assert_eq!(item.data.mtime, "2024-04-03T10:15:00Z");
    }

    #[test]
    fn test_highlight_annotation_requires_text() {
        let json = r#"{"data": {"annotationType": "highlight", "dateModified": "x"}}"#;
        assert!(serde_json::from_str::<HighlightAnnotation>(json).is_err());
    }
}
