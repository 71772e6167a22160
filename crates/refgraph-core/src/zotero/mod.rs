//! Zotero web API integration
//!
//! The client speaks the read side of the API: version listings, item
//! metadata, child notes, and attachment annotations.

mod client;
mod html;
mod item;

pub use client::{RemoteError, ZoteroClient, DEFAULT_API_URL};
