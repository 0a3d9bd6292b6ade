//! Appliers that mirror settings into the document
//!
//! These are the only code paths that mutate the [`Document`]. Each concern
//! has one entry point that recomputes its whole surface from current inputs.

pub mod favicon;
pub mod theme;

use tracing::debug;

use crate::config::RemoteConfig;
use crate::dom::Document;

pub use favicon::FaviconSynchronizer;
pub use theme::apply_design;

/// Set the document title to the school name, if one is configured
pub fn apply_document_title(doc: &mut Document, remote: Option<&RemoteConfig>) {
    let Some(name) = remote.map(|r| r.school_name.trim()).filter(|n| !n.is_empty()) else {
        return;
    };

    match doc.head.as_mut() {
        Some(head) => head.set_title(name),
        None => debug!("Document has no head, skipping title"),
    }
}
