//! Export renderers.
//!
//! Turns a list of entries into a downloadable document: Markdown text, a
//! paginated PDF, or a PNG card for a single entry. Every renderer is a pure
//! function of its input; nothing is cached or written to disk here.

pub mod card;
pub mod markdown;
pub mod pdf;

use crate::journal::types::Entry;

pub use card::render_card;
pub use markdown::render_markdown;
pub use pdf::render_pdf;

/// Pick the entry to render as a card: the first one whose timestamp matches.
pub fn select_card_entry<'a>(entries: &'a [Entry], timestamp: &str) -> Option<&'a Entry> {
    entries.iter().find(|e| e.timestamp == timestamp)
}

/// Header line shared by the PDF and card renderers.
pub(crate) fn entry_heading(entry: &Entry) -> String {
    format!("{} - {}", entry.timestamp, entry.emotion)
}
