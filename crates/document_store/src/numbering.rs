//! Sequential document numbering.
//!
//! Numbers look like `Q2026-0001` for quotes and `INV2026-0001` for
//! invoices: a kind prefix, the four-digit year, and a zero-padded counter
//! that restarts at 1 each year. Counters are persisted per (user, kind,
//! year) in the store's counter table, so deleting a document never releases
//! its number; gaps are allowed, reuse is not.

use chrono::{Datelike, Utc};
use uuid::Uuid;

/// Document families that receive sequential numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Quotes, numbered `Q<year>-<counter>`.
    Quote,
    /// Invoices, numbered `INV<year>-<counter>`.
    Invoice,
}

impl DocumentKind {
    /// Prefix on the formatted number.
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Quote => "Q",
            DocumentKind::Invoice => "INV",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            DocumentKind::Quote => "quote",
            DocumentKind::Invoice => "invoice",
        }
    }
}

/// Key of one monotonic counter in the persisted counter map.
pub(crate) fn counter_slot(user_id: Uuid, kind: DocumentKind, year: i32) -> String {
    format!("{user_id}:{}:{year}", kind.slug())
}

/// Formats a document number from its parts.
pub(crate) fn format_number(kind: DocumentKind, year: i32, counter: u32) -> String {
    format!("{}{year}-{counter:04}", kind.prefix())
}

/// The year used for numbering newly created documents.
pub(crate) fn current_year() -> i32 {
    Utc::now().year()
}
