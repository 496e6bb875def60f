//! Quote entity definitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DocumentTotals, LineItem};

/// Status of a quote. A free-form label: any transition is permitted, and
/// callers enforce whatever workflow policy they want. Only the conversion
/// to an invoice requires `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Being drafted.
    #[default]
    Draft,
    /// Sent to the customer.
    Sent,
    /// Accepted by the customer. Eligible for conversion.
    Accepted,
    /// Rejected by the customer.
    Rejected,
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A quote for a customer, priced from catalog snapshots.
///
/// The derived fields `subtotal`, `tax_amount` and `total` are recomputed
/// from `items` on every write and never accepted from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Addressed customer ID.
    pub customer_id: Uuid,
    /// Customer name at the time the quote was created.
    pub customer_name: String,
    /// Sequential document number, e.g. `Q2026-0001`.
    pub quote_number: String,
    /// Current status label.
    pub status: QuoteStatus,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Sum of line totals.
    pub subtotal: f64,
    /// Sum of per-line tax amounts.
    pub tax_amount: f64,
    /// Subtotal plus tax.
    pub total: f64,
    /// Date the quote stops being valid.
    pub valid_until: DateTime<Utc>,
    /// Payment terms shown on the document.
    pub payment_terms: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Builds a quote from a draft, a customer-name snapshot and an assigned
    /// document number. Totals are derived from the draft's items.
    pub fn from_draft(
        user_id: Uuid,
        customer_name: impl Into<String>,
        quote_number: impl Into<String>,
        draft: QuoteDraft,
    ) -> Self {
        let now = Utc::now();
        let mut quote = Self {
            id: Uuid::new_v4(),
            user_id,
            customer_id: draft.customer_id,
            customer_name: customer_name.into(),
            quote_number: quote_number.into(),
            status: QuoteStatus::Draft,
            items: draft.items,
            subtotal: 0.0,
            tax_amount: 0.0,
            total: 0.0,
            valid_until: draft.valid_until,
            payment_terms: draft.payment_terms,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        quote.recalculate();
        quote
    }

    /// Recomputes the derived totals from the current items.
    pub fn recalculate(&mut self) {
        let totals = DocumentTotals::from_items(&self.items);
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
    }

    /// Applies a partial update, replacing the item collection wholesale when
    /// one is provided. Totals are recomputed and `updated_at` advances.
    pub fn apply(&mut self, update: QuoteUpdate) {
        if let Some(customer_id) = update.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(customer_name) = update.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(items) = update.items {
            self.items = items;
        }
        if let Some(valid_until) = update.valid_until {
            self.valid_until = valid_until;
        }
        if let Some(payment_terms) = update.payment_terms {
            self.payment_terms = Some(payment_terms);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        self.recalculate();
        self.updated_at = Utc::now();
    }
}

/// Input for creating a quote. The store resolves the customer snapshot and
/// assigns the document number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDraft {
    /// Addressed customer ID.
    pub customer_id: Uuid,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Date the quote stops being valid.
    pub valid_until: DateTime<Utc>,
    /// Payment terms shown on the document.
    pub payment_terms: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl QuoteDraft {
    /// Creates a draft with an empty item collection.
    pub fn new(customer_id: Uuid, valid_until: DateTime<Utc>) -> Self {
        Self {
            customer_id,
            items: Vec::new(),
            valid_until,
            payment_terms: None,
            notes: None,
        }
    }

    /// Sets the line items.
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Sets the payment terms.
    pub fn with_payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.payment_terms = Some(terms.into());
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for a [`Quote`]. A provided item collection replaces the
/// existing one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteUpdate {
    /// New customer ID.
    pub customer_id: Option<Uuid>,
    /// New customer-name snapshot.
    pub customer_name: Option<String>,
    /// New status label.
    pub status: Option<QuoteStatus>,
    /// Replacement item collection.
    pub items: Option<Vec<LineItem>>,
    /// New validity date.
    pub valid_until: Option<DateTime<Utc>>,
    /// New payment terms.
    pub payment_terms: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}
