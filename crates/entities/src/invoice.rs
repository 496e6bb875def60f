//! Invoice entity definitions.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DocumentTotals, LineItem, Quote};

/// Days until an invoice built from a quote falls due.
pub const DEFAULT_DUE_DAYS: i64 = 30;

/// Status of an invoice. Like [`crate::QuoteStatus`], a free-form label with
/// no enforced ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being drafted.
    #[default]
    Draft,
    /// Sent to the customer.
    Sent,
    /// Paid in full.
    Paid,
    /// Past its due date without payment.
    Overdue,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

/// An invoice, either converted from an accepted quote or built directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Addressed customer ID.
    pub customer_id: Uuid,
    /// Customer name at the time the invoice was created.
    pub customer_name: String,
    /// Originating quote, when converted. Permanent back-reference.
    pub quote_id: Option<Uuid>,
    /// Sequential document number, e.g. `INV2026-0001`.
    pub invoice_number: String,
    /// Current status label.
    pub status: InvoiceStatus,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Sum of line totals.
    pub subtotal: f64,
    /// Sum of per-line tax amounts.
    pub tax_amount: f64,
    /// Subtotal plus tax.
    pub total: f64,
    /// Date payment falls due.
    pub due_date: DateTime<Utc>,
    /// Payment terms shown on the document.
    pub payment_terms: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Builds an invoice directly from a draft, a customer-name snapshot and
    /// an assigned document number. Totals are derived from the draft's
    /// items.
    pub fn from_draft(
        user_id: Uuid,
        customer_name: impl Into<String>,
        invoice_number: impl Into<String>,
        draft: InvoiceDraft,
    ) -> Self {
        let now = Utc::now();
        let mut invoice = Self {
            id: Uuid::new_v4(),
            user_id,
            customer_id: draft.customer_id,
            customer_name: customer_name.into(),
            quote_id: None,
            invoice_number: invoice_number.into(),
            status: InvoiceStatus::Draft,
            items: draft.items,
            subtotal: 0.0,
            tax_amount: 0.0,
            total: 0.0,
            due_date: draft.due_date,
            payment_terms: draft.payment_terms,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        invoice.recalculate();
        invoice
    }

    /// Builds an invoice from an accepted quote.
    ///
    /// The invoice is a priced snapshot of the quote at conversion time:
    /// items, subtotal, tax amount and total are copied verbatim, with no
    /// recomputation. The due date defaults to [`DEFAULT_DUE_DAYS`] from now.
    pub fn from_quote(quote: &Quote, invoice_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: quote.user_id,
            customer_id: quote.customer_id,
            customer_name: quote.customer_name.clone(),
            quote_id: Some(quote.id),
            invoice_number: invoice_number.into(),
            status: InvoiceStatus::Draft,
            items: quote.items.clone(),
            subtotal: quote.subtotal,
            tax_amount: quote.tax_amount,
            total: quote.total,
            due_date: now + Duration::days(DEFAULT_DUE_DAYS),
            payment_terms: quote.payment_terms.clone(),
            notes: quote.notes.clone(),
            created_at: now,
            updated_at: now,
        }
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
    pub fn apply(&mut self, update: InvoiceUpdate) {
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
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
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

/// Input for creating an invoice directly, without a source quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Addressed customer ID.
    pub customer_id: Uuid,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Date payment falls due.
    pub due_date: DateTime<Utc>,
    /// Payment terms shown on the document.
    pub payment_terms: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl InvoiceDraft {
    /// Creates a draft with an empty item collection.
    pub fn new(customer_id: Uuid, due_date: DateTime<Utc>) -> Self {
        Self {
            customer_id,
            items: Vec::new(),
            due_date,
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

/// Partial update for an [`Invoice`]. A provided item collection replaces
/// the existing one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    /// New customer ID.
    pub customer_id: Option<Uuid>,
    /// New customer-name snapshot.
    pub customer_name: Option<String>,
    /// New status label.
    pub status: Option<InvoiceStatus>,
    /// Replacement item collection.
    pub items: Option<Vec<LineItem>>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New payment terms.
    pub payment_terms: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineItem, Product, QuoteDraft};

    fn accepted_quote() -> Quote {
        let product = Product::new(Uuid::new_v4(), "Widget", 100.0, 10.0);
        let item = LineItem::from_product(&product, 2.0).unwrap();
        let draft = QuoteDraft::new(Uuid::new_v4(), Utc::now() + Duration::days(14))
            .with_items(vec![item])
            .with_payment_terms("Net 30")
            .with_notes("Delivery included");
        let mut quote = Quote::from_draft(Uuid::new_v4(), "Globex Corp", "Q2026-0001", draft);
        quote.status = crate::QuoteStatus::Accepted;
        quote
    }

    #[test]
    fn test_from_quote_copies_totals_verbatim() {
        let quote = accepted_quote();
        let invoice = Invoice::from_quote(&quote, "INV2026-0001");

        assert_eq!(invoice.quote_id, Some(quote.id));
        assert_eq!(invoice.customer_id, quote.customer_id);
        assert_eq!(invoice.customer_name, quote.customer_name);
        assert_eq!(invoice.items.len(), quote.items.len());
        assert_eq!(invoice.subtotal, quote.subtotal);
        assert_eq!(invoice.tax_amount, quote.tax_amount);
        assert_eq!(invoice.total, quote.total);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.payment_terms, Some("Net 30".to_string()));
        assert_eq!(invoice.notes, Some("Delivery included".to_string()));
    }

    #[test]
    fn test_from_quote_due_date_is_thirty_days_out() {
        let invoice = Invoice::from_quote(&accepted_quote(), "INV2026-0001");
        assert_eq!(
            (invoice.due_date - invoice.created_at).num_days(),
            DEFAULT_DUE_DAYS
        );
    }

    #[test]
    fn test_from_draft_derives_totals() {
        let product = Product::new(Uuid::new_v4(), "Widget", 50.0, 20.0);
        let item = LineItem::from_product(&product, 1.0).unwrap();
        let draft =
            InvoiceDraft::new(Uuid::new_v4(), Utc::now() + Duration::days(30)).with_items(vec![item]);

        let invoice = Invoice::from_draft(Uuid::new_v4(), "Globex Corp", "INV2026-0002", draft);

        assert_eq!(invoice.quote_id, None);
        assert_eq!(invoice.subtotal, 50.0);
        assert_eq!(invoice.tax_amount, 10.0);
        assert_eq!(invoice.total, 60.0);
    }

    #[test]
    fn test_apply_merges_and_advances_updated_at() {
        let mut invoice = Invoice::from_quote(&accepted_quote(), "INV2026-0001");
        let created_at = invoice.created_at;

        invoice.apply(InvoiceUpdate {
            status: Some(InvoiceStatus::Paid),
            ..Default::default()
        });

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.created_at, created_at);
        assert!(invoice.updated_at >= created_at);
    }
}
