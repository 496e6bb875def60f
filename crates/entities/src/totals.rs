//! Document totals calculator.

use serde::{Deserialize, Serialize};

use crate::LineItem;

/// Derived money totals for a line item collection.
///
/// Tax is computed per line (each line total times its own rate) and then
/// summed, so mixed rates across items never collapse into a blended rate on
/// the subtotal. No currency rounding is applied here; stored totals keep
/// full floating precision and presentation layers round for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line totals.
    pub subtotal: f64,
    /// Sum of per-line tax amounts.
    pub tax_amount: f64,
    /// Subtotal plus tax.
    pub total: f64,
}

impl DocumentTotals {
    /// Computes totals for an ordered line item collection.
    ///
    /// An empty collection yields all-zero totals.
    pub fn from_items(items: &[LineItem]) -> Self {
        let subtotal: f64 = items.iter().map(|item| item.total).sum();
        let tax_amount: f64 = items
            .iter()
            .map(|item| item.total * item.tax_rate / 100.0)
            .sum();
        Self {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }
}
