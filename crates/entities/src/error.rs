//! Validation error types.

use thiserror::Error;

/// Boundary validation failures. Rejected before any record is written.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required text field is empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A monetary amount is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    /// A tax rate outside the 0-100 percent range.
    #[error("tax rate must be between 0 and 100, got {value}")]
    TaxRateOutOfRange { value: f64 },

    /// A quantity (units or hours) that is not strictly positive.
    #[error("quantity must be greater than zero, got {value}")]
    NonPositiveQuantity { value: f64 },
}
