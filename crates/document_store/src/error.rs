//! Document store error types.

use thiserror::Error;

/// Errors that can occur during document store operations.
///
/// Plain lookup misses on `get`/`update`/`delete` are NOT errors; those
/// return `Ok(None)` or `Ok(false)`. [`StoreError::NotFound`] is reserved
/// for operations that cannot proceed without their referent, such as the
/// quote-to-invoice conversion or the customer snapshot during document
/// creation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required referent does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Duplicate entity.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// An operation that requires a specific document status.
    #[error("invalid document state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: String,
    },

    /// Boundary validation failure.
    #[error(transparent)]
    Validation(#[from] entities::ValidationError),

    /// The backing store is inaccessible.
    #[error("storage unavailable: {0}")]
    Storage(#[from] std::io::Error),

    /// A table blob failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(entity: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates an invalid state error.
    pub fn invalid_state(expected: &'static str, actual: impl ToString) -> Self {
        Self::InvalidState {
            expected,
            actual: actual.to_string(),
        }
    }
}

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;
