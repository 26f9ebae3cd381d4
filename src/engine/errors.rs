//! Error types for the matching engine
//!
//! Two kinds of failure reach callers: a submission that is rejected before
//! anything is written, and a transaction that failed and was rolled back.
//! An empty book or a run with no crossings is not an error.

use thiserror::Error;

use crate::database::DatabaseError;

/// Errors that can occur while submitting orders or running a match
///
/// # Error Categories
///
/// - **Validation Errors**: `InvalidQuantity`, `InvalidPrice`
/// - **Transaction Errors**: `Transaction` (state is unchanged), `Worker`
#[derive(Debug, Error)]
pub enum EngineError {
    /// Quantity validation failed (negative, or no side has quantity)
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Price validation failed (negative, or no side has a price)
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// The storage transaction failed and was rolled back
    #[error("Transaction failed: {0}")]
    Transaction(#[from] DatabaseError),

    /// The blocking task running the engine call did not complete
    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl EngineError {
    /// Returns true if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidQuantity(_) | EngineError::InvalidPrice(_)
        )
    }
}
