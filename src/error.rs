//! Error types for the calculation engine
//!
//! Anticipated input boundaries (DDM growth check, DCF terminal-value check)
//! are reported on the result records themselves, not through this enum.
//! `EngineError` covers the hard failures: inputs outside a calculator's
//! mathematical domain.

use thiserror::Error;

/// Errors raised by engine calculators
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl EngineError {
    /// Shorthand for the common invalid-input case
    pub fn invalid(field: &str, reason: &str) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Standard result type for engine calculations
pub type EngineResult<T> = Result<T, EngineError>;
