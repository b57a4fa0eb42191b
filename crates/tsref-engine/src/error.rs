//! Errors surfaced by reference queries.
//!
//! "No symbol at this position" is not an error; queries return `Ok(None)`
//! for it. Only cancellation and broken snapshot invariants fail a query.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindReferencesError {
    /// The host's cancellation token fired; partial results are discarded.
    #[error("reference search was cancelled")]
    Cancelled,
    /// The snapshot contradicts itself, e.g. a declaration without a parent.
    #[error("reference search invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl FindReferencesError {
    pub fn invariant(message: impl Into<String>) -> Self {
        FindReferencesError::InvariantViolation {
            message: message.into(),
        }
    }
}

pub type Result<T, E = FindReferencesError> = std::result::Result<T, E>;
