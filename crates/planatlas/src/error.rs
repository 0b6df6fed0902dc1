//! Error types raised at the problem-construction boundary
//!
//! Steady-state evaluation never fails: a false formula is a result, not an
//! error. The only recoverable failure in this crate is rejecting malformed
//! input while a problem is being assembled from validated syntax.

use thiserror::Error;

/// A validation failure: where it happened and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {reason}")]
pub struct ValidationError {
    /// Which part of the problem the failure was detected in.
    pub location: String,
    /// Human-readable description of the violation.
    pub reason: String,
}

impl ValidationError {
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
