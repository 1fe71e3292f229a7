//! Error types for the deconfliction engine.

use thiserror::Error;

/// Errors that abort a resolution.
///
/// Every variant short-circuits the current resolution; no partial plans are
/// ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum DeconflictError {
    /// A read/check/search collaborator call failed or timed out.
    #[error("collaborator unavailable during {step}: {reason}")]
    CollaboratorUnavailable { step: &'static str, reason: String },

    /// Required data was missing, empty, or outside the matching tolerance.
    #[error("data not found: {0}")]
    DataNotFound(String),

    /// The threat violates the cardinality invariants for its kind.
    #[error("invalid threat: {0}")]
    InvalidThreat(String),
}

impl DeconflictError {
    /// Creates a collaborator failure naming the failing step.
    pub fn collaborator(step: &'static str, reason: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            step,
            reason: reason.into(),
        }
    }

    /// Creates a missing-data error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::DataNotFound(msg.into())
    }

    /// Creates a malformed-threat error.
    pub fn invalid_threat(msg: impl Into<String>) -> Self {
        Self::InvalidThreat(msg.into())
    }
}
