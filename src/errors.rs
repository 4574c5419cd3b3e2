//! Error types for event application

use thiserror::Error;

/// Errors that can occur while applying an event to a thing.
///
/// Everything here is a defect in upstream validation, not a normal
/// outcome: the legitimate "nothing to reconstruct" and "unroutable tag"
/// paths are expressed through the reducer's `Ok` results, never as
/// errors.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A merged document section no longer parses as thing content
    /// (e.g. `policyId` merged into a number)
    #[error("merged document has malformed {section}: {reason}")]
    MalformedDocument {
        /// Top-level section that failed re-derivation
        section: &'static str,
        /// Parse failure detail
        reason: String,
    },
}

impl ApplyError {
    /// Shorthand for a malformed-section error.
    pub fn malformed(section: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            section,
            reason: reason.into(),
        }
    }
}

/// Result type for event application.
pub type ApplyResult<T> = Result<T, ApplyError>;
