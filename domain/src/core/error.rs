//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant here is either a setup mistake (caught before a session
/// starts) or an invariant violation that signals a defect in the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Speaker '{0}' is not a registered participant")]
    UnknownSpeaker(String),

    #[error("Duplicate participant id: {0}")]
    DuplicateParticipant(String),

    #[error("Role {role} is already held by '{holder}'")]
    DuplicateRole { role: String, holder: String },

    #[error("Required role missing from the roster: {0}")]
    MissingRole(String),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("Message text cannot be empty")]
    EmptyMessage,

    #[error("Round cap of {0} reached; no further messages may be appended")]
    RoundCapReached(u32),

    #[error("Invalid round cap: {0}")]
    InvalidRoundCap(String),
}

impl DomainError {
    /// Check if this error is an invariant violation (a defect rather than
    /// a configuration mistake)
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownSpeaker(_) | DomainError::RoundCapReached(_)
        )
    }
}
