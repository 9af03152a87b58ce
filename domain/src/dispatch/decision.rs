//! Dispatch decision value object

use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of speaker selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", content = "participant", rename_all = "snake_case")]
pub enum DispatchDecision {
    /// A rule picked this participant
    Concrete(ParticipantId),
    /// No rule matched; the configured fallback policy decides
    Fallback,
}

impl DispatchDecision {
    pub fn participant(&self) -> Option<&ParticipantId> {
        match self {
            DispatchDecision::Concrete(id) => Some(id),
            DispatchDecision::Fallback => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DispatchDecision::Fallback)
    }
}

impl fmt::Display for DispatchDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchDecision::Concrete(id) => write!(f, "{}", id),
            DispatchDecision::Fallback => write!(f, "<fallback>"),
        }
    }
}
