//! Conversation message (Entity)

use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// A message in the conversation log.
///
/// Messages are only created by [`ConversationLog::append`](super::ConversationLog::append)
/// and are immutable afterwards: the fields are private and there are no
/// setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: ParticipantId,
    text: String,
    ordinal: u64,
}

impl Message {
    pub(crate) fn new(sender: ParticipantId, text: String, ordinal: u64) -> Self {
        Self {
            sender,
            text,
            ordinal,
        }
    }

    pub fn sender(&self) -> &ParticipantId {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append position, starting at 0
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }
}
