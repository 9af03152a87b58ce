//! Append-only conversation log

use super::message::Message;
use crate::core::error::DomainError;
use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Ordered, append-only sequence of messages.
///
/// There is a single writer (the conversation driver); readers get shared
/// slices. Nothing in the public API can mutate or remove a message once it
/// is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return it. The ordinal is the append position.
    pub fn append(
        &mut self,
        sender: ParticipantId,
        text: impl Into<String>,
    ) -> Result<&Message, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        let ordinal = self.messages.len() as u64;
        self.messages.push(Message::new(sender, text, ordinal));
        Ok(&self.messages[self.messages.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Message `n` positions from the end: `from_end(1)` is the latest,
    /// `from_end(2)` the one before it.
    pub fn from_end(&self, n: usize) -> Option<&Message> {
        if n == 0 || n > self.messages.len() {
            return None;
        }
        self.messages.get(self.messages.len() - n)
    }

    /// Message by ordinal
    pub fn get(&self, ordinal: u64) -> Option<&Message> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| self.messages.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}
