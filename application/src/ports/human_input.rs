//! Human input port for the user's turns.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`HumanInputPort`] - defined here in application layer
//! - **Adapter**: `InteractiveHumanInput` - console input in the presentation layer
//! - **Adapter**: [`ScriptedHumanInput`] - replies from a list, for scripted runs and tests
//!
//! # Flow
//!
//! ```text
//! dispatcher picks the user
//!        ↓
//! HumanInputPort::request_reply()
//!        ↓
//! reply ──────────────▶ appended to the log
//! cancelled / timeout ─▶ re-prompt (nothing appended)
//! closed ─────────────▶ session aborts
//! ```

use async_trait::async_trait;
use finadvisor_domain::{ConversationLog, ParticipantId};
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Error type for human input operations.
///
/// These are failures to obtain a reply, never replies themselves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HumanInputError {
    /// The prompt was cancelled (e.g. Ctrl+C at the prompt); the driver
    /// re-prompts.
    #[error("Input cancelled")]
    Cancelled,
    /// No more input will ever arrive (EOF, exhausted script).
    #[error("Input closed")]
    Closed,
    /// Input/output error (e.g., terminal read failure).
    #[error("I/O error: {0}")]
    Io(String),
}

impl HumanInputError {
    /// Whether asking again may produce a reply
    pub fn can_reprompt(&self) -> bool {
        matches!(self, HumanInputError::Cancelled)
    }
}

/// Port for collecting the human participant's message.
#[async_trait]
pub trait HumanInputPort: Send + Sync {
    /// Ask `participant` for its next message. `log` is the conversation so
    /// far, for adapters that want to show context.
    async fn request_reply(
        &self,
        participant: &ParticipantId,
        log: &ConversationLog,
    ) -> Result<String, HumanInputError>;
}

/// Replies from a fixed list, in order.
///
/// Once the list is exhausted it answers with the final reply if one was
/// set, otherwise with [`HumanInputError::Closed`].
pub struct ScriptedHumanInput {
    replies: Mutex<VecDeque<String>>,
    final_reply: Option<String>,
}

impl ScriptedHumanInput {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            final_reply: None,
        }
    }

    /// Reply used for every request after the script runs out
    pub fn with_final_reply(mut self, reply: impl Into<String>) -> Self {
        self.final_reply = Some(reply.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HumanInputPort for ScriptedHumanInput {
    async fn request_reply(
        &self,
        _participant: &ParticipantId,
        _log: &ConversationLog,
    ) -> Result<String, HumanInputError> {
        let next = self
            .replies
            .lock()
            .map_err(|e| HumanInputError::Io(e.to_string()))?
            .pop_front();
        next.or_else(|| self.final_reply.clone())
            .ok_or(HumanInputError::Closed)
    }
}
