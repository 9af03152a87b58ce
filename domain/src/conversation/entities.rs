//! Conversation aggregate

use super::log::ConversationLog;
use super::message::Message;
use crate::core::error::DomainError;
use crate::dispatch::triggers::is_termination;
use crate::participant::{ParticipantId, ParticipantRegistry, Role};
use serde::{Deserialize, Serialize};

/// Default round cap of a session
pub const DEFAULT_MAX_ROUNDS: u32 = 30;

/// Opening message used when the client does not supply one
pub const DEFAULT_OPENING: &str =
    "I want to review my portfolio and make new investment strategy for 2025";

/// Why a conversation stopped without an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// A message carried the end token
    EndRequested { by: ParticipantId, ordinal: u64 },
    /// `round_count` reached `max_rounds`
    RoundCapReached { rounds: u32 },
}

impl Termination {
    pub fn description(&self) -> String {
        match self {
            Termination::EndRequested { by, ordinal } => {
                format!("ended by {} (message #{})", by, ordinal)
            }
            Termination::RoundCapReached { rounds } => {
                format!("round cap reached after {} rounds", rounds)
            }
        }
    }
}

/// One conversation session (Aggregate Root)
///
/// Owns the roster and the log. Every round appends exactly one message, so
/// `round_count` always equals the log length; the opening message counts as
/// the first round.
#[derive(Debug, Clone)]
pub struct Conversation {
    participants: ParticipantRegistry,
    log: ConversationLog,
    round_count: u32,
    max_rounds: u32,
}

impl Conversation {
    /// Start a session with the human participant's opening message.
    ///
    /// The roster must contain the User and Advisor roles (the dispatcher
    /// always hands the second turn to the Advisor), and `max_rounds` must
    /// leave room for at least that reply.
    pub fn start(
        participants: ParticipantRegistry,
        max_rounds: u32,
        opening: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if max_rounds < 2 {
            return Err(DomainError::InvalidRoundCap(format!(
                "max_rounds must be at least 2, got {}",
                max_rounds
            )));
        }
        participants.require_roles(&[Role::User, Role::Advisor])?;

        let opener = participants
            .by_role(Role::User)
            .map(|p| p.id.clone())
            .ok_or_else(|| DomainError::MissingRole(Role::User.to_string()))?;

        let mut conversation = Self {
            participants,
            log: ConversationLog::new(),
            round_count: 0,
            max_rounds,
        };
        conversation.append(&opener, opening)?;
        Ok(conversation)
    }

    /// Append a message from a registered participant.
    ///
    /// Fails with [`DomainError::UnknownSpeaker`] for a non-member sender and
    /// [`DomainError::RoundCapReached`] once the cap has been hit; neither
    /// case touches the log.
    pub fn append(
        &mut self,
        sender: &ParticipantId,
        text: impl Into<String>,
    ) -> Result<&Message, DomainError> {
        if !self.participants.contains(sender.as_str()) {
            return Err(DomainError::UnknownSpeaker(sender.to_string()));
        }
        if self.round_count >= self.max_rounds {
            return Err(DomainError::RoundCapReached(self.max_rounds));
        }
        let message = self.log.append(sender.clone(), text)?;
        self.round_count += 1;
        Ok(message)
    }

    /// Termination check after the latest append.
    ///
    /// The end token wins over the round cap when both fire on the same
    /// message.
    pub fn termination(&self) -> Option<Termination> {
        if let Some(last) = self.log.last()
            && is_termination(last.text())
        {
            return Some(Termination::EndRequested {
                by: last.sender().clone(),
                ordinal: last.ordinal(),
            });
        }
        if self.is_at_cap() {
            return Some(Termination::RoundCapReached {
                rounds: self.round_count,
            });
        }
        None
    }

    pub fn participants(&self) -> &ParticipantRegistry {
        &self.participants
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn messages(&self) -> &[Message] {
        self.log.as_slice()
    }

    pub fn last_speaker(&self) -> Option<&ParticipantId> {
        self.log.last().map(|m| m.sender())
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn is_at_cap(&self) -> bool {
        self.round_count >= self.max_rounds
    }

    pub fn remaining_rounds(&self) -> u32 {
        self.max_rounds.saturating_sub(self.round_count)
    }

    /// Consume the conversation, keeping only the transcript
    pub fn into_log(self) -> ConversationLog {
        self.log
    }
}
