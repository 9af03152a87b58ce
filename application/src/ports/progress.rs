//! Progress notification port
//!
//! Defines the interface for reporting progress while a conversation runs.

use crate::use_cases::run_conversation::TurnError;
use finadvisor_domain::{
    CapabilityExchange, Message, Participant, ParticipantId, ParticipantRegistry, Termination,
};

/// Callback for progress updates during a conversation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ConversationProgress: Send + Sync {
    /// Called when a speaker has been chosen, before its turn starts
    fn on_turn_start(&self, speaker: &Participant, round: u32, via_fallback: bool);

    /// Called after a message has been appended to the log
    fn on_message(&self, message: &Message);

    /// Called once the session stops without error
    fn on_session_end(&self, termination: &Termination);

    fn on_session_start(&self, _participants: &ParticipantRegistry, _max_rounds: u32) {}

    fn on_capability_call(&self, _speaker: &ParticipantId, _exchange: &CapabilityExchange) {}

    /// Called before a failed turn is retried
    fn on_turn_retry(&self, _speaker: &ParticipantId, _attempt: u32, _error: &TurnError) {}

    /// Called when the human produced no message and is asked again
    fn on_human_reprompt(&self, _speaker: &ParticipantId, _attempt: u32, _reason: &str) {}

    /// Called when the session aborts with an error
    fn on_session_failed(&self, _error: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ConversationProgress for NoProgress {
    fn on_turn_start(&self, _speaker: &Participant, _round: u32, _via_fallback: bool) {}
    fn on_message(&self, _message: &Message) {}
    fn on_session_end(&self, _termination: &Termination) {}
}
