//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording session events
//! (dispatch decisions, appended messages, capability calls, retries) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation transcript in a machine-readable format (JSONL).

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A structured conversation event for logging.
///
/// Each event has a type string, a UTC timestamp, and a JSON payload
/// containing event-specific fields.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "dispatch", "message_appended").
    pub event_type: &'static str,
    pub timestamp: DateTime<Utc>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    /// Create a new conversation event with the current UTC timestamp.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible; logging failures are
/// ignored so they never disturb the session.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
