//! Session parameters: conversation loop control.
//!
//! [`SessionParams`] groups the static parameters that control the round
//! loop in [`RunConversationUseCase`](crate::use_cases::run_conversation::RunConversationUseCase).
//! These are application-layer concerns, not domain policy.

use finadvisor_domain::{DEFAULT_MAX_ROUNDS, FallbackPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Conversation loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Hard cap on appended messages, the opening message included.
    pub max_rounds: u32,
    /// Extra attempts for an agent turn whose generation failed with a
    /// retryable error.
    pub max_turn_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_backoff: Duration,
    /// Limit for one generation call.
    pub turn_timeout: Option<Duration>,
    /// Limit for waiting on the human; expiry counts as a cancelled prompt.
    pub human_timeout: Option<Duration>,
    /// How often the human is asked again before the session aborts.
    pub max_human_reprompts: u32,
    /// Capability calls allowed within one agent turn.
    pub max_capability_calls: u32,
    /// How a `Fallback` dispatch decision is resolved.
    pub fallback: FallbackPolicy,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_turn_retries: 2,
            retry_backoff: Duration::from_millis(500),
            turn_timeout: Some(Duration::from_secs(120)),
            human_timeout: None,
            max_human_reprompts: 3,
            max_capability_calls: 3,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl SessionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_max_turn_retries(mut self, max: u32) -> Self {
        self.max_turn_retries = max;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_human_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.human_timeout = timeout;
        self
    }

    pub fn with_max_human_reprompts(mut self, max: u32) -> Self {
        self.max_human_reprompts = max;
        self
    }

    pub fn with_max_capability_calls(mut self, max: u32) -> Self {
        self.max_capability_calls = max;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(6);
        self.retry_backoff.saturating_mul(factor)
    }
}
