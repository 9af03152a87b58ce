//! Session configuration from TOML (`[session]` section)

use finadvisor_application::SessionParams;
use finadvisor_domain::{
    ConfigIssue, ConfigIssueCode, DEFAULT_MAX_ROUNDS, DEFAULT_OPENING, FallbackPolicy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw session configuration from TOML
///
/// # Example
///
/// ```toml
/// [session]
/// max_rounds = 30
/// max_turn_retries = 2
/// retry_backoff_ms = 500
/// turn_timeout_secs = 120
/// human_timeout_secs = 600
/// max_human_reprompts = 3
/// max_capability_calls = 3
/// fallback = "auto"            # "auto" or "round_robin"
/// opening_message = "I want to review my portfolio"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub max_rounds: u32,
    pub max_turn_retries: u32,
    pub retry_backoff_ms: u64,
    pub turn_timeout_secs: Option<u64>,
    pub human_timeout_secs: Option<u64>,
    pub max_human_reprompts: u32,
    pub max_capability_calls: u32,
    /// Fallback policy: "auto" or "round_robin"
    pub fallback: String,
    pub opening_message: Option<String>,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        let params = SessionParams::default();
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_turn_retries: params.max_turn_retries,
            retry_backoff_ms: params.retry_backoff.as_millis() as u64,
            turn_timeout_secs: params.turn_timeout.map(|d| d.as_secs()),
            human_timeout_secs: None,
            max_human_reprompts: params.max_human_reprompts,
            max_capability_calls: params.max_capability_calls,
            fallback: params.fallback.to_string(),
            opening_message: None,
        }
    }
}

impl FileSessionConfig {
    /// Parse fallback string into FallbackPolicy, returning warnings on failure.
    pub fn parse_fallback(&self) -> (FallbackPolicy, Vec<ConfigIssue>) {
        match self.fallback.parse::<FallbackPolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue,
                    format!(
                        "session.fallback: unknown value '{}' (expected auto or round_robin), falling back to '{}'",
                        self.fallback,
                        FallbackPolicy::default()
                    ),
                );
                (FallbackPolicy::default(), vec![issue])
            }
        }
    }

    /// Convert to [`SessionParams`], returning validation issues.
    pub fn to_session_params(&self) -> (SessionParams, Vec<ConfigIssue>) {
        let (fallback, mut issues) = self.parse_fallback();

        if self.max_rounds < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::RoundCapTooSmall,
                format!(
                    "session.max_rounds: {} leaves no room for a reply (minimum 2)",
                    self.max_rounds
                ),
            ));
        }
        for (field, value) in [
            ("turn_timeout_secs", self.turn_timeout_secs),
            ("human_timeout_secs", self.human_timeout_secs),
        ] {
            if value == Some(0) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout,
                    format!("session.{}: cannot be 0 (omit it to wait forever)", field),
                ));
            }
        }

        let params = SessionParams::default()
            .with_max_rounds(self.max_rounds)
            .with_max_turn_retries(self.max_turn_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_turn_timeout(self.turn_timeout_secs.map(Duration::from_secs))
            .with_human_timeout(self.human_timeout_secs.map(Duration::from_secs))
            .with_max_human_reprompts(self.max_human_reprompts)
            .with_max_capability_calls(self.max_capability_calls)
            .with_fallback(fallback);

        (params, issues)
    }

    /// Opening message, or the standard one
    pub fn opening(&self) -> &str {
        self.opening_message
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_OPENING)
    }
}
