//! Text generation port
//!
//! Defines the interface to the Text Generation Service: role instructions
//! and conversation history in, message text (or capability calls) out.

use async_trait::async_trait;
use finadvisor_domain::{
    Capability, CapabilityCall, CapabilityExchange, Conversation, Message, Participant,
    ParticipantId, PromptTemplate,
};
use thiserror::Error;

/// Errors that can occur while generating text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GenerationError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Connection(_)
            | GenerationError::Timeout
            | GenerationError::RateLimited(_) => true,
            GenerationError::Server { status, .. } => *status >= 500,
            GenerationError::Authentication(_)
            | GenerationError::InvalidResponse(_)
            | GenerationError::Other(_) => false,
        }
    }
}

/// Everything the service needs to speak as one participant
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Participant the model speaks as; its own past messages are replayed
    /// as assistant turns
    pub speaker: ParticipantId,
    pub system_prompt: String,
    pub history: Vec<Message>,
    /// Capabilities the model may call during this turn
    pub capabilities: Vec<Capability>,
    /// Calls already made this turn, with their outputs
    pub exchanges: Vec<CapabilityExchange>,
}

impl GenerationRequest {
    /// Build the request for `speaker`'s next turn in `conversation`
    pub fn for_turn(speaker: &Participant, conversation: &Conversation) -> Self {
        Self {
            speaker: speaker.id.clone(),
            system_prompt: PromptTemplate::turn_system(speaker, conversation.participants()),
            history: conversation.messages().to_vec(),
            capabilities: speaker.capability.iter().cloned().collect(),
            exchanges: Vec::new(),
        }
    }

    /// Stop offering capabilities; calls already made stay in the request
    pub fn without_capabilities(mut self) -> Self {
        self.capabilities.clear();
        self
    }
}

/// Output of one generation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// Message text; may be empty when the model only requested calls
    pub text: String,
    /// Capability calls the model wants executed before it answers
    pub calls: Vec<CapabilityCall>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Vec::new(),
        }
    }

    pub fn calls(calls: Vec<CapabilityCall>) -> Self {
        Self {
            text: String::new(),
            calls,
        }
    }

    /// True when the model answered without requesting any calls
    pub fn is_final(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Gateway to the Text Generation Service
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce the next message for `request.speaker`
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError>;

    /// Single-shot completion without history or capabilities
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use finadvisor_domain::{ParticipantRegistry, Role};

    #[test]
    fn test_retryable_errors() {
        assert!(GenerationError::Timeout.is_retryable());
        assert!(GenerationError::Connection("reset".into()).is_retryable());
        assert!(GenerationError::RateLimited("slow down".into()).is_retryable());
        assert!(
            GenerationError::Server {
                status: 503,
                message: "unavailable".into()
            }
            .is_retryable()
        );
        assert!(
            !GenerationError::Server {
                status: 400,
                message: "bad request".into()
            }
            .is_retryable()
        );
        assert!(!GenerationError::Authentication("bad key".into()).is_retryable());
    }

    #[test]
    fn test_request_for_turn() {
        let registry = ParticipantRegistry::new(vec![
            Participant::human("user"),
            Participant::new("FinancialAdvisor", Role::Advisor, "Advise.")
                .with_capability(Capability::customer_profile()),
        ])
        .unwrap();
        let conversation = Conversation::start(registry, 5, "I want advice").unwrap();
        let advisor = conversation
            .participants()
            .get("FinancialAdvisor")
            .unwrap()
            .clone();

        let request = GenerationRequest::for_turn(&advisor, &conversation);
        assert_eq!(request.speaker.as_str(), "FinancialAdvisor");
        assert!(request.system_prompt.starts_with("Advise."));
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.capabilities.len(), 1);
        assert!(request.without_capabilities().capabilities.is_empty());
    }

    #[test]
    fn test_generation_is_final() {
        assert!(Generation::text("hello").is_final());
        let call = CapabilityCall::new("c1", "get_customer_profile", "");
        assert!(!Generation::calls(vec![call]).is_final());
    }
}
