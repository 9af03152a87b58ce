//! Application layer for finadvisor
//!
//! This crate contains the conversation driver, port definitions, and
//! session parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    human_input::{HumanInputError, HumanInputPort, ScriptedHumanInput},
    knowledge_query::{KnowledgeError, KnowledgeQuery},
    profile_lookup::{FixedProfileLookup, ProfileError, ProfileLookup},
    progress::{ConversationProgress, NoProgress},
    text_generator::{Generation, GenerationError, GenerationRequest, TextGenerator},
};
pub use use_cases::capabilities::{CapabilityError, CapabilityRouter};
pub use use_cases::run_conversation::{
    RunConversationError, RunConversationInput, RunConversationUseCase, SessionFailure,
    SessionOutcome, SessionStats, TurnError,
};
