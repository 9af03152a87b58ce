//! Domain layer for finadvisor
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A session is a turn-taking conversation between a human client and a
//! roster of role-tagged agents. The [`Conversation`] aggregate owns the
//! append-only [`ConversationLog`] and enforces the round cap.
//!
//! ## Dispatch
//!
//! Who speaks next is decided by [`dispatch::select`], a pure state machine
//! keyed by the last speaker's [`Role`] and the protocol [`Trigger`]s found in
//! the latest message. When no rule applies it returns
//! [`DispatchDecision::Fallback`] and the [`FallbackPolicy`] decides.

pub mod capability;
pub mod config;
pub mod conversation;
pub mod core;
pub mod dispatch;
pub mod participant;
pub mod profile;
pub mod prompt;

// Re-export commonly used types
pub use capability::{Capability, CapabilityCall, CapabilityExchange, CapabilityKind};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use conversation::{
    Conversation, ConversationLog, DEFAULT_MAX_ROUNDS, DEFAULT_OPENING, Message, Termination,
};
pub use core::error::DomainError;
pub use dispatch::{
    DispatchDecision, FallbackPolicy, Trigger, TriggerSet, extract_triggers, is_termination,
};
pub use participant::{
    Participant, ParticipantId, ParticipantRegistry, Role, RosterOptions, build_roster,
};
pub use profile::CustomerProfile;
pub use prompt::{PromptTemplate, default_instructions};
