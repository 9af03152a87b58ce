//! Conversation domain.
//!
//! - [`message::Message`]: an immutable `(sender, text, ordinal)` record
//! - [`log::ConversationLog`]: the append-only message sequence
//! - [`entities::Conversation`]: roster + log + round accounting for one session
//! - [`entities::Termination`]: why a session stopped without an error

pub mod entities;
pub mod log;
pub mod message;

pub use entities::{Conversation, DEFAULT_MAX_ROUNDS, DEFAULT_OPENING, Termination};
pub use log::ConversationLog;
pub use message::Message;
