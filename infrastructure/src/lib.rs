//! Infrastructure layer for finadvisor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod knowledge;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use knowledge::{IndexError, LocalKnowledgeIndex};
pub use logging::JsonlConversationLogger;
pub use providers::{OpenAiSettings, OpenAiTextGenerator};
