//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod conversation_logger;
pub mod human_input;
pub mod knowledge_query;
pub mod profile_lookup;
pub mod progress;
pub mod text_generator;
