//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod capabilities;
pub mod run_conversation;
pub(crate) mod shared;
