//! Knowledge Query Service adapters

mod index;

pub use index::{IndexError, LocalKnowledgeIndex};
