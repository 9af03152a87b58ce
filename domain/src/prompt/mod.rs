//! Prompt domain
//!
//! Role instructions and the templates used to build each turn's prompt.

pub mod instructions;
mod template;

pub use instructions::default_instructions;
pub use template::PromptTemplate;
