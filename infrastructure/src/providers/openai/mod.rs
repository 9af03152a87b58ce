//! OpenAI-compatible Chat Completions provider

mod generator;
mod types;

pub use generator::{OpenAiSettings, OpenAiTextGenerator};
