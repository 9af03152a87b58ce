//! Text generation providers
//!
//! Adapters implementing the
//! [`TextGenerator`](finadvisor_application::TextGenerator) port.

pub mod openai;

pub use openai::{OpenAiSettings, OpenAiTextGenerator};
