//! Presentation layer for finadvisor
//!
//! This crate contains the CLI definition, the console human input,
//! output formatters and progress reporters.

pub mod cli;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, FallbackArg, OutputArg};
pub use input::{InteractiveHumanInput, load_script};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
