//! Human participant adapters

pub mod interactive;
pub mod script;

pub use interactive::InteractiveHumanInput;
pub use script::{load_script, parse_script};
