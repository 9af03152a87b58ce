//! Application-level configuration.
//!
//! - [`SessionParams`]: round loop control (round cap, retries, timeouts, fallback)

pub mod session_params;

pub use session_params::SessionParams;
