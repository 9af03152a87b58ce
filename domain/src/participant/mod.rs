//! Participant domain.
//!
//! - [`entities::ParticipantId`]: unique participant name
//! - [`entities::Role`]: dispatch role (User, Advisor, Portfolio, ...)
//! - [`entities::Participant`]: a named role with instructions and an optional capability
//! - [`registry::ParticipantRegistry`]: the fixed roster of one session
//! - [`roster`]: the standard advisory roster

pub mod entities;
pub mod registry;
pub mod roster;

pub use entities::{Participant, ParticipantId, Role};
pub use registry::ParticipantRegistry;
pub use roster::{RosterOptions, build_roster};
