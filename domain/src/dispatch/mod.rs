//! Speaker selection.
//!
//! - [`triggers`]: the only place protocol keywords are spelled out
//! - [`dispatcher`]: the role-keyed transition table and [`select`]
//! - [`decision::DispatchDecision`]: `Concrete(id) | Fallback`
//! - [`fallback::FallbackPolicy`]: how the driver resolves `Fallback`

pub mod decision;
pub mod dispatcher;
pub mod fallback;
pub mod triggers;

pub use decision::DispatchDecision;
pub use dispatcher::{TRANSITIONS, Transition, select, select_next};
pub use fallback::{FallbackPolicy, round_robin_after};
pub use triggers::{Trigger, TriggerSet, extract_triggers, is_termination};
