//! Capability routing
//!
//! Executes a capability call on behalf of a participant by dispatching to
//! the external service behind the capability's kind.

use crate::ports::knowledge_query::{KnowledgeError, KnowledgeQuery};
use crate::ports::profile_lookup::{ProfileError, ProfileLookup};
use finadvisor_domain::{CapabilityCall, CapabilityExchange, CapabilityKind, Participant};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A backing service failed while executing a capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Knowledge query failed: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Profile lookup failed: {0}")]
    Profile(#[from] ProfileError),
}

impl CapabilityError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CapabilityError::Knowledge(e) => e.is_retryable(),
            CapabilityError::Profile(e) => e.is_retryable(),
        }
    }
}

/// Routes capability calls to the Profile Lookup and Knowledge Query services
#[derive(Clone)]
pub struct CapabilityRouter {
    profile: Arc<dyn ProfileLookup>,
    knowledge: Arc<dyn KnowledgeQuery>,
}

impl CapabilityRouter {
    pub fn new(profile: Arc<dyn ProfileLookup>, knowledge: Arc<dyn KnowledgeQuery>) -> Self {
        Self { profile, knowledge }
    }

    /// Execute `call` for `caller`.
    ///
    /// A call to a capability the caller does not hold is refused with a
    /// rejected exchange that the model gets to read; only failures of the
    /// backing service are errors.
    pub async fn execute(
        &self,
        caller: &Participant,
        call: CapabilityCall,
    ) -> Result<CapabilityExchange, CapabilityError> {
        let capability = match caller.capability.as_ref() {
            Some(capability) if capability.name == call.name => capability,
            _ => {
                warn!(
                    "{} requested capability '{}' it does not hold",
                    caller.id, call.name
                );
                let reason = format!(
                    "Capability '{}' is not available to {}. Continue without it.",
                    call.name, caller.id
                );
                return Ok(CapabilityExchange::rejected(call, reason));
            }
        };

        debug!("{} calls {}({:?})", caller.id, call.name, call.argument);
        let output = match capability.kind {
            CapabilityKind::CustomerProfile => self
                .profile
                .lookup(&call.argument)
                .await?
                .to_capability_output(),
            CapabilityKind::MarketData => self.knowledge.query(&call.argument).await?,
        };
        Ok(CapabilityExchange::completed(call, output))
    }
}
