//! Capability domain: external functions a participant may invoke mid-turn.
//!
//! A capability is described to the text generation service as a function
//! tool with a single string argument. When a generation asks for it, the
//! conversation driver executes it and feeds the output back before the
//! participant's turn is finalized:
//!
//! ```text
//! Generation ──▶ CapabilityCall ──▶ executor ──▶ CapabilityExchange ──▶ Generation (again)
//! ```
//!
//! Exchanges are turn-local: they are never appended to the conversation log.

use serde::{Deserialize, Serialize};

/// Which external service backs a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Profile Lookup Service
    CustomerProfile,
    /// Knowledge Query Service
    MarketData,
}

/// Definition of a capability bound to a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Function name exposed to the model (e.g. `query_market_data`)
    pub name: String,
    /// Description exposed to the model
    pub description: String,
    pub kind: CapabilityKind,
    /// Name of the single string argument
    pub argument: String,
    /// Description of the argument
    pub argument_description: String,
}

impl Capability {
    pub const CUSTOMER_PROFILE: &'static str = "get_customer_profile";
    pub const MARKET_DATA: &'static str = "query_market_data";

    pub fn customer_profile() -> Self {
        Self {
            name: Self::CUSTOMER_PROFILE.to_string(),
            description: "A function to get the customer profile, please input an empty string"
                .to_string(),
            kind: CapabilityKind::CustomerProfile,
            argument: "name".to_string(),
            argument_description: "Customer name (may be empty)".to_string(),
        }
    }

    pub fn market_data() -> Self {
        Self {
            name: Self::MARKET_DATA.to_string(),
            description:
                "A function to get market insights, please input question for market insights"
                    .to_string(),
            kind: CapabilityKind::MarketData,
            argument: "query".to_string(),
            argument_description: "Natural-language question about financial markets"
                .to_string(),
        }
    }
}

/// A capability invocation requested by the text generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityCall {
    /// Provider-assigned call id, echoed back with the result
    pub id: String,
    pub name: String,
    pub argument: String,
}

impl CapabilityCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            argument: argument.into(),
        }
    }
}

/// A completed capability call and its textual output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityExchange {
    pub call: CapabilityCall,
    pub output: String,
    /// True when `output` describes a refusal (unknown capability, not
    /// bound to the caller) rather than a service answer
    pub rejected: bool,
}

impl CapabilityExchange {
    pub fn completed(call: CapabilityCall, output: impl Into<String>) -> Self {
        Self {
            call,
            output: output.into(),
            rejected: false,
        }
    }

    pub fn rejected(call: CapabilityCall, reason: impl Into<String>) -> Self {
        Self {
            call,
            output: reason.into(),
            rejected: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_capability_names() {
        assert_eq!(Capability::customer_profile().name, "get_customer_profile");
        assert_eq!(Capability::market_data().name, "query_market_data");
        assert_eq!(
            Capability::market_data().kind,
            CapabilityKind::MarketData
        );
    }

    #[test]
    fn test_exchange_constructors() {
        let call = CapabilityCall::new("call_1", "query_market_data", "gold outlook");
        let ok = CapabilityExchange::completed(call.clone(), "Gold is up");
        assert!(!ok.rejected);
        let refused = CapabilityExchange::rejected(call, "not bound");
        assert!(refused.rejected);
        assert_eq!(refused.output, "not bound");
    }
}
