//! Participant domain entities

use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique participant name (Value Object)
///
/// Names are what appear as `sender` in the conversation log, so they are
/// compared exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dispatch role of a participant.
///
/// The speaker-selection state machine is keyed by role, not by name, so a
/// roster may rename participants freely as long as each role is held by at
/// most one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The human client
    User,
    /// Gathers client data and writes the financial summary
    Advisor,
    /// Drafts the portfolio recommendation
    Portfolio,
    /// Answers market questions from the document index
    MarketData,
    /// Reviews the draft for risk
    Risk,
    /// Approves or rejects the draft for regulatory compliance
    Compliance,
    /// Any participant outside the advisory protocol
    Other,
}

impl Role {
    /// All roles that take part in dispatch, in canonical roster order
    pub const DISPATCH_ROLES: [Role; 6] = [
        Role::User,
        Role::Advisor,
        Role::Portfolio,
        Role::MarketData,
        Role::Risk,
        Role::Compliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Advisor => "advisor",
            Role::Portfolio => "portfolio",
            Role::MarketData => "market_data",
            Role::Risk => "risk",
            Role::Compliance => "compliance",
            Role::Other => "other",
        }
    }

    /// Participant name used for this role in the standard roster
    pub fn default_id(&self) -> Option<&'static str> {
        match self {
            Role::User => Some("user"),
            Role::Advisor => Some("FinancialAdvisor"),
            Role::Portfolio => Some("PortfolioRecommendationAgent"),
            Role::MarketData => Some("MarketDataAgent"),
            Role::Risk => Some("RiskAssessmentAgent"),
            Role::Compliance => Some("RegulatoryComplianceAgent"),
            Role::Other => None,
        }
    }

    /// The human role speaks through the human-input port, every other role
    /// through the text generation service.
    pub fn is_human(&self) -> bool {
        matches!(self, Role::User)
    }

    /// Whether the role is a state in the dispatch table (and therefore
    /// must be unique within a roster)
    pub fn is_dispatch_role(&self) -> bool {
        !matches!(self, Role::Other)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "user" | "human" => Ok(Role::User),
            "advisor" | "financial_advisor" => Ok(Role::Advisor),
            "portfolio" => Ok(Role::Portfolio),
            "market_data" | "market" => Ok(Role::MarketData),
            "risk" => Ok(Role::Risk),
            "compliance" => Ok(Role::Compliance),
            "other" => Ok(Role::Other),
            _ => Err(format!("Invalid Role: {}", s)),
        }
    }
}

/// A named conversation participant (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub role: Role,
    /// Role instructions handed to the text generation service as the
    /// system prompt. Empty for the human participant.
    pub instructions: String,
    /// Optional external function the participant may invoke mid-turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<Capability>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, role: Role, instructions: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            instructions: instructions.into(),
            capability: None,
        }
    }

    /// Create the human participant
    pub fn human(id: impl Into<ParticipantId>) -> Self {
        Self::new(id, Role::User, "")
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    pub fn is_human(&self) -> bool {
        self.role.is_human()
    }

    /// Whether this participant may invoke a capability with the given name
    pub fn can_invoke(&self, name: &str) -> bool {
        self.capability.as_ref().is_some_and(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::DISPATCH_ROLES {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!("Market-Data".parse::<Role>().unwrap(), Role::MarketData);
        assert!("banker".parse::<Role>().is_err());
    }

    #[test]
    fn test_only_user_is_human() {
        assert!(Role::User.is_human());
        assert!(!Role::Advisor.is_human());
        assert!(!Role::Other.is_human());
    }

    #[test]
    fn test_default_ids_match_standard_roster_names() {
        assert_eq!(Role::Advisor.default_id(), Some("FinancialAdvisor"));
        assert_eq!(Role::Compliance.default_id(), Some("RegulatoryComplianceAgent"));
        assert_eq!(Role::Other.default_id(), None);
    }

    #[test]
    fn test_participant_capability_check() {
        let advisor = Participant::new("FinancialAdvisor", Role::Advisor, "advise")
            .with_capability(Capability::customer_profile());
        assert!(advisor.can_invoke("get_customer_profile"));
        assert!(!advisor.can_invoke("query_market_data"));

        let user = Participant::human("user");
        assert!(user.is_human());
        assert!(!user.can_invoke("get_customer_profile"));
    }

    #[test]
    fn test_participant_id_serializes_as_plain_string() {
        let id = ParticipantId::new("MarketDataAgent");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"MarketDataAgent\"");
    }
}
