//! Standard advisory roster

use super::entities::{Participant, Role};
use super::registry::ParticipantRegistry;
use crate::capability::Capability;
use crate::core::error::DomainError;
use crate::prompt::default_instructions;
use std::collections::HashMap;

/// Which optional roles to seat and how to override role instructions
#[derive(Debug, Clone)]
pub struct RosterOptions {
    pub include_risk: bool,
    pub include_compliance: bool,
    /// Replacement instructions per role; roles not listed keep the defaults
    pub instruction_overrides: HashMap<Role, String>,
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            include_risk: true,
            include_compliance: true,
            instruction_overrides: HashMap::new(),
        }
    }
}

impl RosterOptions {
    pub fn without_risk(mut self) -> Self {
        self.include_risk = false;
        self
    }

    pub fn without_compliance(mut self) -> Self {
        self.include_compliance = false;
        self
    }

    pub fn with_instructions(mut self, role: Role, instructions: impl Into<String>) -> Self {
        self.instruction_overrides.insert(role, instructions.into());
        self
    }

    fn roles(&self) -> Vec<Role> {
        let mut roles = vec![Role::User, Role::Advisor, Role::Portfolio, Role::MarketData];
        if self.include_compliance {
            roles.push(Role::Compliance);
        }
        if self.include_risk {
            roles.push(Role::Risk);
        }
        roles
    }

    fn instructions_for(&self, role: Role) -> String {
        self.instruction_overrides
            .get(&role)
            .cloned()
            .unwrap_or_else(|| default_instructions(role))
    }
}

/// Build the standard roster: user, advisor, portfolio, market data and the
/// optional compliance and risk reviewers, in that order.
///
/// The advisor can fetch the customer profile and the market-data role can
/// query the document library.
pub fn build_roster(options: &RosterOptions) -> Result<ParticipantRegistry, DomainError> {
    let participants = options
        .roles()
        .into_iter()
        .map(|role| {
            let id = role
                .default_id()
                .ok_or_else(|| DomainError::InvalidParticipant(format!("no default name for {}", role)))?;
            let participant = if role.is_human() {
                Participant::human(id)
            } else {
                Participant::new(id, role, options.instructions_for(role))
            };
            Ok(match role {
                Role::Advisor => participant.with_capability(Capability::customer_profile()),
                Role::MarketData => participant.with_capability(Capability::market_data()),
                _ => participant,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    ParticipantRegistry::new(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_roster_order_and_capabilities() {
        let registry = build_roster(&RosterOptions::default()).unwrap();
        let ids: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "user",
                "FinancialAdvisor",
                "PortfolioRecommendationAgent",
                "MarketDataAgent",
                "RegulatoryComplianceAgent",
                "RiskAssessmentAgent",
            ]
        );
        assert!(
            registry
                .get("FinancialAdvisor")
                .unwrap()
                .can_invoke(Capability::CUSTOMER_PROFILE)
        );
        assert!(
            registry
                .get("MarketDataAgent")
                .unwrap()
                .can_invoke(Capability::MARKET_DATA)
        );
        assert!(registry.get("user").unwrap().instructions.is_empty());
    }

    #[test]
    fn test_reduced_roster() {
        let registry = build_roster(&RosterOptions::default().without_risk()).unwrap();
        assert_eq!(registry.len(), 5);
        assert!(!registry.has_role(Role::Risk));

        let registry =
            build_roster(&RosterOptions::default().without_risk().without_compliance()).unwrap();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_instruction_override() {
        let options = RosterOptions::default().with_instructions(Role::Risk, "Be very cautious.");
        let registry = build_roster(&options).unwrap();
        assert_eq!(
            registry.by_role(Role::Risk).unwrap().instructions,
            "Be very cautious."
        );
        assert!(
            registry
                .by_role(Role::Portfolio)
                .unwrap()
                .instructions
                .contains("CHECK NEEDED")
        );
    }
}
