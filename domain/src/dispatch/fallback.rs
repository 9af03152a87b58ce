//! Fallback speaker-selection policy

use crate::participant::{Participant, ParticipantRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the driver resolves [`DispatchDecision::Fallback`](super::DispatchDecision::Fallback)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Next participant after the last speaker, in registration order
    RoundRobin,
    /// Ask the text generation service to name the next speaker, falling
    /// back to round-robin when its answer names nobody
    #[default]
    #[serde(rename = "auto")]
    ModelSelected,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::RoundRobin => "round_robin",
            FallbackPolicy::ModelSelected => "auto",
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "round_robin" | "roundrobin" | "rr" => Ok(FallbackPolicy::RoundRobin),
            "auto" | "model" | "model_selected" => Ok(FallbackPolicy::ModelSelected),
            _ => Err(format!(
                "Invalid fallback policy: {} (expected round_robin or auto)",
                s
            )),
        }
    }
}

/// The participant registered after `last`, wrapping around.
///
/// An unknown or absent last speaker starts from the first participant.
pub fn round_robin_after<'a>(
    last: Option<&str>,
    participants: &'a ParticipantRegistry,
) -> Option<&'a Participant> {
    if participants.is_empty() {
        return None;
    }
    let next = last
        .and_then(|id| participants.position(id))
        .map(|index| (index + 1) % participants.len())
        .unwrap_or(0);
    participants.at(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Role;

    fn registry() -> ParticipantRegistry {
        ParticipantRegistry::new(vec![
            Participant::human("user"),
            Participant::new("FinancialAdvisor", Role::Advisor, "a"),
            Participant::new("PortfolioRecommendationAgent", Role::Portfolio, "p"),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_robin_advances_and_wraps() {
        let registry = registry();
        assert_eq!(
            round_robin_after(Some("user"), &registry).unwrap().id.as_str(),
            "FinancialAdvisor"
        );
        assert_eq!(
            round_robin_after(Some("PortfolioRecommendationAgent"), &registry)
                .unwrap()
                .id
                .as_str(),
            "user"
        );
    }

    #[test]
    fn test_round_robin_unknown_starts_at_first() {
        let registry = registry();
        assert_eq!(round_robin_after(None, &registry).unwrap().id.as_str(), "user");
        assert_eq!(
            round_robin_after(Some("GhostAgent"), &registry).unwrap().id.as_str(),
            "user"
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("auto".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::ModelSelected);
        assert_eq!(
            "Round-Robin".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::RoundRobin
        );
        assert!("random".parse::<FallbackPolicy>().is_err());
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::ModelSelected);
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&FallbackPolicy::ModelSelected).unwrap(),
            "\"auto\""
        );
        let policy: FallbackPolicy = serde_json::from_str("\"round_robin\"").unwrap();
        assert_eq!(policy, FallbackPolicy::RoundRobin);
    }
}
