//! Participant registry: the fixed roster of one conversation session.

use super::entities::{Participant, ParticipantId, Role};
use crate::core::error::DomainError;
use std::collections::HashMap;

/// Ordered, immutable set of participants.
///
/// Registration order is preserved (round-robin fallback walks it) and two
/// hash indexes give O(1) lookup by name and by dispatch role.
#[derive(Debug, Clone)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
    by_id: HashMap<ParticipantId, usize>,
    by_role: HashMap<Role, usize>,
}

impl ParticipantRegistry {
    /// Build a registry, rejecting duplicate names, duplicate dispatch roles
    /// and blank names.
    pub fn new(participants: impl IntoIterator<Item = Participant>) -> Result<Self, DomainError> {
        let participants: Vec<Participant> = participants.into_iter().collect();
        let mut by_id = HashMap::with_capacity(participants.len());
        let mut by_role = HashMap::new();

        for (index, participant) in participants.iter().enumerate() {
            if participant.id.as_str().trim().is_empty() {
                return Err(DomainError::InvalidParticipant(
                    "participant name cannot be empty".to_string(),
                ));
            }
            if by_id.insert(participant.id.clone(), index).is_some() {
                return Err(DomainError::DuplicateParticipant(
                    participant.id.to_string(),
                ));
            }
            if participant.role.is_dispatch_role() {
                if let Some(&holder) = by_role.get(&participant.role) {
                    let holder: &Participant = &participants[holder];
                    return Err(DomainError::DuplicateRole {
                        role: participant.role.to_string(),
                        holder: holder.id.to_string(),
                    });
                }
                by_role.insert(participant.role, index);
            }
        }

        Ok(Self {
            participants,
            by_id,
            by_role,
        })
    }

    /// Look up a participant by name
    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.by_id.get(id).map(|&i| &self.participants[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Look up the participant holding a dispatch role.
    ///
    /// A missing role is a normal condition (reduced rosters omit Risk or
    /// Compliance), so this returns `None` rather than an error.
    pub fn by_role(&self, role: Role) -> Option<&Participant> {
        self.by_role.get(&role).map(|&i| &self.participants[i])
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.by_role.contains_key(&role)
    }

    /// Fail with [`DomainError::MissingRole`] unless every role is present
    pub fn require_roles(&self, roles: &[Role]) -> Result<(), DomainError> {
        match roles.iter().find(|role| !self.has_role(**role)) {
            Some(missing) => Err(DomainError::MissingRole(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Registration index of a participant
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Participant at a registration index
    pub fn at(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    /// Find the first participant whose name occurs in `text`.
    ///
    /// Longer names are tried first so that a name that is a prefix of
    /// another (e.g. `user` inside `user_proxy`) does not shadow it.
    pub fn find_mentioned(&self, text: &str) -> Option<&Participant> {
        let mut candidates: Vec<&Participant> = self.participants.iter().collect();
        candidates.sort_by_key(|p| std::cmp::Reverse(p.id.as_str().len()));
        candidates
            .into_iter()
            .find(|p| text.contains(p.id.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter().map(|p| &p.id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![
            Participant::human("user"),
            Participant::new("FinancialAdvisor", Role::Advisor, "a"),
            Participant::new("PortfolioRecommendationAgent", Role::Portfolio, "p"),
            Participant::new("MarketDataAgent", Role::MarketData, "m"),
        ]
    }

    #[test]
    fn test_lookup_by_id_and_role() {
        let registry = ParticipantRegistry::new(roster()).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.get("MarketDataAgent").unwrap().role,
            Role::MarketData
        );
        assert_eq!(
            registry.by_role(Role::Advisor).unwrap().id.as_str(),
            "FinancialAdvisor"
        );
        assert!(registry.get("GhostAgent").is_none());
    }

    #[test]
    fn test_missing_role_is_not_an_error() {
        let registry = ParticipantRegistry::new(roster()).unwrap();
        assert!(registry.by_role(Role::Risk).is_none());
        assert!(!registry.has_role(Role::Compliance));
    }

    #[test]
    fn test_require_roles_reports_first_missing() {
        let registry = ParticipantRegistry::new(roster()).unwrap();
        assert!(registry.require_roles(&[Role::User, Role::Advisor]).is_ok());
        assert_eq!(
            registry.require_roles(&[Role::User, Role::Risk]),
            Err(DomainError::MissingRole("risk".to_string()))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut participants = roster();
        participants.push(Participant::new("user", Role::Other, ""));
        assert_eq!(
            ParticipantRegistry::new(participants).unwrap_err(),
            DomainError::DuplicateParticipant("user".to_string())
        );
    }

    #[test]
    fn test_duplicate_dispatch_role_rejected() {
        let mut participants = roster();
        participants.push(Participant::new("SecondAdvisor", Role::Advisor, ""));
        let err = ParticipantRegistry::new(participants).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateRole { .. }));
    }

    #[test]
    fn test_other_role_may_repeat() {
        let mut participants = roster();
        participants.push(Participant::new("Observer1", Role::Other, ""));
        participants.push(Participant::new("Observer2", Role::Other, ""));
        let registry = ParticipantRegistry::new(participants).unwrap();
        assert!(registry.by_role(Role::Other).is_none());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = ParticipantRegistry::new(vec![Participant::human("  ")]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidParticipant(_)));
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let registry = ParticipantRegistry::new(roster()).unwrap();
        let ids: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "user",
                "FinancialAdvisor",
                "PortfolioRecommendationAgent",
                "MarketDataAgent"
            ]
        );
        assert_eq!(registry.position("PortfolioRecommendationAgent"), Some(2));
    }

    #[test]
    fn test_find_mentioned_prefers_longest_name() {
        let registry = ParticipantRegistry::new(vec![
            Participant::human("user"),
            Participant::new("user_advocate", Role::Other, ""),
        ])
        .unwrap();
        assert_eq!(
            registry.find_mentioned("Next: user_advocate").unwrap().id.as_str(),
            "user_advocate"
        );
        assert_eq!(
            registry.find_mentioned("the user should answer").unwrap().id.as_str(),
            "user"
        );
        assert!(registry.find_mentioned("nobody").is_none());
    }
}
