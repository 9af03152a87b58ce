//! Speaker-selection dispatcher.
//!
//! A finite-state machine whose states are dispatch roles. Each state owns an
//! ordered list of transitions; the first one whose condition holds and whose
//! target role is on the roster wins. When nothing matches the decision is
//! [`DispatchDecision::Fallback`] and the driver's fallback policy picks.
//!
//! ```text
//! User       ──APPROVE──────────────────────▶ Portfolio
//! User       ──prev sender = Advisor────────▶ Advisor
//! Portfolio  ──PROPOSAL DONE────────────────▶ User
//! Portfolio  ──CHECK NEEDED─────────────────▶ Compliance
//! Portfolio  ──RISK EVALUATION NEEDED───────▶ Risk
//! Portfolio  ──MARKET DATA NEEDED───────────▶ MarketData
//! Portfolio  ──(no Risk on roster)──────────▶ MarketData
//! Risk       ──MARKET DATA REQUIRED─────────▶ MarketData
//! Risk       ──always───────────────────────▶ Portfolio
//! MarketData ──prev sender ∈ {Portfolio, Risk}▶ that sender
//! Compliance ──APPROVED | REQUIRES CHANGES──▶ Portfolio
//! ```

use super::decision::DispatchDecision;
use super::triggers::{Trigger, TriggerSet, extract_triggers};
use crate::conversation::{Conversation, ConversationLog};
use crate::core::error::DomainError;
use crate::participant::{ParticipantRegistry, Role};

/// Condition guarding a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Latest message contains the trigger
    Contains(Trigger),
    /// Latest message contains at least one of the triggers
    ContainsAny(&'static [Trigger]),
    /// The message before the latest was sent by the role
    PreviousSenderIs(Role),
    /// The message before the latest was sent by one of the roles
    PreviousSenderIn(&'static [Role]),
    /// No participant holds the role
    RoleAbsent(Role),
}

/// Where a matching transition sends the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Role(Role),
    /// Whoever sent the message before the latest
    PreviousSender,
}

/// One row of the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Role,
    pub when: Condition,
    pub to: Target,
}

const fn rule(from: Role, when: Condition, to: Target) -> Transition {
    Transition { from, when, to }
}

/// The advisory protocol, in evaluation order per state
pub const TRANSITIONS: &[Transition] = &[
    rule(Role::User, Condition::Contains(Trigger::Approve), Target::Role(Role::Portfolio)),
    rule(
        Role::User,
        Condition::PreviousSenderIs(Role::Advisor),
        Target::Role(Role::Advisor),
    ),
    rule(
        Role::Portfolio,
        Condition::Contains(Trigger::ProposalDone),
        Target::Role(Role::User),
    ),
    rule(
        Role::Portfolio,
        Condition::Contains(Trigger::CheckNeeded),
        Target::Role(Role::Compliance),
    ),
    rule(
        Role::Portfolio,
        Condition::Contains(Trigger::RiskEvaluationNeeded),
        Target::Role(Role::Risk),
    ),
    rule(
        Role::Portfolio,
        Condition::Contains(Trigger::MarketDataNeeded),
        Target::Role(Role::MarketData),
    ),
    rule(
        Role::Portfolio,
        Condition::RoleAbsent(Role::Risk),
        Target::Role(Role::MarketData),
    ),
    rule(
        Role::Risk,
        Condition::Contains(Trigger::MarketDataRequired),
        Target::Role(Role::MarketData),
    ),
    rule(Role::Risk, Condition::Always, Target::Role(Role::Portfolio)),
    rule(
        Role::MarketData,
        Condition::PreviousSenderIn(&[Role::Portfolio, Role::Risk]),
        Target::PreviousSender,
    ),
    rule(
        Role::Compliance,
        Condition::ContainsAny(&[Trigger::Approved, Trigger::RequiresChanges]),
        Target::Role(Role::Portfolio),
    ),
];

/// What a transition sees when it is evaluated
struct DispatchState<'a> {
    triggers: TriggerSet,
    previous_role: Option<Role>,
    participants: &'a ParticipantRegistry,
}

impl Condition {
    fn holds(&self, state: &DispatchState<'_>) -> bool {
        match *self {
            Condition::Always => true,
            Condition::Contains(trigger) => state.triggers.contains(trigger),
            Condition::ContainsAny(triggers) => state.triggers.contains_any(triggers),
            Condition::PreviousSenderIs(role) => state.previous_role == Some(role),
            Condition::PreviousSenderIn(roles) => state
                .previous_role
                .is_some_and(|previous| roles.contains(&previous)),
            Condition::RoleAbsent(role) => !state.participants.has_role(role),
        }
    }
}

impl Target {
    fn resolve(&self, state: &DispatchState<'_>) -> Option<Role> {
        match *self {
            Target::Role(role) => Some(role),
            Target::PreviousSender => state.previous_role,
        }
    }
}

/// Select the next speaker.
///
/// Pure: reads the inputs and nothing else. With at most one message in the
/// log the Advisor always speaks next. Otherwise `last_speaker` must be a
/// registered participant, or the call fails with
/// [`DomainError::UnknownSpeaker`].
pub fn select(
    last_speaker: &str,
    log: &ConversationLog,
    participants: &ParticipantRegistry,
) -> Result<DispatchDecision, DomainError> {
    if log.len() <= 1 {
        return Ok(decide(participants, Some(Role::Advisor)));
    }

    let speaker = participants
        .get(last_speaker)
        .ok_or_else(|| DomainError::UnknownSpeaker(last_speaker.to_string()))?;

    let state = DispatchState {
        triggers: log
            .last()
            .map(|m| extract_triggers(m.text()))
            .unwrap_or_default(),
        previous_role: log
            .from_end(2)
            .and_then(|m| participants.get(m.sender().as_str()))
            .map(|p| p.role),
        participants,
    };

    let next = TRANSITIONS
        .iter()
        .filter(|t| t.from == speaker.role)
        .filter(|t| t.when.holds(&state))
        .filter_map(|t| t.to.resolve(&state))
        .find(|role| participants.has_role(*role));

    Ok(decide(participants, next))
}

/// Select the speaker after the latest message of a running conversation
pub fn select_next(conversation: &Conversation) -> Result<DispatchDecision, DomainError> {
    let last_speaker = conversation
        .last_speaker()
        .map(|id| id.as_str())
        .unwrap_or_default();
    select(last_speaker, conversation.log(), conversation.participants())
}

fn decide(participants: &ParticipantRegistry, role: Option<Role>) -> DispatchDecision {
    role.and_then(|role| participants.by_role(role))
        .map(|p| DispatchDecision::Concrete(p.id.clone()))
        .unwrap_or(DispatchDecision::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::{Participant, ParticipantId};

    const USER: &str = "user";
    const ADVISOR: &str = "FinancialAdvisor";
    const PORTFOLIO: &str = "PortfolioRecommendationAgent";
    const MARKET: &str = "MarketDataAgent";
    const RISK: &str = "RiskAssessmentAgent";
    const COMPLIANCE: &str = "RegulatoryComplianceAgent";

    fn full_roster() -> ParticipantRegistry {
        ParticipantRegistry::new(vec![
            Participant::human(USER),
            Participant::new(ADVISOR, Role::Advisor, "a"),
            Participant::new(PORTFOLIO, Role::Portfolio, "p"),
            Participant::new(MARKET, Role::MarketData, "m"),
            Participant::new(RISK, Role::Risk, "r"),
            Participant::new(COMPLIANCE, Role::Compliance, "c"),
        ])
        .unwrap()
    }

    fn roster_without(roles: &[Role]) -> ParticipantRegistry {
        let full = full_roster();
        ParticipantRegistry::new(full.iter().filter(|p| !roles.contains(&p.role)).cloned())
            .unwrap()
    }

    fn log_of(entries: &[(&str, &str)]) -> ConversationLog {
        let mut log = ConversationLog::new();
        for (sender, text) in entries {
            log.append(ParticipantId::new(*sender), *text).unwrap();
        }
        log
    }

    fn concrete(id: &str) -> DispatchDecision {
        DispatchDecision::Concrete(ParticipantId::new(id))
    }

    #[test]
    fn test_opening_message_goes_to_advisor() {
        let log = log_of(&[(USER, "I want advice")]);
        assert_eq!(select(USER, &log, &full_roster()).unwrap(), concrete(ADVISOR));
    }

    #[test]
    fn test_short_log_ignores_last_speaker() {
        let registry = full_roster();
        let empty = ConversationLog::new();
        assert_eq!(select("GhostAgent", &empty, &registry).unwrap(), concrete(ADVISOR));

        let single = log_of(&[(USER, "CHECK NEEDED")]);
        assert_eq!(select(PORTFOLIO, &single, &registry).unwrap(), concrete(ADVISOR));
    }

    #[test]
    fn test_short_log_without_advisor_falls_back() {
        let registry = roster_without(&[Role::Advisor]);
        let log = log_of(&[(USER, "hi")]);
        assert_eq!(select(USER, &log, &registry).unwrap(), DispatchDecision::Fallback);
    }

    #[test]
    fn test_user_approval_goes_to_portfolio() {
        let log = log_of(&[(ADVISOR, "Here is your summary"), (USER, "I APPROVE this")]);
        assert_eq!(select(USER, &log, &full_roster()).unwrap(), concrete(PORTFOLIO));
    }

    #[test]
    fn test_user_answering_advisor_returns_to_advisor() {
        let log = log_of(&[
            (USER, "I want advice"),
            (ADVISOR, "What is your age?"),
            (USER, "I am 40"),
        ]);
        assert_eq!(select(USER, &log, &full_roster()).unwrap(), concrete(ADVISOR));
    }

    #[test]
    fn test_user_otherwise_falls_back() {
        let log = log_of(&[
            (USER, "I want advice"),
            (PORTFOLIO, "Draft ready. PROPOSAL DONE"),
            (USER, "Thanks, what about crypto?"),
        ]);
        assert_eq!(select(USER, &log, &full_roster()).unwrap(), DispatchDecision::Fallback);
    }

    #[test]
    fn test_approve_outranks_advisor_reply() {
        let log = log_of(&[(USER, "hi"), (ADVISOR, "Summary done"), (USER, "APPROVE")]);
        assert_eq!(select(USER, &log, &full_roster()).unwrap(), concrete(PORTFOLIO));
    }

    #[test]
    fn test_portfolio_triggers_in_table_order() {
        let registry = full_roster();
        let cases = [
            ("Final plan. PROPOSAL DONE", USER),
            ("Draft v1. CHECK NEEDED", COMPLIANCE),
            ("RISK EVALUATION NEEDED on crypto share", RISK),
            ("MARKET DATA NEEDED for gold", MARKET),
            // First listed trigger wins when several appear
            ("CHECK NEEDED and MARKET DATA NEEDED", COMPLIANCE),
            ("PROPOSAL DONE. CHECK NEEDED", USER),
        ];
        for (text, expected) in cases {
            let log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, text)]);
            assert_eq!(
                select(PORTFOLIO, &log, &registry).unwrap(),
                concrete(expected),
                "text: {}",
                text
            );
        }
    }

    #[test]
    fn test_portfolio_without_trigger_falls_back_on_full_roster() {
        let log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, "Thinking about allocations")]);
        assert_eq!(
            select(PORTFOLIO, &log, &full_roster()).unwrap(),
            DispatchDecision::Fallback
        );
    }

    #[test]
    fn test_portfolio_without_trigger_goes_to_market_data_when_risk_absent() {
        let registry = roster_without(&[Role::Risk]);
        let log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, "Thinking about allocations")]);
        assert_eq!(select(PORTFOLIO, &log, &registry).unwrap(), concrete(MARKET));
    }

    #[test]
    fn test_missing_target_role_falls_through() {
        // Risk requested but absent: continue down the table to MarketData
        let registry = roster_without(&[Role::Risk]);
        let log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, "RISK EVALUATION NEEDED")]);
        assert_eq!(select(PORTFOLIO, &log, &registry).unwrap(), concrete(MARKET));

        // Compliance absent and nothing else applies
        let registry = roster_without(&[Role::Compliance]);
        let log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, "CHECK NEEDED")]);
        assert_eq!(select(PORTFOLIO, &log, &registry).unwrap(), DispatchDecision::Fallback);
    }

    #[test]
    fn test_market_data_round_trip_to_portfolio() {
        let registry = full_roster();
        let mut log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, "MARKET DATA NEEDED for gold")]);
        assert_eq!(select(PORTFOLIO, &log, &registry).unwrap(), concrete(MARKET));

        log.append(ParticipantId::new(MARKET), "Gold is stable").unwrap();
        assert_eq!(select(MARKET, &log, &registry).unwrap(), concrete(PORTFOLIO));
    }

    #[test]
    fn test_market_data_returns_to_risk() {
        let log = log_of(&[
            (PORTFOLIO, "RISK EVALUATION NEEDED"),
            (RISK, "MARKET DATA REQUIRED on volatility"),
            (MARKET, "VIX is low"),
        ]);
        assert_eq!(select(MARKET, &log, &full_roster()).unwrap(), concrete(RISK));
    }

    #[test]
    fn test_market_data_unknown_requester_falls_back() {
        let log = log_of(&[(USER, "hi"), (MARKET, "Gold is stable")]);
        assert_eq!(select(MARKET, &log, &full_roster()).unwrap(), DispatchDecision::Fallback);
    }

    #[test]
    fn test_risk_transitions() {
        let registry = full_roster();
        let log = log_of(&[(PORTFOLIO, "RISK EVALUATION NEEDED"), (RISK, "MARKET DATA REQUIRED")]);
        assert_eq!(select(RISK, &log, &registry).unwrap(), concrete(MARKET));

        let log = log_of(&[(PORTFOLIO, "RISK EVALUATION NEEDED"), (RISK, "Risk is moderate")]);
        assert_eq!(select(RISK, &log, &registry).unwrap(), concrete(PORTFOLIO));
    }

    #[test]
    fn test_compliance_verdicts() {
        let registry = full_roster();
        for verdict in ["Verdict: APPROVED", "Verdict: REQUIRES CHANGES"] {
            let log = log_of(&[(PORTFOLIO, "CHECK NEEDED"), (COMPLIANCE, verdict)]);
            assert_eq!(select(COMPLIANCE, &log, &registry).unwrap(), concrete(PORTFOLIO));
        }
    }

    #[test]
    fn test_compliance_without_verdict_falls_back() {
        let log = log_of(&[(PORTFOLIO, "CHECK NEEDED"), (COMPLIANCE, "Verdict: Compliant")]);
        assert_eq!(
            select(COMPLIANCE, &log, &full_roster()).unwrap(),
            DispatchDecision::Fallback
        );
    }

    #[test]
    fn test_advisor_state_always_falls_back() {
        let log = log_of(&[(USER, "hi"), (ADVISOR, "APPROVE CHECK NEEDED")]);
        assert_eq!(select(ADVISOR, &log, &full_roster()).unwrap(), DispatchDecision::Fallback);
    }

    #[test]
    fn test_other_role_falls_back() {
        let mut participants: Vec<Participant> = full_roster().iter().cloned().collect();
        participants.push(Participant::new("Observer", Role::Other, "o"));
        let registry = ParticipantRegistry::new(participants).unwrap();
        let log = log_of(&[(USER, "hi"), ("Observer", "PROPOSAL DONE")]);
        assert_eq!(select("Observer", &log, &registry).unwrap(), DispatchDecision::Fallback);
    }

    #[test]
    fn test_unknown_last_speaker_is_invariant_violation() {
        let log = log_of(&[(USER, "hi"), (ADVISOR, "hello")]);
        let err = select("GhostAgent", &log, &full_roster()).unwrap_err();
        assert_eq!(err, DomainError::UnknownSpeaker("GhostAgent".to_string()));
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_select_is_pure() {
        let registry = full_roster();
        let log = log_of(&[(USER, "APPROVE"), (PORTFOLIO, "MARKET DATA NEEDED")]);
        let before = log.clone();
        let first = select(PORTFOLIO, &log, &registry).unwrap();
        let second = select(PORTFOLIO, &log, &registry).unwrap();
        assert_eq!(first, second);
        assert_eq!(log, before);
    }

    #[test]
    fn test_select_next_uses_conversation_state() {
        let mut conversation = Conversation::start(full_roster(), 10, "I want advice").unwrap();
        assert_eq!(select_next(&conversation).unwrap(), concrete(ADVISOR));

        conversation
            .append(&ParticipantId::new(ADVISOR), "What is your income?")
            .unwrap();
        conversation.append(&ParticipantId::new(USER), "50000HKD").unwrap();
        assert_eq!(select_next(&conversation).unwrap(), concrete(ADVISOR));
    }

    #[test]
    fn test_table_only_covers_dispatch_roles() {
        assert!(TRANSITIONS.iter().all(|t| t.from.is_dispatch_role()));
        assert!(!TRANSITIONS.iter().any(|t| t.from == Role::Advisor));
    }
}
