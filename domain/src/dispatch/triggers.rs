//! Keyword triggers in free-text model output.
//!
//! Agents signal protocol steps by writing fixed upper-case phrases into
//! their messages ("CHECK NEEDED", "PROPOSAL DONE", ...). This module is the
//! only place those literals live: the dispatcher matches on [`Trigger`]
//! values produced by [`extract_triggers`].
//!
//! Matching is a case-sensitive substring search, so `APPROVE` also fires
//! for `APPROVED`. The end token is the one exception: [`is_termination`]
//! looks for it in the upper-cased text.

use std::fmt;

/// A protocol keyword recognised in message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// User accepts the advisor's summary
    Approve,
    /// Portfolio proposal is final and compliance-approved
    ProposalDone,
    /// Portfolio asks compliance to review the draft
    CheckNeeded,
    /// Portfolio asks for a risk review
    RiskEvaluationNeeded,
    /// Portfolio asks for market data
    MarketDataNeeded,
    /// Risk reviewer asks for market data
    MarketDataRequired,
    /// Compliance approves the draft
    Approved,
    /// Compliance rejects the draft
    RequiresChanges,
}

const KEYWORDS: [(Trigger, &str); 8] = [
    (Trigger::Approve, "APPROVE"),
    (Trigger::ProposalDone, "PROPOSAL DONE"),
    (Trigger::CheckNeeded, "CHECK NEEDED"),
    (Trigger::RiskEvaluationNeeded, "RISK EVALUATION NEEDED"),
    (Trigger::MarketDataNeeded, "MARKET DATA NEEDED"),
    (Trigger::MarketDataRequired, "MARKET DATA REQUIRED"),
    (Trigger::Approved, "APPROVED"),
    (Trigger::RequiresChanges, "REQUIRES CHANGES"),
];

/// Human-interrupt token; matched as a whole word, ignoring case
const END_TOKEN: &str = "END";

impl Trigger {
    /// The literal phrase that fires this trigger
    pub fn keyword(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(trigger, _)| *trigger == self)
            .map(|(_, keyword)| *keyword)
            .unwrap_or_default()
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Set of triggers found in one message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerSet(u16);

impl TriggerSet {
    pub fn contains(&self, trigger: Trigger) -> bool {
        self.0 & trigger.bit() != 0
    }

    pub fn contains_any(&self, triggers: &[Trigger]) -> bool {
        triggers.iter().any(|t| self.contains(*t))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Triggers in keyword-table order
    pub fn iter(&self) -> impl Iterator<Item = Trigger> + '_ {
        KEYWORDS
            .iter()
            .map(|(trigger, _)| *trigger)
            .filter(|t| self.contains(*t))
    }

    fn insert(&mut self, trigger: Trigger) {
        self.0 |= trigger.bit();
    }
}

/// Scan message text for every protocol keyword.
pub fn extract_triggers(text: &str) -> TriggerSet {
    let mut set = TriggerSet::default();
    for (trigger, keyword) in KEYWORDS {
        if text.contains(keyword) {
            set.insert(trigger);
        }
    }
    set
}

/// Whether a message ends the conversation.
///
/// Plain substring search on the upper-cased text: "end.", "[End]" and
/// also "recommend" or "spending" all count.
pub fn is_termination(text: &str) -> bool {
    text.to_uppercase().contains(END_TOKEN)
}
