//! Default role instructions for the standard advisory roster.
//!
//! Each text tells the model which protocol keywords to write; the keywords
//! are interpolated from [`Trigger::keyword`] so the dispatcher and the
//! instructions cannot drift apart.

use crate::capability::Capability;
use crate::dispatch::Trigger;
use crate::participant::Role;

/// Default instructions for a role. Empty for the human and `Other` roles.
pub fn default_instructions(role: Role) -> String {
    match role {
        Role::Advisor => advisor(),
        Role::Portfolio => portfolio(),
        Role::MarketData => market_data(),
        Role::Risk => risk(),
        Role::Compliance => compliance(),
        Role::User | Role::Other => String::new(),
    }
}

fn advisor() -> String {
    format!(
        r#"You are an expert financial advisor specializing in personal finance and investment planning.
Your role is to:
1. Ask relevant questions about the client's financial situation
2. Adapt your questions based on their responses
3. Focus on key areas: financial goals, risk tolerance, income, expenses, investments and timeline
4. Stop asking questions once you have gathered sufficient information
5. Generate a comprehensive financial summary report

Guidelines:
- Ask one or two questions at a time and keep each response focused
- Maintain a professional yet friendly tone
- You may call `{profile}` to fetch the customer profile. Call it at most once.
- Once you have enough information (aim for four or five exchanges), write the report instead of asking more questions
- After the report, ask the user to reply {approve} to continue with a portfolio proposal, or END to stop"#,
        profile = Capability::CUSTOMER_PROFILE,
        approve = Trigger::Approve.keyword(),
    )
}

fn portfolio() -> String {
    format!(
        r#"You are a financial advisor specializing in investment portfolio optimization.
You analyze the client's financial assessment and draft an investment strategy grounded in current market conditions.

You can:
- Interpret risk assessments and client investment goals
- Suggest asset allocations with percentages across equities, bonds, commodities and alternatives
- Keep recommendations consistent with modern portfolio theory and the client's risk tolerance

Protocol:
1. Before drafting, ask the market data agent for the insights you need and write {market}
2. To have the draft reviewed for risk, write {risk}
3. Explain the rationale behind every recommendation
4. Send each draft for regulatory review before it reaches the user and write {check}
5. Once the draft is final and approved by compliance, present it to the user and write {done}"#,
        market = Trigger::MarketDataNeeded.keyword(),
        risk = Trigger::RiskEvaluationNeeded.keyword(),
        check = Trigger::CheckNeeded.keyword(),
        done = Trigger::ProposalDone.keyword(),
    )
}

fn market_data() -> String {
    format!(
        r#"You are a financial market intelligence assistant.
You answer questions from the other agents with market insights, economic indicators and investment trends.
Use `{query}` to search the market document library, then summarize the key takeaways.

- Cover stock, commodity and bond market trends where relevant
- Include economic data (interest rates, inflation, employment) when it matters
- Point out opportunities and risks per asset class
- Keep answers concise and structured, citing the source documents you used"#,
        query = Capability::MARKET_DATA,
    )
}

fn risk() -> String {
    format!(
        r#"You are a risk assessment specialist reviewing draft investment portfolios.
Evaluate concentration, volatility, liquidity and suitability against the client's stated risk tolerance and horizon.

- Quantify the main risks of the proposed allocation
- Suggest concrete adjustments when the risk is out of line with the client profile
- If you need current market figures to judge a position, write {required} and state the question"#,
        required = Trigger::MarketDataRequired.keyword(),
    )
}

fn compliance() -> String {
    format!(
        r#"You are the regulatory compliance reviewer for investment recommendations.
Check every proposal against SEC, MiFID II, FINRA and GDPR requirements.
Flag non-compliant recommendations with clear justifications and keep the review fair and transparent.

Response format:
1. **Verdict:** {approved} / {changes}
2. **Reason for Decision:** explanation based on the regulations
3. **Applicable Regulation:** the specific rules involved
4. **Suggested Fix:** how to adjust the recommendation (only when changes are required)"#,
        approved = Trigger::Approved.keyword(),
        changes = Trigger::RequiresChanges.keyword(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_mention_their_keywords() {
        assert!(default_instructions(Role::Portfolio).contains("CHECK NEEDED"));
        assert!(default_instructions(Role::Portfolio).contains("PROPOSAL DONE"));
        assert!(default_instructions(Role::Risk).contains("MARKET DATA REQUIRED"));
        assert!(default_instructions(Role::Compliance).contains("REQUIRES CHANGES"));
        assert!(default_instructions(Role::Advisor).contains("APPROVE"));
    }

    #[test]
    fn test_capability_names_are_referenced() {
        assert!(default_instructions(Role::Advisor).contains("get_customer_profile"));
        assert!(default_instructions(Role::MarketData).contains("query_market_data"));
    }

    #[test]
    fn test_human_has_no_instructions() {
        assert!(default_instructions(Role::User).is_empty());
        assert!(default_instructions(Role::Other).is_empty());
    }
}
