//! Console output formatter for finished conversations

use colored::Colorize;
use finadvisor_application::{SessionFailure, SessionOutcome};
use finadvisor_domain::{ConversationLog, Message, OutputFormat, ParticipantRegistry};
use serde_json::json;

/// Formats conversation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render an outcome in the requested format
    pub fn render(outcome: &SessionOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Transcript => Self::format_transcript(outcome),
            OutputFormat::Summary => Self::format_summary(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Every message in order, followed by the outcome
    pub fn format_transcript(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Advisory Session Transcript"));
        output.push('\n');

        let participants = outcome.conversation.participants();
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            participants
                .iter()
                .map(|p| format!("{} ({})", p.id, p.role))
                .collect::<Vec<_>>()
                .join(", ")
        ));

        output.push_str(&Self::section_header("Conversation"));
        output.push_str(&Self::messages(outcome.log(), participants));

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&Self::outcome_lines(outcome));

        output.push_str(&Self::footer());
        output
    }

    /// Outcome plus the final message only
    pub fn format_summary(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Advisory Session Summary ===".cyan().bold()
        ));
        output.push_str(&Self::outcome_lines(outcome));

        if let Some(last) = outcome.last_message() {
            output.push_str(&format!(
                "\n{} {}\n{}\n",
                "Final message from".dimmed(),
                last.sender().as_str().bold(),
                last.text()
            ));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &SessionOutcome) -> String {
        let value = json!({
            "termination": outcome.termination,
            "rounds": outcome.conversation.round_count(),
            "max_rounds": outcome.conversation.max_rounds(),
            "participants": outcome
                .conversation
                .participants()
                .iter()
                .map(|p| json!({ "id": p.id, "role": p.role.as_str() }))
                .collect::<Vec<_>>(),
            "stats": outcome.stats,
            "messages": outcome.log().as_slice(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Error report for an aborted session, with whatever log survived
    pub fn format_failure(failure: &SessionFailure) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Session aborted:".red().bold(),
            failure.error
        ));

        if let Some(conversation) = &failure.conversation {
            output.push_str(&Self::section_header(&format!(
                "Conversation so far ({} of {} rounds)",
                conversation.round_count(),
                conversation.max_rounds()
            )));
            output.push_str(&Self::messages(
                conversation.log(),
                conversation.participants(),
            ));
        }

        output
    }

    fn messages(log: &ConversationLog, participants: &ParticipantRegistry) -> String {
        log.iter()
            .map(|message| Self::message(message, participants))
            .collect()
    }

    fn message(message: &Message, participants: &ParticipantRegistry) -> String {
        let is_human = participants
            .get(message.sender().as_str())
            .is_some_and(|p| p.is_human());
        let title = format!("── #{} {} ──", message.ordinal(), message.sender());
        let title = if is_human {
            title.green().bold()
        } else {
            title.yellow().bold()
        };
        format!("\n{}\n{}\n", title, message.text())
    }

    fn outcome_lines(outcome: &SessionOutcome) -> String {
        let stats = &outcome.stats;
        let mut output = format!(
            "{} {}\n{} {}/{}\n",
            "Result:".cyan().bold(),
            outcome.termination.description(),
            "Rounds:".cyan().bold(),
            outcome.conversation.round_count(),
            outcome.conversation.max_rounds()
        );
        if stats.capability_calls > 0 {
            output.push_str(&format!(
                "{} {}\n",
                "Capability calls:".dimmed(),
                stats.capability_calls
            ));
        }
        if stats.fallback_decisions > 0 {
            output.push_str(&format!(
                "{} {}\n",
                "Fallback decisions:".dimmed(),
                stats.fallback_decisions
            ));
        }
        if stats.turn_retries > 0 {
            output.push_str(&format!(
                "{} {}\n",
                "Retried turns:".dimmed(),
                stats.turn_retries
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
