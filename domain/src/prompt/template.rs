//! Prompt templates for conversation turns and model-selected fallback

use crate::conversation::Message;
use crate::participant::{Participant, ParticipantRegistry};

/// Templates for generating prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a participant's turn: its role instructions plus
    /// the group context.
    pub fn turn_system(speaker: &Participant, participants: &ParticipantRegistry) -> String {
        let others = participants
            .iter()
            .filter(|p| p.id != speaker.id)
            .map(|p| format!("- {} ({})", p.id, p.role))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"{instructions}

You are {name}, speaking in a group conversation with:
{others}

Messages from others are prefixed with the sender's name. Reply with your own message only, without a name prefix."#,
            instructions = speaker.instructions.trim(),
            name = speaker.id,
            others = others,
        )
    }

    /// One history line as seen by another participant
    pub fn history_line(message: &Message) -> String {
        format!("{}: {}", message.sender(), message.text())
    }

    /// System prompt for choosing the next speaker when no rule applies
    pub fn selection_system() -> &'static str {
        r#"You coordinate a financial advisory group conversation.
Your only task is to decide which participant should speak next.
Answer with the participant's name and nothing else."#
    }

    /// User prompt for choosing the next speaker
    pub fn selection_prompt(participants: &ParticipantRegistry, history: &[Message]) -> String {
        let roles = participants
            .iter()
            .map(|p| format!("- {}: {}", p.id, role_summary(p)))
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = format!("Participants:\n{}\n\nConversation so far:\n", roles);
        for message in history {
            prompt.push_str(&Self::history_line(message));
            prompt.push('\n');
        }

        let names = participants
            .ids()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            "\nWho should speak next? Reply with exactly one of: {}",
            names
        ));
        prompt
    }
}

fn role_summary(participant: &Participant) -> String {
    if participant.is_human() {
        return "the human client".to_string();
    }
    participant
        .instructions
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| crate::core::string::truncate(line, 120))
        .unwrap_or_else(|| participant.role.to_string())
}
