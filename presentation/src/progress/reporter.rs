//! Progress reporting for a running conversation

use colored::Colorize;
use finadvisor_application::{ConversationProgress, TurnError};
use finadvisor_domain::core::string::preview;
use finadvisor_domain::{
    CapabilityExchange, Message, Participant, ParticipantId, ParticipantRegistry, Termination,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Longest message preview shown under the spinner
const PREVIEW_CHARS: usize = 72;

/// Reports progress with a spinner while agents are working.
///
/// The spinner is cleared before the human's turn so the input prompt is
/// not overdrawn.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    fn set_message(&self, message: String) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }

    /// Print a line without tearing the spinner
    fn println(&self, line: String) {
        match self.spinner.lock().ok().as_deref().and_then(Option::as_ref) {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationProgress for ProgressReporter {
    fn on_session_start(&self, participants: &ParticipantRegistry, max_rounds: u32) {
        eprintln!(
            "{} {} participants, up to {} rounds",
            "->".cyan(),
            participants.len(),
            max_rounds
        );
    }

    fn on_turn_start(&self, speaker: &Participant, round: u32, via_fallback: bool) {
        self.clear_spinner();
        if speaker.is_human() {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("[{}] {}", round, speaker.id));
        pb.set_message(if via_fallback {
            "thinking (fallback selection)...".to_string()
        } else {
            "thinking...".to_string()
        });
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_message(&self, message: &Message) {
        self.clear_spinner();
        eprintln!(
            "  {} {}: {}",
            "v".green(),
            message.sender().as_str().bold(),
            preview(message.text(), PREVIEW_CHARS).dimmed()
        );
    }

    fn on_session_end(&self, termination: &Termination) {
        self.clear_spinner();
        eprintln!(
            "{} {}",
            "Session finished:".green().bold(),
            termination.description()
        );
    }

    fn on_capability_call(&self, speaker: &ParticipantId, exchange: &CapabilityExchange) {
        let status = if exchange.rejected {
            format!("{} {} rejected", "x".red(), exchange.call.name)
        } else {
            format!("{} {}", "*".cyan(), exchange.call.name)
        };
        self.set_message(format!("{} ({})", status, speaker));
    }

    fn on_turn_retry(&self, speaker: &ParticipantId, attempt: u32, error: &TurnError) {
        self.println(format!(
            "  {} {} retry {}: {}",
            "!".yellow(),
            speaker,
            attempt,
            error
        ));
    }

    fn on_human_reprompt(&self, _speaker: &ParticipantId, _attempt: u32, reason: &str) {
        eprintln!("  {} {}, please reply again", "!".yellow(), reason);
    }

    fn on_session_failed(&self, error: &str) {
        self.clear_spinner();
        eprintln!("{} {}", "Session failed:".red().bold(), error);
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ConversationProgress for SimpleProgress {
    fn on_turn_start(&self, speaker: &Participant, round: u32, via_fallback: bool) {
        if speaker.is_human() {
            return;
        }
        let marker = if via_fallback { " (fallback)" } else { "" };
        eprintln!("{} [{}] {}{}", "->".cyan(), round, speaker.id, marker);
    }

    fn on_message(&self, message: &Message) {
        eprintln!("  {} {}", "v".green(), message.sender());
    }

    fn on_session_end(&self, termination: &Termination) {
        eprintln!("{}", termination.description());
    }
}
