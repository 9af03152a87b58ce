//! Interactive console input for the human participant.
//!
//! Shows the latest agent message and reads one line from stdin:
//!
//! ```text
//! ── FinancialAdvisor ──
//! What is your investment horizon?
//!
//! you> ten years, moderate risk
//! ```
//!
//! End of input (Ctrl+D) closes the session; an empty line is handed to the
//! driver, which asks again.

use async_trait::async_trait;
use colored::Colorize;
use finadvisor_application::{HumanInputError, HumanInputPort};
use finadvisor_domain::{ConversationLog, ParticipantId};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Human participant reading replies from the terminal
pub struct InteractiveHumanInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl InteractiveHumanInput {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    fn show_prompt(participant: &ParticipantId, log: &ConversationLog) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if let Some(last) = log.last()
            && last.sender() != participant
        {
            writeln!(stdout)?;
            writeln!(
                stdout,
                "{}",
                format!("── {} ──", last.sender()).yellow().bold()
            )?;
            writeln!(stdout, "{}", last.text())?;
        }
        writeln!(stdout)?;
        write!(stdout, "{} ", format!("{}>", participant).magenta().bold())?;
        stdout.flush()
    }
}

impl Default for InteractiveHumanInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HumanInputPort for InteractiveHumanInput {
    async fn request_reply(
        &self,
        participant: &ParticipantId,
        log: &ConversationLog,
    ) -> Result<String, HumanInputError> {
        Self::show_prompt(participant, log)
            .map_err(|e| HumanInputError::Io(format!("Failed to write prompt: {}", e)))?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Ok(line.trim().to_string()),
            Ok(None) => Err(HumanInputError::Closed),
            Err(e) => Err(HumanInputError::Io(format!("Failed to read input: {}", e))),
        }
    }
}
