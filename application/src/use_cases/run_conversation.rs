//! Run Conversation use case
//!
//! Drives one advisory session round by round:
//!
//! ```text
//! ┌─▶ termination? ──yes──▶ SessionOutcome
//! │        │ no
//! │   dispatcher ──Fallback──▶ fallback policy
//! │        │ Concrete               │
//! │        ▼◀───────────────────────┘
//! │   human? ──yes──▶ HumanInputPort (re-prompt on cancel / timeout)
//! │        │ no
//! │   TextGenerator ⇄ CapabilityRouter (retry on retryable failure)
//! │        │
//! └── append to log
//! ```
//!
//! Service failures never reach the log: a failed turn either succeeds on
//! retry or aborts the session with the log as it was.

use crate::config::SessionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::human_input::HumanInputPort;
use crate::ports::progress::{ConversationProgress, NoProgress};
use crate::ports::text_generator::{GenerationError, GenerationRequest, TextGenerator};
use crate::use_cases::capabilities::{CapabilityError, CapabilityRouter};
use crate::use_cases::shared::{Interrupted, guarded, is_cancelled, sleep_cancellable};
use finadvisor_domain::dispatch::{round_robin_after, select_next};
use finadvisor_domain::{
    CapabilityExchange, Conversation, ConversationLog, DispatchDecision, DomainError,
    FallbackPolicy, Message, Participant, ParticipantId, ParticipantRegistry, PromptTemplate,
    Termination,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a single agent turn failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Capability failed: {0}")]
    Capability(#[from] CapabilityError),

    #[error("No response within {0:?}")]
    TimedOut(Duration),

    #[error("Model returned an empty message")]
    EmptyReply,

    #[error("Model kept calling capabilities after the limit of {0}")]
    CapabilityLimit(u32),

    #[error("Turn cancelled")]
    Cancelled,
}

impl TurnError {
    /// Whether the turn may succeed when tried again
    pub fn is_retryable(&self) -> bool {
        match self {
            TurnError::Generation(e) => e.is_retryable(),
            TurnError::Capability(e) => e.is_retryable(),
            TurnError::TimedOut(_) | TurnError::EmptyReply => true,
            TurnError::CapabilityLimit(_) | TurnError::Cancelled => false,
        }
    }
}

/// Errors that end a session early
#[derive(Error, Debug)]
pub enum RunConversationError {
    /// The roster or round cap cannot start a session
    #[error("Invalid session setup: {0}")]
    Setup(#[source] DomainError),

    /// A defect: the dispatcher or log saw state that must not exist
    #[error("Dispatch invariant violated: {0}")]
    Dispatch(#[source] DomainError),

    /// Generation or capability service failure that outlived its retries
    #[error("Turn of {participant} failed after {attempts} attempt(s): {source}")]
    Service {
        participant: ParticipantId,
        attempts: u32,
        #[source]
        source: TurnError,
    },

    #[error("No message from {participant}: {reason}")]
    HumanUnavailable {
        participant: ParticipantId,
        reason: String,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunConversationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunConversationError::Cancelled)
    }

    pub fn is_service_failure(&self) -> bool {
        matches!(self, RunConversationError::Service { .. })
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, RunConversationError::Dispatch(_))
    }
}

/// A session that ended with an error.
///
/// The conversation is returned untouched (if it got as far as starting) so
/// the caller can inspect the log.
#[derive(Error, Debug)]
#[error("Session aborted")]
pub struct SessionFailure {
    #[source]
    pub error: RunConversationError,
    pub conversation: Option<Conversation>,
}

impl SessionFailure {
    fn new(error: RunConversationError, conversation: Option<Conversation>) -> Self {
        Self {
            error,
            conversation,
        }
    }

    pub fn log(&self) -> Option<&ConversationLog> {
        self.conversation.as_ref().map(|c| c.log())
    }
}

/// Counters collected while a session runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub fallback_decisions: u32,
    pub capability_calls: u32,
    pub turn_retries: u32,
    pub human_reprompts: u32,
}

/// A session that reached a terminal state
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub conversation: Conversation,
    pub termination: Termination,
    pub stats: SessionStats,
}

impl SessionOutcome {
    pub fn log(&self) -> &ConversationLog {
        self.conversation.log()
    }

    /// Final message of the session
    pub fn last_message(&self) -> Option<&Message> {
        self.conversation.log().last()
    }
}

/// Input for the RunConversation use case
#[derive(Debug, Clone)]
pub struct RunConversationInput {
    pub participants: ParticipantRegistry,
    /// Opening message, sent by the human participant
    pub opening: String,
    pub params: SessionParams,
}

impl RunConversationInput {
    pub fn new(participants: ParticipantRegistry, opening: impl Into<String>) -> Self {
        Self {
            participants,
            opening: opening.into(),
            params: SessionParams::default(),
        }
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }
}

/// Use case for running one advisory conversation
pub struct RunConversationUseCase<G: TextGenerator + 'static> {
    generator: Arc<G>,
    human: Arc<dyn HumanInputPort>,
    capabilities: CapabilityRouter,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: TextGenerator + 'static> RunConversationUseCase<G> {
    pub fn new(
        generator: Arc<G>,
        human: Arc<dyn HumanInputPort>,
        capabilities: CapabilityRouter,
    ) -> Self {
        Self {
            generator,
            human,
            capabilities,
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Set a structured conversation logger
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunConversationInput,
    ) -> Result<SessionOutcome, SessionFailure> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunConversationInput,
        progress: &dyn ConversationProgress,
    ) -> Result<SessionOutcome, SessionFailure> {
        let RunConversationInput {
            participants,
            opening,
            params,
        } = input;

        let mut conversation = Conversation::start(participants, params.max_rounds, opening)
            .map_err(|e| SessionFailure::new(RunConversationError::Setup(e), None))?;

        info!(
            "Starting conversation with {} participants (max {} rounds, fallback {})",
            conversation.participants().len(),
            params.max_rounds,
            params.fallback
        );
        self.logger.log(ConversationEvent::new(
            "session_started",
            json!({
                "participants": conversation
                    .participants()
                    .iter()
                    .map(|p| json!({ "id": p.id, "role": p.role }))
                    .collect::<Vec<_>>(),
                "max_rounds": params.max_rounds,
                "fallback": params.fallback,
            }),
        ));
        progress.on_session_start(conversation.participants(), params.max_rounds);
        if let Some(opening) = conversation.log().last() {
            self.log_message(opening);
            progress.on_message(opening);
        }

        let mut stats = SessionStats::default();
        match self
            .run_rounds(&mut conversation, &params, progress, &mut stats)
            .await
        {
            Ok(termination) => {
                info!("Conversation {}", termination.description());
                self.logger.log(ConversationEvent::new(
                    "session_ended",
                    json!({
                        "outcome": "terminated",
                        "termination": termination,
                        "rounds": conversation.round_count(),
                        "stats": stats,
                    }),
                ));
                progress.on_session_end(&termination);
                Ok(SessionOutcome {
                    conversation,
                    termination,
                    stats,
                })
            }
            Err(error) => {
                warn!("Conversation aborted: {}", error);
                self.logger.log(ConversationEvent::new(
                    "session_ended",
                    json!({
                        "outcome": "failed",
                        "error": error.to_string(),
                        "rounds": conversation.round_count(),
                        "stats": stats,
                    }),
                ));
                progress.on_session_failed(&error.to_string());
                Err(SessionFailure::new(error, Some(conversation)))
            }
        }
    }

    async fn run_rounds(
        &self,
        conversation: &mut Conversation,
        params: &SessionParams,
        progress: &dyn ConversationProgress,
        stats: &mut SessionStats,
    ) -> Result<Termination, RunConversationError> {
        loop {
            if let Some(termination) = conversation.termination() {
                return Ok(termination);
            }
            if is_cancelled(&self.cancellation_token) {
                return Err(RunConversationError::Cancelled);
            }

            let decision = select_next(conversation).map_err(RunConversationError::Dispatch)?;
            let speaker = match &decision {
                DispatchDecision::Concrete(id) => conversation
                    .participants()
                    .get(id.as_str())
                    .cloned()
                    .ok_or_else(|| {
                        RunConversationError::Dispatch(DomainError::UnknownSpeaker(id.to_string()))
                    })?,
                DispatchDecision::Fallback => {
                    stats.fallback_decisions += 1;
                    self.resolve_fallback(conversation, params).await?
                }
            };

            let round = conversation.round_count() + 1;
            debug!(
                "Round {}: {} speaks ({})",
                round,
                speaker.id,
                if decision.is_fallback() {
                    "fallback"
                } else {
                    "rule"
                }
            );
            self.logger.log(ConversationEvent::new(
                "dispatch",
                json!({
                    "round": round,
                    "last_speaker": conversation.last_speaker(),
                    "decision": decision,
                    "speaker": speaker.id,
                    "fallback_policy": decision.is_fallback().then_some(params.fallback),
                }),
            ));
            progress.on_turn_start(&speaker, round, decision.is_fallback());

            let text = if speaker.is_human() {
                self.human_turn(&speaker, conversation, params, progress, stats)
                    .await?
            } else {
                self.agent_turn(&speaker, conversation, params, progress, stats)
                    .await?
            };

            let message = conversation
                .append(&speaker.id, text)
                .map_err(RunConversationError::Dispatch)?;
            self.log_message(message);
            progress.on_message(message);
        }
    }

    /// Resolve a `Fallback` decision with the configured policy
    async fn resolve_fallback(
        &self,
        conversation: &Conversation,
        params: &SessionParams,
    ) -> Result<Participant, RunConversationError> {
        if params.fallback == FallbackPolicy::ModelSelected
            && let Some(chosen) = self.select_by_model(conversation, params).await?
        {
            return Ok(chosen.clone());
        }

        let last = conversation.last_speaker().map(|id| id.as_str());
        round_robin_after(last, conversation.participants())
            .cloned()
            .ok_or_else(|| {
                RunConversationError::Dispatch(DomainError::InvalidParticipant(
                    "empty roster".to_string(),
                ))
            })
    }

    /// Ask the model to name the next speaker. `None` means use round-robin.
    async fn select_by_model<'a>(
        &self,
        conversation: &'a Conversation,
        params: &SessionParams,
    ) -> Result<Option<&'a Participant>, RunConversationError> {
        let prompt =
            PromptTemplate::selection_prompt(conversation.participants(), conversation.messages());
        let reply = guarded(
            self.generator
                .complete(PromptTemplate::selection_system(), &prompt),
            params.turn_timeout,
            &self.cancellation_token,
        )
        .await;

        match reply {
            Err(Interrupted::Cancelled) => Err(RunConversationError::Cancelled),
            Err(Interrupted::TimedOut(limit)) => {
                warn!(
                    "Speaker selection timed out after {:?}; using round-robin",
                    limit
                );
                Ok(None)
            }
            Ok(Err(e)) => {
                warn!("Speaker selection failed: {}; using round-robin", e);
                Ok(None)
            }
            Ok(Ok(reply)) => {
                let chosen = conversation.participants().find_mentioned(&reply);
                if chosen.is_none() {
                    warn!(
                        "Speaker selection named nobody ({:?}); using round-robin",
                        reply
                    );
                }
                Ok(chosen)
            }
        }
    }

    /// Run an agent turn, retrying retryable failures with backoff
    async fn agent_turn(
        &self,
        speaker: &Participant,
        conversation: &Conversation,
        params: &SessionParams,
        progress: &dyn ConversationProgress,
        stats: &mut SessionStats,
    ) -> Result<String, RunConversationError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self
                .generate_turn(speaker, conversation, params, progress, stats)
                .await
            {
                Ok(text) => return Ok(text),
                Err(TurnError::Cancelled) => return Err(RunConversationError::Cancelled),
                Err(error) if error.is_retryable() && attempt <= params.max_turn_retries => {
                    warn!(
                        "Turn of {} failed (attempt {}): {}; retrying",
                        speaker.id, attempt, error
                    );
                    stats.turn_retries += 1;
                    self.logger.log(ConversationEvent::new(
                        "turn_retry",
                        json!({
                            "participant": speaker.id,
                            "attempt": attempt,
                            "error": error.to_string(),
                        }),
                    ));
                    progress.on_turn_retry(&speaker.id, attempt, &error);
                    sleep_cancellable(params.backoff_for(attempt), &self.cancellation_token)
                        .await
                        .map_err(|_| RunConversationError::Cancelled)?;
                }
                Err(error) => {
                    return Err(RunConversationError::Service {
                        participant: speaker.id.clone(),
                        attempts: attempt,
                        source: error,
                    });
                }
            }
        }
    }

    /// One attempt at an agent turn, including its capability calls
    async fn generate_turn(
        &self,
        speaker: &Participant,
        conversation: &Conversation,
        params: &SessionParams,
        progress: &dyn ConversationProgress,
        stats: &mut SessionStats,
    ) -> Result<String, TurnError> {
        let mut request = GenerationRequest::for_turn(speaker, conversation);
        let mut calls_made = 0u32;

        loop {
            let generation = match guarded(
                self.generator.generate(&request),
                params.turn_timeout,
                &self.cancellation_token,
            )
            .await
            {
                Ok(result) => result?,
                Err(Interrupted::Cancelled) => return Err(TurnError::Cancelled),
                Err(Interrupted::TimedOut(limit)) => return Err(TurnError::TimedOut(limit)),
            };

            if generation.is_final() || request.capabilities.is_empty() {
                let text = generation.text.trim();
                return match (text.is_empty(), generation.is_final()) {
                    (false, _) => Ok(text.to_string()),
                    (true, true) => Err(TurnError::EmptyReply),
                    (true, false) => Err(TurnError::CapabilityLimit(params.max_capability_calls)),
                };
            }

            for call in generation.calls {
                let exchange = if calls_made >= params.max_capability_calls {
                    CapabilityExchange::rejected(
                        call,
                        "Capability call limit reached for this turn. Answer with the information you have.",
                    )
                } else {
                    calls_made += 1;
                    stats.capability_calls += 1;
                    match guarded(
                        self.capabilities.execute(speaker, call),
                        params.turn_timeout,
                        &self.cancellation_token,
                    )
                    .await
                    {
                        Ok(result) => result?,
                        Err(Interrupted::Cancelled) => return Err(TurnError::Cancelled),
                        Err(Interrupted::TimedOut(limit)) => {
                            return Err(TurnError::TimedOut(limit));
                        }
                    }
                };

                self.logger.log(ConversationEvent::new(
                    "capability_call",
                    json!({
                        "participant": speaker.id,
                        "capability": exchange.call.name,
                        "argument": exchange.call.argument,
                        "rejected": exchange.rejected,
                        "output": exchange.output,
                    }),
                ));
                progress.on_capability_call(&speaker.id, &exchange);
                request.exchanges.push(exchange);
            }

            if calls_made >= params.max_capability_calls {
                request = request.without_capabilities();
            }
        }
    }

    /// Collect the human's message, re-prompting when none is produced
    async fn human_turn(
        &self,
        speaker: &Participant,
        conversation: &Conversation,
        params: &SessionParams,
        progress: &dyn ConversationProgress,
        stats: &mut SessionStats,
    ) -> Result<String, RunConversationError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let reply = guarded(
                self.human.request_reply(&speaker.id, conversation.log()),
                params.human_timeout,
                &self.cancellation_token,
            )
            .await;

            let reason = match reply {
                Err(Interrupted::Cancelled) => return Err(RunConversationError::Cancelled),
                Err(Interrupted::TimedOut(limit)) => format!("no reply within {:?}", limit),
                Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
                Ok(Ok(_)) => "empty reply".to_string(),
                Ok(Err(e)) if e.can_reprompt() => e.to_string(),
                Ok(Err(e)) => {
                    return Err(RunConversationError::HumanUnavailable {
                        participant: speaker.id.clone(),
                        reason: e.to_string(),
                    });
                }
            };

            if attempt > params.max_human_reprompts {
                return Err(RunConversationError::HumanUnavailable {
                    participant: speaker.id.clone(),
                    reason: format!("{} after {} prompt(s)", reason, attempt),
                });
            }
            info!("Re-prompting {}: {}", speaker.id, reason);
            stats.human_reprompts += 1;
            progress.on_human_reprompt(&speaker.id, attempt, &reason);
        }
    }

    fn log_message(&self, message: &Message) {
        self.logger.log(ConversationEvent::new(
            "message_appended",
            json!({
                "ordinal": message.ordinal(),
                "sender": message.sender(),
                "text": message.text(),
            }),
        ));
    }
}
