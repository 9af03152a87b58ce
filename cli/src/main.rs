//! CLI entrypoint for finadvisor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use finadvisor_application::{
    CapabilityRouter, FixedProfileLookup, HumanInputPort, RunConversationInput,
    RunConversationUseCase,
};
use finadvisor_domain::{FallbackPolicy, OutputFormat, Severity, build_roster};
use finadvisor_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalKnowledgeIndex, OpenAiSettings,
    OpenAiTextGenerator,
};
use finadvisor_presentation::{
    Cli, ConsoleFormatter, InteractiveHumanInput, ProgressReporter, SimpleProgress, load_script,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code for a session interrupted with Ctrl+C
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref());
    info!("Starting finadvisor");

    let warnings = match config.check() {
        Ok(issues) => issues,
        Err(e) => {
            for issue in config.validate().iter().filter(|i| i.is_error()) {
                eprintln!("{} {}", "error:".red().bold(), issue);
            }
            return Err(e).context("Invalid configuration");
        }
    };
    for issue in warnings
        .iter()
        .filter(|i| i.severity == Severity::Warning)
    {
        eprintln!("{} {}", "warning:".yellow().bold(), issue);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format: OutputFormat = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    let (params, _) = config.session.to_session_params();
    let (roster_options, _) = config.participants.to_roster_options();
    let participants = build_roster(&roster_options).context("Failed to build the roster")?;
    let opening = cli
        .opening
        .clone()
        .unwrap_or_else(|| config.session.opening().to_string());

    // === Dependency Injection ===
    let api_key = config.api_key()?;
    let settings = OpenAiSettings::from_config(&config.provider, api_key)
        .with_request_timeout(params.turn_timeout);
    let generator = Arc::new(OpenAiTextGenerator::new(settings)?);

    let knowledge = LocalKnowledgeIndex::load(&config.knowledge.documents_dir, config.knowledge.top_k)
        .context("Failed to load market documents")?;
    if knowledge.is_empty() {
        warn!(
            "No market documents found in {}",
            config.knowledge.documents_dir.display()
        );
    }
    let profile = FixedProfileLookup::new(config.profile.to_profile());
    let capabilities = CapabilityRouter::new(Arc::new(profile), Arc::new(knowledge));

    let human: Arc<dyn HumanInputPort> = match &cli.script {
        Some(path) => Arc::new(
            load_script(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?,
        ),
        None => Arc::new(InteractiveHumanInput::new()),
    };

    let cancellation = CancellationToken::new();
    spawn_interrupt_handler(cancellation.clone());

    let mut use_case = RunConversationUseCase::new(generator, human, capabilities)
        .with_cancellation(cancellation);
    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => use_case = use_case.with_logger(Arc::new(logger)),
            None => warn!("Conversation log disabled"),
        }
    }

    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|           finadvisor - Financial Advisory Team             |");
        println!("+============================================================+");
        println!();
        println!(
            "Participants: {}",
            participants
                .ids()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Reply END at any time to finish the session.");
        println!();
    }

    let input = RunConversationInput::new(participants, opening).with_params(params);

    // Spinner on a terminal, plain lines when stderr is redirected
    let result = if cli.quiet {
        use_case.execute(input).await
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await
    };

    match result {
        Ok(outcome) => {
            println!("{}", ConsoleFormatter::render(&outcome, format));
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("{}", ConsoleFormatter::format_failure(&failure));
            if failure.error.is_cancelled() {
                Ok(ExitCode::from(EXIT_INTERRUPTED))
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Command-line flags win over every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(max_rounds) = cli.max_rounds {
        config.session.max_rounds = max_rounds;
    }
    if let Some(fallback) = cli.fallback {
        config.session.fallback = FallbackPolicy::from(fallback).as_str().to_string();
    }
    if cli.no_risk {
        config.participants.include_risk = false;
    }
}

/// Install the tracing subscriber: stderr always, plus a daily file under
/// `log_dir` when configured. The returned guard flushes the file writer.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "finadvisor.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            eprintln!("{}", "Interrupted, stopping the session...".yellow());
            token.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::try_parse_from([
            "finadvisor",
            "--max-rounds",
            "6",
            "--fallback",
            "round-robin",
            "--no-risk",
        ])
        .unwrap();
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.session.max_rounds, 6);
        assert_eq!(config.session.parse_fallback().0, FallbackPolicy::RoundRobin);
        assert!(!config.participants.include_risk);
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let cli = Cli::try_parse_from(["finadvisor"]).unwrap();
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.session.max_rounds, 30);
        assert!(config.participants.include_risk);
    }

    #[test]
    fn test_too_small_cli_round_cap_fails_validation() {
        let cli = Cli::try_parse_from(["finadvisor", "--max-rounds", "1"]).unwrap();
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);
        assert!(config.check().is_err());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut config = FileConfig::default();
        config.provider.api_key = None;
        config.provider.api_key_env = "FINADVISOR_TEST_UNSET_KEY_VARIABLE".to_string();
        assert!(config.api_key().is_err());
    }
}
