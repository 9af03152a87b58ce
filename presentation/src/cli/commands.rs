//! CLI command definitions

use clap::{Parser, ValueEnum};
use finadvisor_domain::{FallbackPolicy, OutputFormat};
use std::path::PathBuf;

/// How the finished conversation is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Every message in order
    Transcript,
    /// Only the outcome and the final message
    Summary,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Transcript => OutputFormat::Transcript,
            OutputArg::Summary => OutputFormat::Summary,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// Speaker selection when no dispatch rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FallbackArg {
    /// Next participant in registration order
    RoundRobin,
    /// Let the model name the next speaker
    Auto,
}

impl From<FallbackArg> for FallbackPolicy {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::RoundRobin => FallbackPolicy::RoundRobin,
            FallbackArg::Auto => FallbackPolicy::ModelSelected,
        }
    }
}

/// CLI arguments for finadvisor
#[derive(Parser, Debug)]
#[command(name = "finadvisor")]
#[command(author, version, about = "Financial advisory conversation with a team of agents")]
#[command(long_about = r#"
finadvisor runs an advisory conversation between you and a team of agents:
a financial advisor, a portfolio manager, a risk analyst, a compliance officer
and a market-data agent. Who speaks next is decided by the protocol phrases
the agents use (CHECK NEEDED, PROPOSAL DONE, MARKET DATA NEEDED, ...).
Reply END at any time to finish the session.

Configuration files are loaded from (in priority order):
1. FINADVISOR_* environment variables (e.g. FINADVISOR_SESSION__MAX_ROUNDS=10)
2. --config <path>     Explicit config file
3. ./finadvisor.toml   Project-level config
4. ~/.config/finadvisor/config.toml   Global config

Example:
  finadvisor
  finadvisor "I want to rebalance towards bonds" --no-risk
  finadvisor --script replies.txt -o json
"#)]
pub struct Cli {
    /// Opening message of the conversation (defaults to a portfolio review)
    pub opening: Option<String>,

    /// Maximum number of messages in the session (opening included)
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Speaker selection when no dispatch rule applies
    #[arg(long, value_enum, value_name = "POLICY")]
    pub fallback: Option<FallbackArg>,

    /// Run without the risk analyst
    #[arg(long)]
    pub no_risk: bool,

    /// Read your replies from a file (one per line) instead of the terminal
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["finadvisor"]).unwrap();
        assert!(cli.opening.is_none());
        assert!(cli.max_rounds.is_none());
        assert!(!cli.no_risk);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_full_command_line() {
        let cli = Cli::try_parse_from([
            "finadvisor",
            "Plan my retirement",
            "--max-rounds",
            "12",
            "--fallback",
            "round-robin",
            "--no-risk",
            "-o",
            "summary",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.opening.as_deref(), Some("Plan my retirement"));
        assert_eq!(cli.max_rounds, Some(12));
        assert_eq!(
            cli.fallback.map(FallbackPolicy::from),
            Some(FallbackPolicy::RoundRobin)
        );
        assert!(cli.no_risk);
        assert_eq!(cli.output.map(OutputFormat::from), Some(OutputFormat::Summary));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_fallback() {
        assert!(Cli::try_parse_from(["finadvisor", "--fallback", "random"]).is_err());
    }
}
