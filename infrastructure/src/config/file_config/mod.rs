//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain / application
//! types with the issues found along the way.

mod knowledge;
mod logging;
mod output;
mod participants;
mod profile;
mod provider;
mod session;

pub use knowledge::FileKnowledgeConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use participants::FileParticipantsConfig;
pub use profile::FileProfileConfig;
pub use provider::FileProviderConfig;
pub use session::FileSessionConfig;

use finadvisor_domain::{ConfigIssue, config::has_errors};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration that cannot start a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{count} configuration error(s), first: {first}")]
    Invalid { count: usize, first: String },

    #[error("API key not found: set the {env} environment variable or provider.api_key")]
    MissingApiKey { env: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round loop, retries and fallback policy
    pub session: FileSessionConfig,
    /// Text generation provider
    pub provider: FileProviderConfig,
    /// Market-document library
    pub knowledge: FileKnowledgeConfig,
    /// Record served by the profile lookup
    pub profile: FileProfileConfig,
    /// Roster variant and instruction overrides
    pub participants: FileParticipantsConfig,
    /// Transcript and diagnostic log files
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Session limits and the fallback policy name
    /// 2. Roster switches and instruction overrides
    /// 3. Provider credentials source and model name
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.session.to_session_params().1);
        issues.extend(self.participants.to_roster_options().1);
        issues.extend(self.provider.validate());
        issues
    }

    /// Validate and fail on the first `Severity::Error`; warnings are
    /// returned for display.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let issues = self.validate();
        if has_errors(&issues) {
            let errors: Vec<&ConfigIssue> = issues.iter().filter(|i| i.is_error()).collect();
            return Err(ConfigValidationError::Invalid {
                count: errors.len(),
                first: errors
                    .first()
                    .map(|i| i.message.clone())
                    .unwrap_or_default(),
            });
        }
        Ok(issues)
    }

    /// Resolve the provider API key from the config or the process
    /// environment.
    pub fn api_key(&self) -> Result<String, ConfigValidationError> {
        self.provider
            .resolve_api_key(|name| std::env::var(name).ok())
            .ok_or_else(|| ConfigValidationError::MissingApiKey {
                env: self.provider.api_key_env.clone(),
            })
    }
}
