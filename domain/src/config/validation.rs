//! Structured configuration issues.
//!
//! Config adapters validate their raw values and report what they find as
//! [`ConfigIssue`]s. Errors stop the session before it starts; warnings are
//! printed and the session goes ahead.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the session cannot start.
    Error,
    /// Non-fatal: the session runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field does not name a known variant.
    InvalidEnumValue,
    /// `max_rounds` leaves no room for the advisor's first reply.
    RoundCapTooSmall,
    /// A timeout of zero would cancel every turn.
    ZeroTimeout,
    /// An instruction override is blank.
    EmptyInstructionOverride,
    /// An instruction override names a role outside the roster.
    UnknownRoleOverride,
    /// No API key source is configured.
    MissingCredentials,
    /// Compliance is disabled, so `CHECK NEEDED` can never be answered.
    ComplianceDisabled,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

/// Whether any issue in the list is fatal
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}
