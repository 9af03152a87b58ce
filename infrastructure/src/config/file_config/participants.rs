//! Participant configuration from TOML (`[participants]` section)

use finadvisor_domain::{ConfigIssue, ConfigIssueCode, Role, RosterOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which reviewers sit at the table, and instruction overrides per role.
///
/// ```toml
/// [participants]
/// include_risk = false
///
/// [participants.instructions]
/// compliance = "Check every recommendation against SFC suitability rules."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantsConfig {
    pub include_risk: bool,
    pub include_compliance: bool,
    /// Role name → replacement instructions
    pub instructions: BTreeMap<String, String>,
}

impl Default for FileParticipantsConfig {
    fn default() -> Self {
        Self {
            include_risk: true,
            include_compliance: true,
            instructions: BTreeMap::new(),
        }
    }
}

impl FileParticipantsConfig {
    /// Convert to [`RosterOptions`], returning validation issues.
    ///
    /// Overrides that cannot be applied are dropped.
    pub fn to_roster_options(&self) -> (RosterOptions, Vec<ConfigIssue>) {
        let mut options = RosterOptions {
            include_risk: self.include_risk,
            include_compliance: self.include_compliance,
            ..Default::default()
        };
        let mut issues = Vec::new();

        if !self.include_compliance {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ComplianceDisabled,
                "participants.include_compliance is false: CHECK NEEDED will go to the fallback policy",
            ));
        }

        for (key, text) in &self.instructions {
            let role = match key.parse::<Role>() {
                Ok(role) if !role.is_human() && role != Role::Other => role,
                _ => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownRoleOverride,
                        format!(
                            "participants.instructions.{}: not an agent role (expected advisor, portfolio, market_data, risk or compliance)",
                            key
                        ),
                    ));
                    continue;
                }
            };
            if text.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyInstructionOverride,
                    format!("participants.instructions.{}: instructions cannot be empty", key),
                ));
                continue;
            }
            if (role == Role::Risk && !self.include_risk)
                || (role == Role::Compliance && !self.include_compliance)
            {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownRoleOverride,
                    format!(
                        "participants.instructions.{}: role is not on the roster, override ignored",
                        key
                    ),
                ));
                continue;
            }
            options = options.with_instructions(role, text.clone());
        }

        (options, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_instructions(pairs: &[(&str, &str)]) -> FileParticipantsConfig {
        FileParticipantsConfig {
            instructions: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_has_full_roster() {
        let (options, issues) = FileParticipantsConfig::default().to_roster_options();
        assert!(options.include_risk);
        assert!(options.include_compliance);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_override_applied() {
        let config = with_instructions(&[("risk", "Be cautious.")]);
        let (options, issues) = config.to_roster_options();
        assert!(issues.is_empty());
        assert_eq!(options.instruction_overrides[&Role::Risk], "Be cautious.");
    }

    #[test]
    fn test_bad_overrides_reported() {
        let config = with_instructions(&[("janitor", "Sweep."), ("advisor", " "), ("user", "Hi")]);
        let (options, issues) = config.to_roster_options();
        assert!(options.instruction_overrides.is_empty());
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(ConfigIssue::is_error));
        assert!(
            issues
                .iter()
                .any(|i| i.code == ConfigIssueCode::EmptyInstructionOverride)
        );
    }

    #[test]
    fn test_override_for_absent_role_is_ignored() {
        let mut config = with_instructions(&[("risk", "Be cautious.")]);
        config.include_risk = false;
        let (options, issues) = config.to_roster_options();
        assert!(options.instruction_overrides.is_empty());
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_compliance_disabled_warns() {
        let config = FileParticipantsConfig {
            include_compliance: false,
            ..Default::default()
        };
        let (_, issues) = config.to_roster_options();
        assert_eq!(issues[0].code, ConfigIssueCode::ComplianceDisabled);
    }
}
