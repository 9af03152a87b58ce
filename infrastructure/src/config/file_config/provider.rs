//! Provider configuration from TOML (`[provider]` section)

use finadvisor_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible text generation provider.
///
/// ```toml
/// [provider]
/// api_key_env = "OPENAI_API_KEY"
/// base_url = "https://api.openai.com/v1"
/// model = "gpt-4o-mini"
/// temperature = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL up to and including the version segment.
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl FileProviderConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.api_key.is_none() && self.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingCredentials,
                "provider: set api_key_env or api_key",
            ));
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue,
                "provider.model: model name cannot be empty",
            ));
        }
        issues
    }

    /// Resolve the API key: the inline key wins, then the named variable.
    ///
    /// `lookup` reads an environment variable; passing it in keeps this
    /// testable.
    pub fn resolve_api_key(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| lookup(&self.api_key_env))
            .filter(|key| !key.trim().is_empty())
    }
}
