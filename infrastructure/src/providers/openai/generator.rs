//! OpenAI-compatible text generator
//!
//! Implements [`TextGenerator`] over the Chat Completions endpoint of any
//! OpenAI-compatible server (OpenAI, Azure OpenAI, vLLM, Ollama, ...).

use super::types::{
    ChatRequest, ChatResponse, build_chat_request, build_completion_request, map_http_error,
    parse_chat_response,
};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use finadvisor_application::ports::text_generator::{
    Generation, GenerationError, GenerationRequest, TextGenerator,
};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the generator
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    /// Base URL up to and including the version segment
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Transport-level limit; the conversation driver applies its own turn
    /// timeout on top
    pub request_timeout: Option<Duration>,
}

impl OpenAiSettings {
    pub fn from_config(config: &FileProviderConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Text generator talking to an OpenAI-compatible HTTP API
pub struct OpenAiTextGenerator {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiTextGenerator {
    pub fn new(settings: OpenAiSettings) -> Result<Self, GenerationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenerationError::Other(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    async fn send(&self, body: &ChatRequest) -> Result<Generation, GenerationError> {
        debug!(
            model = %self.settings.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.settings.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status.as_u16(), &body_text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        parse_chat_response(parsed)
    }
}

fn map_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else if err.is_connect() || err.is_request() {
        GenerationError::Connection(err.to_string())
    } else {
        GenerationError::Other(err.to_string())
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        let body = build_chat_request(
            request,
            &self.settings.model,
            self.settings.temperature,
            self.settings.max_tokens,
        );
        self.send(&body).await
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = build_completion_request(
            system_prompt,
            prompt,
            &self.settings.model,
            self.settings.temperature,
            self.settings.max_tokens,
        );
        Ok(self.send(&body).await?.text)
    }
}
