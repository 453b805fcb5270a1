//! LLM API client for OpenAI and Anthropic chat completions.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Connection settings for one model.
#[derive(Debug, Clone, Getters)]
pub struct LlmConfig {
    /// Provider to call.
    #[getter(copy)]
    provider: LlmProvider,
    /// API key; never logged.
    #[getter(skip)]
    api_key: String,
    /// Model name.
    model: String,
    /// Completion token cap.
    #[getter(copy)]
    max_tokens: u32,
    /// Sampling temperature.
    #[getter(copy)]
    temperature: f32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = %provider, model = %model))]
    pub fn new(
        provider: LlmProvider,
        api_key: String,
        model: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }
}

/// Anything that turns a system prompt and a user message into text.
#[async_trait::async_trait]
pub trait Completer: Send + Sync {
    /// Produces one completion.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError>;
}

/// Chat-completion client over either provider.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
    openai: OpenAIClient<OpenAIConfig>,
}

impl LlmClient {
    /// Creates a client; connections are pooled across calls.
    #[instrument(skip(config), fields(provider = %config.provider, model = %config.model))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        let openai =
            OpenAIClient::with_config(OpenAIConfig::new().with_api_key(config.api_key.clone()));
        Self {
            config,
            http: reqwest::Client::new(),
            openai,
        }
    }

    /// The client's settings.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    #[instrument(skip_all)]
    async fn complete_anthropic(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [{ "role": "user", "content": user_message }]
        });

        debug!("Sending request to Anthropic");
        let response = self
            .http
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::new(format!("Anthropic API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::new(format!("Failed to read Anthropic response: {}", e)))?;

        if !status.is_success() {
            error!(status = %status, response = %body, "Anthropic API error");
            return Err(LlmError::new(format!("Anthropic API error {}: {}", status, body)));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| LlmError::new(format!("Failed to parse Anthropic response: {}", e)))?;

        json["content"]
            .as_array()
            .and_then(|blocks| blocks.iter().find_map(|b| b["text"].as_str()))
            .map(str::to_string)
            .ok_or_else(|| LlmError::new("No text content in Anthropic response"))
    }

    #[instrument(skip_all)]
    async fn complete_openai(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| LlmError::new(format!("Failed to build system message: {}", e)))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| LlmError::new(format!("Failed to build user message: {}", e)))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.as_str())
            .messages(messages)
            .max_completion_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build request: {}", e)))?;

        debug!("Sending request to OpenAI");
        let response = self
            .openai
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::new(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::new("No content in OpenAI response"))
    }
}

#[async_trait::async_trait]
impl Completer for LlmClient {
    #[instrument(skip_all, fields(provider = %self.config.provider, model = %self.config.model))]
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        let content = match self.config.provider {
            LlmProvider::OpenAI => self.complete_openai(system_prompt, user_message).await?,
            LlmProvider::Anthropic => self.complete_anthropic(system_prompt, user_message).await?,
        };
        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
