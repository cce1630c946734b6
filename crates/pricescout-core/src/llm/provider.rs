//! LLM provider trait and request/response types.
//!
//! Defines the interface the pipeline talks to, plus the factory that builds
//! the configured provider from the `[api]` config section.

use crate::config::{ApiConfig, Config};
use crate::error::{LlmError, PipelineError};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A single chat-completions call.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Model identifier
    pub model: String,
    /// Optional system instruction
    pub system: Option<String>,
    /// User message text
    pub prompt: String,
    /// Optional image sent ahead of the user text
    pub image: Option<ImageInput>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// A user message carrying an image and a text instruction.
    pub fn vision(model: &str, image: ImageInput, prompt: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            system: None,
            prompt: prompt.into(),
            image: Some(image),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    /// A system instruction followed by a plain user message.
    pub fn text(model: &str, system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            system: Some(system.into()),
            prompt: prompt.into(),
            image: None,
            max_tokens: 2048,
            temperature: 0.3,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The response from a chat-completions call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// `choices[0].message.content`, trimmed
    pub text: String,
    /// Model identifier reported by the endpoint
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Send one request and return the model's text.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve the API key from config, or report which variable to set.
pub fn resolve_api_key(api: &ApiConfig) -> Result<String, PipelineError> {
    resolve_env_var(&api.api_key).ok_or_else(|| PipelineError::MissingCredential {
        env_var: api.key_env_var().to_string(),
    })
}

/// Factory that creates the configured provider.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the chat-completions provider from config.
    ///
    /// Fails with `MissingCredential` when no API key can be resolved.
    pub fn create(config: &Config) -> Result<Box<dyn LlmProvider>, PipelineError> {
        let api_key = resolve_api_key(&config.api)?;
        Ok(Box::new(super::openai::OpenAiProvider::new(
            &config.api.endpoint,
            &api_key,
            Duration::from_millis(config.limits.llm_timeout_ms),
        )))
    }
}
