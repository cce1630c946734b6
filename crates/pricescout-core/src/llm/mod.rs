//! LLM integration over an OpenAI-compatible chat-completions endpoint.
//!
//! The pipeline only sees the [`LlmProvider`] trait, so tests can swap in a
//! scripted provider without a network.

pub(crate) mod openai;
pub(crate) mod provider;

pub use openai::OpenAiProvider;
pub use provider::{
    resolve_api_key, resolve_env_var, ImageInput, LlmProvider, LlmProviderFactory, LlmRequest,
    LlmResponse,
};
