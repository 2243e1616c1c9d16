//! Base chat-completion abstraction.
//!
//! Provides the [`BaseLLM`] trait every completion backend implements,
//! the message type sent to it, and the shared per-model state that
//! concrete providers embed.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llms::errors::CompletionError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sampling temperature used for tutor answers.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Upper bound on answer length, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single `{role, content}` message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Token accounting reported by the upstream `usage` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Generate a unique id used to correlate the log lines of one call.
pub fn generate_call_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// BaseLLM trait
// ---------------------------------------------------------------------------

/// A chat-completion backend bound to one model identifier.
///
/// Implementations send the messages upstream and return the answer text,
/// mapping every failure onto a [`CompletionError`].
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Model identifier sent upstream.
    fn model(&self) -> &str;

    /// Provider name, for logging.
    fn provider(&self) -> &str {
        "openai"
    }

    /// Request a completion for `messages` and return the answer text.
    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, CompletionError>;
}

// ---------------------------------------------------------------------------
// BaseLLMState
// ---------------------------------------------------------------------------

/// Per-model settings shared by provider implementations.
#[derive(Clone)]
pub struct BaseLLMState {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum answer length in tokens.
    pub max_tokens: Option<u32>,
    /// API key; redacted in `Debug` output.
    pub api_key: Option<String>,
    /// Base URL of the upstream API.
    pub base_url: Option<String>,
    /// Provider name.
    pub provider: String,
}

impl fmt::Debug for BaseLLMState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLLMState")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("provider", &self.provider)
            .finish()
    }
}

impl BaseLLMState {
    /// Create a new `BaseLLMState` with the tutor's sampling defaults.
    ///
    /// # Panics
    ///
    /// Panics if `model` is empty.
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        assert!(!model.is_empty(), "Model name is required and cannot be empty");

        Self {
            model,
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            api_key: None,
            base_url: None,
            provider: "openai".to_string(),
        }
    }
}
