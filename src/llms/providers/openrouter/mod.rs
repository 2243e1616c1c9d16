//! OpenRouter chat-completion provider.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint over
//! `reqwest`, defaulting to OpenRouter. Sends the OpenRouter attribution
//! headers (`HTTP-Referer`, `X-Title`) and maps failed responses onto
//! [`CompletionError`] variants.
//!
//! The provider makes exactly one request per call. Fallback between
//! models lives in [`crate::gateway`].

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::llms::base_llm::{BaseLLM, BaseLLMState, LLMMessage, TokenUsage};
use crate::llms::errors::{mentions_data_policy, CompletionError};

/// Default OpenRouter API base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Longest slice of an upstream body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// OpenRouterCompletion provider
// ---------------------------------------------------------------------------

/// Completion provider bound to one model id.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference
/// counted, so the primary and secondary providers share one pool.
///
/// # Example
///
/// ```ignore
/// let provider = OpenRouterCompletion::new("deepseek/deepseek-chat", api_key, None)
///     .with_attribution("http://localhost:3000", "AI Tutor");
/// let answer = provider.acall(messages).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenRouterCompletion {
    /// Model id, sampling parameters, key and base URL.
    pub state: BaseLLMState,
    /// Extra headers sent with every request.
    pub default_headers: HashMap<String, String>,
    client: reqwest::Client,
}

impl OpenRouterCompletion {
    /// Create a provider for `model`.
    ///
    /// # Arguments
    ///
    /// * `model` - Model id, e.g. `deepseek/deepseek-chat`.
    /// * `api_key` - Bearer token for the upstream API.
    /// * `base_url` - Optional base URL; defaults to [`OPENROUTER_BASE_URL`].
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        let mut state = BaseLLMState::new(model);
        state.api_key = Some(api_key.into());
        state.base_url = base_url;
        state.provider = "openrouter".to_string();

        Self {
            state,
            default_headers: HashMap::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (shared pool, timeout).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set the `HTTP-Referer` and `X-Title` attribution headers.
    pub fn with_attribution(
        mut self,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.default_headers
            .insert("HTTP-Referer".to_string(), referer.into());
        self.default_headers.insert("X-Title".to_string(), title.into());
        self
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> String {
        self.state
            .base_url
            .clone()
            .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base_url().trim_end_matches('/'))
    }

    /// Build the request body for the Chat Completions API.
    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let mut body = serde_json::json!({
            "model": self.state.model,
            "messages": messages,
        });

        if let Some(max_tokens) = self.state.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = self.state.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    /// Extract the answer text from a Chat Completions response.
    fn parse_completions_response(&self, response: &Value) -> Result<String, CompletionError> {
        // OpenRouter can report failures inside a 200 body.
        if response.get("choices").is_none() {
            if let Some(error) = response.get("error") {
                return Err(classify_error_payload(error));
            }
        }

        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| {
                CompletionError::InvalidResponse("No choices in completion response".into())
            })?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("No message content in completion choice".into())
            })?;

        if let Some(usage) = response.get("usage") {
            let usage: TokenUsage = serde_json::from_value(usage.clone()).unwrap_or_default();
            tracing::debug!(
                model = %self.state.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion token usage"
            );
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl BaseLLM for OpenRouterCompletion {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        &self.state.provider
    }

    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, CompletionError> {
        tracing::debug!(
            model = %self.state.model,
            messages = messages.len(),
            "OpenRouterCompletion.acall"
        );

        let api_key = self
            .state
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::Unauthorized("API key not set".into()))?;

        let body = self.build_request_body(&messages);

        let mut request = self.client.post(self.endpoint()).bearer_auth(api_key);
        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }

        let response = request.json(&body).send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &response_text));
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            CompletionError::InvalidResponse(format!(
                "Failed to parse completion response: {} - Body: {}",
                e,
                truncate(&response_text)
            ))
        })?;

        self.parse_completions_response(&response_json)
    }
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Map a non-success HTTP response onto a [`CompletionError`].
///
/// Data-policy rejections win over the status code: OpenRouter reports
/// them as 404 or 403 depending on the route.
pub fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let message = format!("Error code: {} - {}", status.as_u16(), upstream_message(body));

    if mentions_data_policy(body) {
        CompletionError::PolicyRejected(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        CompletionError::RateLimited(message)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        CompletionError::Unauthorized(message)
    } else if status.is_server_error() {
        CompletionError::Upstream(message)
    } else {
        CompletionError::Unknown(message)
    }
}

/// Classify an `{"error": {...}}` object found in a 200 response.
fn classify_error_payload(error: &Value) -> CompletionError {
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    let code = error
        .get("code")
        .and_then(|c| c.as_u64())
        .and_then(|c| u16::try_from(c).ok())
        .and_then(|c| StatusCode::from_u16(c).ok());

    match code {
        Some(status) => {
            classify_failure(status, &serde_json::json!({ "error": error }).to_string())
        }
        None if mentions_data_policy(&message) => CompletionError::PolicyRejected(message),
        None => CompletionError::Unknown(message),
    }
}

/// The human-readable part of an upstream error body.
///
/// Prefers `error.message` from a JSON body, then the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate(body))
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
