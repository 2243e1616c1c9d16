//! Typed failures from a chat-completion call.
//!
//! Providers classify upstream failures here, from status codes and
//! response bodies, so callers never inspect error wording themselves.

use thiserror::Error;

/// Why a completion request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The upstream throttled the request (HTTP 429).
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The upstream refused the request because of the account's
    /// privacy or data-policy settings.
    #[error("{0}")]
    PolicyRejected(String),

    /// The API key was rejected (HTTP 401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The request never produced an HTTP response (connect, timeout,
    /// body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream failed on its side (HTTP 5xx).
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The response could not be decoded or had no answer text.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other failure.
    #[error("{0}")]
    Unknown(String),
}

impl CompletionError {
    /// Stable snake_case code for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited(_) => "rate_limited",
            Self::PolicyRejected(_) => "policy_rejected",
            Self::Unauthorized(_) => "unauthorized",
            Self::Network(_) => "network_failure",
            Self::Upstream(_) => "upstream_failure",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Unknown(_) => "unknown",
        }
    }

    /// The upstream or transport message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::RateLimited(message)
            | Self::PolicyRejected(message)
            | Self::Unauthorized(message)
            | Self::Network(message)
            | Self::Upstream(message)
            | Self::InvalidResponse(message)
            | Self::Unknown(message) => message,
        }
    }

    /// Whether the failure asks the user to change their upstream
    /// privacy or data-policy settings.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(self, Self::PolicyRejected(_))
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Whether an upstream error body talks about privacy or data-policy
/// settings.
pub fn mentions_data_policy(body: &str) -> bool {
    let lowered = body.to_lowercase();
    lowered.contains("privacy") || lowered.contains("data policy")
}
