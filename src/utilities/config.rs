//! Environment-driven service configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file by the server binary. The API key has no default: a
//! missing key is a startup error.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::llms::providers::openrouter::OPENROUTER_BASE_URL;

/// Primary model id, tried first.
pub const DEFAULT_PRIMARY_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";
/// Secondary model id, tried once when the primary fails.
pub const DEFAULT_SECONDARY_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_REFERER: &str = "http://localhost:3000";
pub const DEFAULT_APP_TITLE: &str = "AI Tutor";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is present but cannot be parsed.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the tutor service.
#[derive(Clone)]
pub struct TutorConfig {
    /// Bearer token for the completion API.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    pub primary_model: String,
    pub secondary_model: String,
    /// `HTTP-Referer` attribution header.
    pub referer: String,
    /// `X-Title` attribution header.
    pub app_title: String,
    /// Per-request timeout; `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
    /// File replacing the built-in knowledge text.
    pub knowledge_file: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

// Hand-written so the key never lands in logs.
impl std::fmt::Debug for TutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("primary_model", &self.primary_model)
            .field("secondary_model", &self.secondary_model)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("timeout", &self.timeout)
            .field("knowledge_file", &self.knowledge_file)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl TutorConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable
    /// name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout = match get("TUTOR_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<f64>().map_err(|e| ConfigError::Invalid {
                    key: "TUTOR_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(ConfigError::Invalid {
                        key: "TUTOR_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be a positive number of seconds".to_string(),
                    });
                }
                Some(Duration::from_secs_f64(secs))
            }
            None => None,
        };

        Ok(Self {
            api_key,
            base_url: get_or("TUTOR_BASE_URL", OPENROUTER_BASE_URL),
            primary_model: get_or("TUTOR_PRIMARY_MODEL", DEFAULT_PRIMARY_MODEL),
            secondary_model: get_or("TUTOR_SECONDARY_MODEL", DEFAULT_SECONDARY_MODEL),
            referer: get_or("TUTOR_REFERER", DEFAULT_REFERER),
            app_title: get_or("TUTOR_APP_TITLE", DEFAULT_APP_TITLE),
            timeout,
            knowledge_file: get("TUTOR_KNOWLEDGE_FILE").map(PathBuf::from),
            host: get_or("HOST", DEFAULT_HOST),
            port,
        })
    }

    /// Host and port the server listens on. The host may be a name such
    /// as `localhost`; it is resolved when binding.
    pub fn listen_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    /// HTTP client shared by both model providers.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
