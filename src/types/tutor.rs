//! Request and response records for the tutor endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The question to answer.
    pub question: String,
}

/// Body of `POST /chat`.
///
/// A single conversation turn. Nothing is remembered between turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The user's message.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// Mood tag attached to every answer for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Thinking,
    Explaining,
    Encouraging,
    Excited,
    Calm,
}

impl Emotion {
    /// All labels, in classifier priority order (`Calm` last).
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Thinking,
        Emotion::Explaining,
        Emotion::Encouraging,
        Emotion::Excited,
        Emotion::Calm,
    ];

    /// Lowercase wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Thinking => "thinking",
            Self::Explaining => "explaining",
            Self::Encouraging => "encouraging",
            Self::Excited => "excited",
            Self::Calm => "calm",
        }
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Self::Calm
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnswerResult
// ---------------------------------------------------------------------------

/// Answer returned by `/query` and `/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text (model output, or a canned message on failure).
    pub text: String,
    /// Mood tag derived from `text`.
    pub emotion: Emotion,
    /// 1 when the answer came from the model, 0 for a canned fallback.
    #[serde(default)]
    pub sources: u32,
}

impl AnswerResult {
    /// An answer produced by the model.
    pub fn answered(text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            emotion,
            sources: 1,
        }
    }

    /// A canned answer standing in for a failed completion.
    pub fn degraded(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emotion: Emotion::Calm,
            sources: 0,
        }
    }

    /// Whether this answer is a canned fallback.
    pub fn is_degraded(&self) -> bool {
        self.sources == 0
    }
}
