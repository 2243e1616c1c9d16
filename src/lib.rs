//! # AI Tutor
//!
//! An HTTP tutoring service. Questions are combined with a fixed
//! knowledge text, answered by an OpenRouter chat model (with a fallback
//! model), and tagged with a display emotion.

pub mod gateway;
pub mod knowledge;
pub mod llms;
pub mod server;
pub mod types;
pub mod utilities;

pub use gateway::CompletionGateway;
pub use knowledge::Knowledge;
pub use llms::base_llm::BaseLLM;
pub use types::{AnswerResult, ChatMessage, Emotion, Query};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
