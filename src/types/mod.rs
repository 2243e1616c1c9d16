//! Type definitions for the tutor API.

pub mod tutor;

pub use tutor::{AnswerResult, ChatMessage, Emotion, Query};
