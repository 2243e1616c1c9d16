//! Chat-completion backends.
//!
//! - [`base_llm`] - The [`BaseLLM`] trait and shared message types
//! - [`errors`] - Typed completion failures
//! - [`providers`] - Concrete providers (OpenRouter)

pub mod base_llm;
pub mod errors;
pub mod providers;

// Re-exports for convenience
pub use base_llm::{BaseLLM, BaseLLMState, LLMMessage, TokenUsage};
pub use errors::CompletionError;
