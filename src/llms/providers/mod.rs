//! LLM provider implementations.
//!
//! Each provider implements [`BaseLLM`](crate::llms::base_llm::BaseLLM)
//! and owns authentication, request formatting and failure
//! classification for its upstream API.

pub mod openrouter;
