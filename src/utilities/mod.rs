//! Utility modules: configuration, prompt composition, emotion tagging.

pub mod config;
pub mod emotion;
pub mod prompts;
