//! Knowledge text spliced into every tutor prompt.
//!
//! There is no retrieval: the whole text goes into each prompt. The
//! built-in text can be replaced at startup from a file.

use std::path::Path;

use anyhow::Context;

/// Built-in knowledge text.
pub const DEFAULT_KNOWLEDGE: &str = "Artificial Intelligence (AI) is a branch of computer science that aims to create systems capable of performing tasks that typically require human intelligence. These tasks include learning, reasoning, problem-solving, perception, and language understanding.

Machine Learning is a subset of AI that enables computers to learn and improve from experience without being explicitly programmed. It uses algorithms to analyze data, identify patterns, and make predictions or decisions.

Deep Learning uses neural networks with multiple layers to model and understand complex patterns. It's particularly effective for image recognition, natural language processing, and speech recognition.

Natural Language Processing (NLP) enables computers to understand, interpret, and generate human language. Applications include chatbots, translation services, and sentiment analysis.

Retrieval-Augmented Generation (RAG) combines retrieval-based systems and generative models. It first retrieves relevant information from a knowledge base, then generates responses based on that information, ensuring more accurate answers.
";

/// Immutable knowledge text shared by all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knowledge {
    content: String,
}

impl Knowledge {
    /// Wrap arbitrary text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The built-in AI/ML primer.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_KNOWLEDGE)
    }

    /// Load the knowledge text from a UTF-8 file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file {}", path.display()))?;
        if content.trim().is_empty() {
            anyhow::bail!("Knowledge file {} is empty", path.display());
        }
        tracing::info!(path = %path.display(), bytes = content.len(), "Loaded knowledge file");
        Ok(Self::new(content))
    }

    /// Load from `path` when given, otherwise use the built-in text.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Default for Knowledge {
    fn default() -> Self {
        Self::builtin()
    }
}
