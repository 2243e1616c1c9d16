//! Prompt composition for tutor questions.

use crate::llms::base_llm::LLMMessage;

/// System instruction sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful AI tutor.";

/// Build the user prompt that embeds the knowledge text and the question.
///
/// Pure formatting: the question is inserted verbatim, without validation
/// or truncation.
pub fn compose_prompt(knowledge: &str, question: &str) -> String {
    format!(
        "You are a helpful AI tutor. Answer questions based on this knowledge base:\n\n\
         {knowledge}\n\n\
         Question: {question}\n\n\
         Provide a clear, educational answer:"
    )
}

/// The message list for one completion: the fixed system instruction
/// followed by the composed prompt.
pub fn tutor_messages(prompt: &str) -> Vec<LLMMessage> {
    vec![
        LLMMessage::system(SYSTEM_INSTRUCTION),
        LLMMessage::user(prompt),
    ]
}
