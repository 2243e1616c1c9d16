//! Keyword-based emotion tagging for answers.
//!
//! The rules form a priority chain: the first keyword set with any
//! substring hit decides the label, regardless of later matches.

use crate::types::Emotion;

/// Ordered classification rules. `Calm` is the fallback and has no rule.
const EMOTION_RULES: &[(Emotion, &[&str])] = &[
    (
        Emotion::Happy,
        &["great", "excellent", "wonderful", "amazing", "perfect"],
    ),
    (
        Emotion::Thinking,
        &["think", "consider", "interesting", "let me", "hmm"],
    ),
    (
        Emotion::Explaining,
        &["explain", "understand", "means", "therefore", "because", "so that"],
    ),
    (
        Emotion::Encouraging,
        &["try", "practice", "keep going", "you can", "attempt"],
    ),
    (
        Emotion::Excited,
        &["wow", "awesome", "fantastic", "brilliant", "incredible"],
    ),
];

/// Classify `text` into one of the six emotion labels.
///
/// Matching is case-insensitive and substring-based, so "trying" hits
/// the `try` keyword.
pub fn detect_emotion(text: &str) -> Emotion {
    let lowered = text.to_lowercase();
    EMOTION_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(emotion, _)| *emotion)
        .unwrap_or(Emotion::Calm)
}
