//! Completion gateway: prompt in, tagged answer out.
//!
//! A question is composed into a prompt with the knowledge text, sent to
//! the primary model, and on any failure sent once more to the secondary
//! model. The answer text is tagged with an [`Emotion`].
//!
//! Total failure is returned as a typed [`CompletionError`]. Callers that
//! must always produce an answer turn it into a canned one with
//! [`fallback_answer`].

use std::sync::Arc;

use crate::knowledge::Knowledge;
use crate::llms::base_llm::{generate_call_id, BaseLLM};
use crate::llms::errors::CompletionError;
use crate::llms::providers::openrouter::OpenRouterCompletion;
use crate::types::AnswerResult;
use crate::utilities::config::TutorConfig;
use crate::utilities::emotion::detect_emotion;
use crate::utilities::prompts::{compose_prompt, tutor_messages};

/// Instructions returned when the upstream rejects free-model use over
/// the account's privacy or data-policy settings.
pub const DATA_POLICY_HELP: &str = "I need you to configure your OpenRouter settings first.

Please visit: https://openrouter.ai/settings/privacy
And enable the \"Allow free models\" option.

Or you can add a data policy by going to:
https://openrouter.ai/keys
And clicking \"Add Data Policy\"

After that, try asking your question again!";

/// Characters of the answer shown in debug logs.
const ANSWER_PREVIEW_CHARS: usize = 100;

/// Two-model completion pipeline shared by all requests.
#[derive(Debug, Clone)]
pub struct CompletionGateway {
    primary: Arc<dyn BaseLLM>,
    secondary: Arc<dyn BaseLLM>,
    knowledge: Arc<Knowledge>,
}

impl CompletionGateway {
    pub fn new(
        primary: Arc<dyn BaseLLM>,
        secondary: Arc<dyn BaseLLM>,
        knowledge: Knowledge,
    ) -> Self {
        Self {
            primary,
            secondary,
            knowledge: Arc::new(knowledge),
        }
    }

    /// Build both OpenRouter providers from `config`, sharing one HTTP
    /// client.
    pub fn from_config(config: &TutorConfig, knowledge: Knowledge) -> reqwest::Result<Self> {
        let client = config.http_client()?;
        let provider = |model: &str| {
            OpenRouterCompletion::new(model, config.api_key.clone(), Some(config.base_url.clone()))
                .with_client(client.clone())
                .with_attribution(config.referer.clone(), config.app_title.clone())
        };

        Ok(Self::new(
            Arc::new(provider(&config.primary_model)),
            Arc::new(provider(&config.secondary_model)),
            knowledge,
        ))
    }

    /// Complete `prompt`, falling back to the secondary model once.
    ///
    /// When both attempts fail the secondary model's error is returned.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let call_id = generate_call_id();
        let messages = tutor_messages(prompt);

        tracing::debug!(
            call_id = %call_id,
            provider = self.primary.provider(),
            model = self.primary.model(),
            "Requesting completion"
        );
        let primary_error = match self.primary.acall(messages.clone()).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        tracing::warn!(
            call_id = %call_id,
            model = self.primary.model(),
            kind = primary_error.kind(),
            error = %primary_error,
            fallback = self.secondary.model(),
            "Primary model failed, retrying with fallback model"
        );

        self.secondary.acall(messages).await.map_err(|e| {
            tracing::error!(
                call_id = %call_id,
                model = self.secondary.model(),
                kind = e.kind(),
                error = %e,
                "Fallback model failed"
            );
            e
        })
    }

    /// Answer `question` against the knowledge text.
    pub async fn answer(&self, question: &str) -> Result<AnswerResult, CompletionError> {
        let prompt = compose_prompt(self.knowledge.content(), question);
        let text = self.complete(&prompt).await?;
        let emotion = detect_emotion(&text);

        tracing::debug!(
            length = text.len(),
            preview = %text.chars().take(ANSWER_PREVIEW_CHARS).collect::<String>(),
            emotion = %emotion,
            "Got answer"
        );

        Ok(AnswerResult::answered(text, emotion))
    }

    /// Like [`answer`](Self::answer), but total failure becomes a canned
    /// answer instead of an error.
    pub async fn answer_or_fallback(&self, question: &str) -> AnswerResult {
        match self.answer(question).await {
            Ok(answer) => answer,
            Err(e) => fallback_answer(&e),
        }
    }
}

/// Canned answer for a failed completion: data-policy instructions for
/// policy rejections, a generic apology otherwise.
pub fn fallback_answer(error: &CompletionError) -> AnswerResult {
    if error.is_policy_rejection() {
        AnswerResult::degraded(DATA_POLICY_HELP)
    } else {
        AnswerResult::degraded(format!(
            "I encountered an error: {}. Please try again!",
            error.message()
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedLLM;
    use super::*;
    use crate::types::Emotion;

    fn gateway(primary: &Arc<ScriptedLLM>, secondary: &Arc<ScriptedLLM>) -> CompletionGateway {
        CompletionGateway::new(primary.clone(), secondary.clone(), Knowledge::new("KB"))
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = Arc::new(ScriptedLLM::answering("a", "Let me explain."));
        let secondary = Arc::new(ScriptedLLM::answering("b", "unused"));

        let answer = gateway(&primary, &secondary).answer("What is AI?").await.unwrap();
        assert_eq!(answer.text, "Let me explain.");
        assert_eq!(answer.emotion, Emotion::Thinking);
        assert_eq!(answer.sources, 1);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_once() {
        let primary =
            Arc::new(ScriptedLLM::failing("a", CompletionError::RateLimited("429".into())));
        let secondary = Arc::new(ScriptedLLM::answering("b", "Deep learning uses layers."));

        let answer = gateway(&primary, &secondary).answer("q").await.unwrap();
        assert_eq!(answer.text, "Deep learning uses layers.");
        assert_eq!(answer.emotion, Emotion::Calm);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_fail_returns_secondary_error() {
        let primary =
            Arc::new(ScriptedLLM::failing("a", CompletionError::Network("refused".into())));
        let secondary =
            Arc::new(ScriptedLLM::failing("b", CompletionError::Upstream("502".into())));

        let err = gateway(&primary, &secondary).answer("q").await.unwrap_err();
        assert_eq!(err, CompletionError::Upstream("502".into()));
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_attempts_send_same_messages() {
        let primary = Arc::new(ScriptedLLM::failing("a", CompletionError::Unknown("x".into())));
        let secondary = Arc::new(ScriptedLLM::answering("b", "ok"));

        gateway(&primary, &secondary).answer("What is NLP?").await.unwrap();

        let first = primary.last_messages.lock().unwrap().clone();
        let second = secondary.last_messages.lock().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first[0].content, "You are a helpful AI tutor.");
        assert!(first[1].content.contains("KB"));
        assert!(first[1].content.contains("Question: What is NLP?"));
    }

    #[tokio::test]
    async fn test_answer_or_fallback_policy_message() {
        let policy =
            CompletionError::PolicyRejected("No endpoints found matching your data policy".into());
        let primary = Arc::new(ScriptedLLM::failing("a", policy.clone()));
        let secondary = Arc::new(ScriptedLLM::failing("b", policy));

        let answer = gateway(&primary, &secondary).answer_or_fallback("q").await;
        assert_eq!(answer.text, DATA_POLICY_HELP);
        assert_eq!(answer.emotion, Emotion::Calm);
        assert_eq!(answer.sources, 0);
    }

    #[test]
    fn test_fallback_answer_generic() {
        let answer = fallback_answer(&CompletionError::Unknown("boom".into()));
        assert_eq!(answer.text, "I encountered an error: boom. Please try again!");
        assert_eq!(answer.emotion, Emotion::Calm);
        assert_eq!(answer.sources, 0);
        assert!(answer.is_degraded());

        let answer = fallback_answer(&CompletionError::Upstream("Error code: 503 - busy".into()));
        assert_eq!(
            answer.text,
            "I encountered an error: Error code: 503 - busy. Please try again!"
        );
    }

    #[test]
    fn test_data_policy_help_points_at_settings() {
        assert!(DATA_POLICY_HELP.contains("https://openrouter.ai/settings/privacy"));
        assert!(DATA_POLICY_HELP.contains("https://openrouter.ai/keys"));
        // The text alone would classify as encouraging; the label is fixed.
        assert_eq!(detect_emotion(DATA_POLICY_HELP), Emotion::Encouraging);
        let answer = fallback_answer(&CompletionError::PolicyRejected(String::new()));
        assert_eq!(answer.emotion, Emotion::Calm);
    }

    #[test]
    fn test_from_config_uses_configured_models() {
        let config = TutorConfig::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("k".to_string()),
            "TUTOR_PRIMARY_MODEL" => Some("x/primary".to_string()),
            _ => None,
        })
        .unwrap();
        let gateway = CompletionGateway::from_config(&config, Knowledge::builtin()).unwrap();
        assert_eq!(gateway.primary.model(), "x/primary");
        assert_eq!(gateway.secondary.model(), "deepseek/deepseek-chat");
        assert_eq!(gateway.primary.provider(), "openrouter");
    }
}
