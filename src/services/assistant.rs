use std::sync::Arc;

use crate::models::entities::PromptStrategy;
use crate::services::ai::TextGenerator;
use crate::services::guardrails::{
    DisclaimerPolicy, EMERGENCY_RESPONSE, SensitivityClassifier, postprocess_with,
};
use crate::services::prompts::build_prompt;

/// Guardrailed question answering over a single generation backend.
///
/// `answer` never fails: configuration problems, emergencies and backend
/// errors all come back as text for the caller to show.
#[derive(Clone)]
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    classifier: SensitivityClassifier,
    default_strategy: PromptStrategy,
    disclaimer_policy: DisclaimerPolicy,
    unavailable_message: String,
}

impl Assistant {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        classifier: SensitivityClassifier,
        default_strategy: PromptStrategy,
    ) -> Self {
        let unavailable_message = format!(
            "{} client not initialized. Check the service configuration.",
            generator.name()
        );
        Self {
            generator,
            classifier,
            default_strategy,
            disclaimer_policy: DisclaimerPolicy::default(),
            unavailable_message,
        }
    }

    /// Prompt lab: hosted model, standard keywords, technique chosen per query.
    pub fn prompt_lab(generator: Arc<dyn TextGenerator>, default_strategy: PromptStrategy) -> Self {
        Self::new(generator, SensitivityClassifier::standard(), default_strategy)
            .with_unavailable_message(
                "Gemini Client not initialized. The GEMINI_API_KEY may be missing or invalid.",
            )
    }

    /// Fine-tuned assistant: extended keywords and a single fixed template.
    pub fn finetuned(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(
            generator,
            SensitivityClassifier::extended(),
            PromptStrategy::FixedInstruction,
        )
        .with_unavailable_message(
            "Fine-tuned model not loaded. The FINETUNED_BASE_URL may be missing or unreachable.",
        )
    }

    pub fn with_disclaimer_policy(mut self, policy: DisclaimerPolicy) -> Self {
        self.disclaimer_policy = policy;
        self
    }

    pub fn with_unavailable_message(mut self, message: impl Into<String>) -> Self {
        self.unavailable_message = message.into();
        self
    }

    pub fn default_strategy(&self) -> PromptStrategy {
        self.default_strategy
    }

    pub fn is_ready(&self) -> bool {
        self.generator.is_configured()
    }

    pub fn backend_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn answer(&self, query: &str, strategy: Option<PromptStrategy>) -> String {
        if !self.generator.is_configured() {
            tracing::warn!(backend = self.generator.name(), "Generation backend not configured");
            return self.unavailable_message.clone();
        }

        if self.classifier.is_sensitive(query) {
            tracing::info!(query_len = query.len(), "Sensitive query answered with emergency notice");
            return EMERGENCY_RESPONSE.to_string();
        }

        let strategy = strategy.unwrap_or(self.default_strategy);
        let prompt = build_prompt(query, strategy);

        match self.generator.generate(&prompt).await {
            Ok(raw) => postprocess_with(&raw, self.disclaimer_policy),
            Err(e) => {
                tracing::error!(
                    backend = self.generator.name(),
                    strategy = %strategy,
                    error = %e,
                    "Generation failed"
                );
                format!("Error communicating with the {}: {e}", self.generator.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::future::BoxFuture;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::error::AppError;
    use crate::services::guardrails::{DISCLAIMER, FINAL_ANSWER_MARKER};

    struct ScriptedGenerator {
        configured: bool,
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(detail: &str) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply: Err(detail.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                configured: false,
                reply: Ok(String::new()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted model"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = self.reply.clone().map_err(AppError::service_unavailable);
            Box::pin(async move { reply })
        }
    }

    #[tokio::test]
    async fn sensitive_queries_never_reach_the_model() {
        let generator = ScriptedGenerator::replying("should not be used");
        let assistant = Assistant::prompt_lab(generator.clone(), PromptStrategy::ChainOfThought);

        for strategy in PromptStrategy::iter() {
            for query in ["I have CHEST PAIN", "thinking about suicide", "Heart attack?"] {
                let answer = assistant.answer(query, Some(strategy)).await;
                assert_eq!(answer, EMERGENCY_RESPONSE);
            }
        }
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn answers_always_carry_the_disclaimer() {
        let generator = ScriptedGenerator::replying("Allergies come from pollen.");
        let assistant = Assistant::prompt_lab(generator.clone(), PromptStrategy::ChainOfThought);

        let answer = assistant
            .answer("what causes seasonal allergies", Some(PromptStrategy::ZeroShot))
            .await;
        assert_eq!(answer, format!("Allergies come from pollen.\n\n{DISCLAIMER}"));

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(r#"Question: "what causes seasonal allergies""#));
    }

    #[tokio::test]
    async fn default_strategy_applies_when_none_given() {
        let generator = ScriptedGenerator::replying("step 1... Final Answer: Rest. Disclaimer.");
        let assistant = Assistant::prompt_lab(generator.clone(), PromptStrategy::ChainOfThought);

        let answer = assistant.answer("What is a cold?", None).await;
        assert_eq!(answer, "Rest. Disclaimer.");
        assert!(generator.calls()[0].ends_with(FINAL_ANSWER_MARKER));
    }

    #[tokio::test]
    async fn unconfigured_backend_returns_fixed_message() {
        let generator = ScriptedGenerator::unconfigured();
        let assistant = Assistant::prompt_lab(generator.clone(), PromptStrategy::ZeroShot);

        let answer = assistant.answer("I have chest pain", None).await;
        assert!(answer.starts_with("Gemini Client not initialized"));
        assert!(generator.calls().is_empty());
        assert!(!assistant.is_ready());
    }

    #[tokio::test]
    async fn backend_failure_is_reported_as_text() {
        let generator = ScriptedGenerator::failing("connection refused");
        let assistant = Assistant::finetuned(generator.clone());

        let answer = assistant.answer("What is the flu?", None).await;
        assert_eq!(
            answer,
            "Error communicating with the scripted model: connection refused"
        );
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn finetuned_uses_extended_keywords_and_fixed_template() {
        let generator = ScriptedGenerator::replying("Drink fluids.");
        let assistant = Assistant::finetuned(generator.clone());
        assert_eq!(assistant.default_strategy(), PromptStrategy::FixedInstruction);

        assert_eq!(
            assistant.answer("my friend had a seizure", None).await,
            EMERGENCY_RESPONSE
        );
        let answer = assistant.answer("How do I treat a cold?", None).await;
        assert!(answer.contains(DISCLAIMER));
        assert!(generator.calls()[0].starts_with("### Instruction:"));
    }

    #[tokio::test]
    async fn verbatim_policy_appends_full_disclaimer() {
        let generator = ScriptedGenerator::replying("Rest. Disclaimer: ask a doctor.");
        let assistant = Assistant::finetuned(generator)
            .with_disclaimer_policy(DisclaimerPolicy::Verbatim);

        let answer = assistant.answer("cold remedies", None).await;
        assert!(answer.ends_with(DISCLAIMER));
    }
}
