use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
};
use anyhow::Context;
use futures::future::BoxFuture;

use crate::error::AppError;

/// Anything that turns a prompt into raw model text.
///
/// Handlers only ever see this trait, so tests can swap in a scripted fake.
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name used in error messages.
    fn name(&self) -> &str;

    fn is_configured(&self) -> bool;

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>>;
}

#[derive(Clone)]
pub struct AiClient {
    client: Client<OpenAIConfig>,
    name: &'static str,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: Option<f32>,
    configured: bool,
}

impl AiClient {
    pub fn gemini(
        api_key: &str,
        base_url: &str,
        model: &str,
        max_tokens: u32,
        temperature: f32,
        timeout: u64,
    ) -> anyhow::Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        let client = Client::with_config(config).with_http_client(http_client(timeout)?);

        Ok(Self {
            client,
            name: "Gemini API",
            model: model.to_string(),
            max_tokens,
            temperature,
            top_p: None,
            configured: !api_key.is_empty(),
        })
    }

    /// Client for the fine-tuned adapter, served by any OpenAI-compatible
    /// inference server. Local servers usually accept an empty key.
    #[allow(clippy::too_many_arguments)]
    pub fn finetuned(
        base_url: &str,
        api_key: &str,
        model: &str,
        max_tokens: u32,
        temperature: f32,
        top_p: f32,
        timeout: u64,
    ) -> anyhow::Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        let client = Client::with_config(config).with_http_client(http_client(timeout)?);

        Ok(Self {
            client,
            name: "fine-tuned model",
            model: model.to_string(),
            max_tokens,
            temperature,
            top_p: Some(top_p),
            configured: !base_url.is_empty(),
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                    name: None,
                },
            )])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);
        if let Some(top_p) = self.top_p {
            args.top_p(top_p);
        }

        let request = args
            .build()
            .map_err(|e| AppError::service_unavailable(format!("Failed to build request: {e}")))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::service_unavailable(format!("AI API error: {e}")))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                backend = self.name,
                model = %self.model,
                total_tokens = usage.total_tokens,
                "Completion usage"
            );
        }

        let choice = response
            .choices
            .first()
            .ok_or_else(|| AppError::service_unavailable("Empty response from AI"))?;

        Ok(choice.message.content.clone().unwrap_or_default())
    }
}

impl TextGenerator for AiClient {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(self.complete(prompt))
    }
}

fn http_client(timeout: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .context("Failed to build HTTP client")
}
