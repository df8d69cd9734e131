use std::env;
use std::str::FromStr;

use crate::models::entities::PromptStrategy;
use crate::services::guardrails::DisclaimerPolicy;

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,

    // Gemini (prompt lab)
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_max_tokens: u32,
    pub gemini_temperature: f32,
    pub gemini_timeout: u64,

    // Fine-tuned model (served behind an OpenAI-compatible endpoint)
    pub finetuned_base_url: String,
    pub finetuned_api_key: String,
    pub finetuned_model: String,
    pub finetuned_max_tokens: u32,
    pub finetuned_temperature: f32,
    pub finetuned_top_p: f32,
    pub finetuned_timeout: u64,

    // Guardrails
    pub default_technique: PromptStrategy,
    pub disclaimer_policy: DisclaimerPolicy,

    // Churn classifier
    pub churn_model_path: String,

    // Sessions
    pub transcript_max_turns: usize,
    pub transcript_max_sessions: usize,

    // CORS
    pub cors_origins: String,

    // Logging
    pub log_level: String,
    pub log_format: String,

    // Sentry
    pub sentry_dsn: Option<String>,
    pub sentry_traces_sample_rate: f32,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or unparsable values
    /// fall back to their defaults; nothing here is mandatory.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            app_name: var("APP_NAME", "Healthcare AI Assistant"),
            app_version: var("APP_VERSION", "1.0.0"),
            environment: var("ENVIRONMENT", "development"),
            host: var("HOST", "0.0.0.0"),
            port: parse_or(var("PORT", "8000"), 8000),

            gemini_api_key: var("GEMINI_API_KEY", ""),
            gemini_model: var("GEMINI_MODEL", "gemini-1.5-flash-latest"),
            gemini_base_url: var(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta/openai",
            ),
            gemini_max_tokens: parse_or(var("GEMINI_MAX_TOKENS", "2048"), 2048),
            gemini_temperature: parse_or(var("GEMINI_TEMPERATURE", "0.7"), 0.7),
            gemini_timeout: parse_or(var("GEMINI_TIMEOUT", "60"), 60),

            finetuned_base_url: var("FINETUNED_BASE_URL", ""),
            finetuned_api_key: var("FINETUNED_API_KEY", ""),
            finetuned_model: var("FINETUNED_MODEL", "healthcare-assistant-lora"),
            finetuned_max_tokens: parse_or(var("FINETUNED_MAX_TOKENS", "256"), 256),
            finetuned_temperature: parse_or(var("FINETUNED_TEMPERATURE", "0.7"), 0.7),
            finetuned_top_p: parse_or(var("FINETUNED_TOP_P", "0.9"), 0.9),
            finetuned_timeout: parse_or(var("FINETUNED_TIMEOUT", "120"), 120),

            default_technique: parse_or(
                var("DEFAULT_TECHNIQUE", "Chain-of-Thought"),
                PromptStrategy::ChainOfThought,
            ),
            disclaimer_policy: parse_or(
                var("DISCLAIMER_POLICY", "keyword"),
                DisclaimerPolicy::Keyword,
            ),

            churn_model_path: var("CHURN_MODEL_PATH", "artifacts/churn_model.json"),

            transcript_max_turns: parse_or(var("TRANSCRIPT_MAX_TURNS", "100"), 100),
            transcript_max_sessions: parse_or(var("TRANSCRIPT_MAX_SESSIONS", "10000"), 10_000),

            cors_origins: var("CORS_ORIGINS", "*"),

            log_level: var("LOG_LEVEL", "info"),
            log_format: var("LOG_FORMAT", "json"),

            sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.is_empty()),
            sentry_traces_sample_rate: parse_or(var("SENTRY_TRACES_SAMPLE_RATE", "1.0"), 1.0),
        }
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr>(raw: String, default: T) -> T {
    raw.trim().parse().unwrap_or(default)
}
