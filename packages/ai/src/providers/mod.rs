//! LLM provider abstraction and implementations.
//!
//! Supports Google Gemini, `OpenAI` (and compatible servers), and Anthropic
//! via a common trait. Each provider receives the prompt together with the
//! canonical response schema and returns the model's raw JSON text.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use scenebay_config::AiConfig;
use serde_json::Value;

use crate::AiError;

/// A single structured-output generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Instruction text.
    pub prompt: String,
    /// JSON Schema the output must follow (see [`crate::schema`]).
    pub schema: Value,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &'static str;

    /// Sends one generation request and returns the model's text, which is
    /// expected to be a JSON array matching the request schema.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the provider reports an
    /// error.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError>;
}

/// Stands in for a provider whose credentials are missing.
///
/// Construction never fails so the application can start; every request
/// fails instead.
pub struct UnconfiguredProvider {
    message: String,
}

impl UnconfiguredProvider {
    /// Creates a provider that fails every request with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, AiError> {
        Err(AiError::Config {
            message: self.message.clone(),
        })
    }
}

/// Creates an LLM provider from configuration and the process environment.
///
/// See [`create_provider_with`].
#[must_use]
pub fn create_provider(config: &AiConfig) -> Box<dyn LlmProvider> {
    create_provider_with(config, |key| std::env::var(key).ok())
}

/// Creates an LLM provider, reading credentials through `lookup`.
///
/// If `config.provider` is set, uses that provider. Otherwise auto-detects
/// from available credentials:
///
/// 1. `GEMINI_API_KEY` or `API_KEY` set -> Gemini
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 3. `OPENAI_API_KEY` set, or a base URL configured -> `OpenAI`
///
/// A missing credential yields an [`UnconfiguredProvider`], so searches
/// fail at request time rather than at startup.
#[must_use]
pub fn create_provider_with(
    config: &AiConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Box<dyn LlmProvider> {
    let provider = config
        .provider
        .clone()
        .unwrap_or_else(|| detect_provider(config, &lookup));

    match provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let Some(api_key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) else {
                return unconfigured("GEMINI_API_KEY (or API_KEY) environment variable not set");
            };
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
            let mut provider = gemini::GeminiProvider::new(api_key, model);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Box::new(provider)
        }
        "openai" | "gpt" => {
            // Local OpenAI-compatible servers usually need no key.
            let api_key = match (lookup("OPENAI_API_KEY"), &config.base_url) {
                (Some(key), _) => key,
                (None, Some(_)) => String::new(),
                (None, None) => {
                    return unconfigured("OPENAI_API_KEY environment variable not set");
                }
            };
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
            let mut provider = openai::OpenAiProvider::new(api_key, model);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Box::new(provider)
        }
        "anthropic" | "claude" => {
            let Some(api_key) = lookup("ANTHROPIC_API_KEY") else {
                return unconfigured("ANTHROPIC_API_KEY environment variable not set");
            };
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string());
            let mut provider = anthropic::AnthropicProvider::new(api_key, model);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Box::new(provider)
        }
        other => unconfigured(format!(
            "Unknown AI provider: {other}. Use 'gemini', 'openai', or 'anthropic'."
        )),
    }
}

fn unconfigured(message: impl Into<String>) -> Box<dyn LlmProvider> {
    let message = message.into();
    log::warn!("{message}; searches will fail until this is configured");
    Box::new(UnconfiguredProvider::new(message))
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns a provider name string that matches the arms in
/// [`create_provider_with`].
fn detect_provider(config: &AiConfig, lookup: &impl Fn(&str) -> Option<String>) -> String {
    if lookup("GEMINI_API_KEY").is_some() || lookup("API_KEY").is_some() {
        log::info!("Auto-detected AI provider: Gemini");
        return "gemini".to_string();
    }

    if lookup("ANTHROPIC_API_KEY").is_some() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return "anthropic".to_string();
    }

    if lookup("OPENAI_API_KEY").is_some() || config.base_url.is_some() {
        log::info!("Auto-detected AI provider: OpenAI");
        return "openai".to_string();
    }

    log::warn!(
        "No AI credentials detected. Set one of: GEMINI_API_KEY (or API_KEY), \
         ANTHROPIC_API_KEY, OPENAI_API_KEY. You can also set AI_PROVIDER explicitly."
    );

    // Fall back to Gemini, which reports the missing key on every search.
    "gemini".to_string()
}
