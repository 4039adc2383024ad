//! Text completion against configured LLM providers.
//!
//! Everything above this module only sees [`CompletionClientTrait`]: a prompt
//! goes in, raw model text (or an [`AiError`]) comes out. Provider selection,
//! credentials and timeouts live here.

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use rig::{
    client::{CompletionClient, Nothing},
    completion::Prompt,
    providers::{anthropic, gemini, groq, ollama, openai},
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AiError;

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default completion budget. Anthropic rejects requests without one.
pub const DEFAULT_MAX_TOKENS: u64 = 1000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "groq";

// ============================================================================
// Client Trait
// ============================================================================

/// A single-shot text completion backend.
#[async_trait]
pub trait CompletionClientTrait: Send + Sync {
    /// Send one prompt and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;

    /// Upper bound for a single [`complete`](Self::complete) call.
    fn timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    }
}

/// Run a completion, turning an expired deadline into [`AiError::Timeout`].
pub async fn complete_with_timeout(
    client: &dyn CompletionClientTrait,
    prompt: &str,
) -> Result<String, AiError> {
    let limit = client.timeout();
    match tokio::time::timeout(limit, client.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(AiError::Timeout(limit)),
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for [`RigCompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Provider id: `groq`, `openai`, `anthropic`, `gemini`/`google` or `ollama`.
    /// Anything else is treated as OpenAI-compatible.
    pub provider_id: String,
    pub model_id: String,
    pub api_key: Option<String>,
    /// Only honoured for `ollama`.
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub max_tokens: Option<u64>,
    pub temperature: Option<f64>,
}

impl CompletionConfig {
    /// Settings for `provider_id` with its default model.
    pub fn for_provider(provider_id: &str, api_key: Option<String>) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            model_id: default_model_for(provider_id).to_string(),
            api_key,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self::for_provider(DEFAULT_PROVIDER, None)
    }
}

/// Model used when the configuration does not name one.
pub fn default_model_for(provider_id: &str) -> &'static str {
    match provider_id {
        "groq" => "llama-3.3-70b-versatile",
        "anthropic" => "claude-3-5-haiku-latest",
        "gemini" | "google" => "gemini-2.0-flash",
        "ollama" => "llama3.2",
        _ => "gpt-4o-mini",
    }
}

// ============================================================================
// rig-core Client
// ============================================================================

/// Completion client backed by rig-core providers.
///
/// A provider client is built per call; the calls are infrequent and this
/// keeps the struct free of provider-specific generics.
pub struct RigCompletionClient {
    config: CompletionConfig,
}

impl RigCompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn require_key(&self) -> Result<&str, AiError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey(self.config.provider_id.clone()))
    }
}

macro_rules! prompt_agent {
    ($client:expr, $config:expr, $prompt:expr) => {{
        let mut builder = $client.agent(&$config.model_id);
        if let Some(temperature) = $config.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(tokens) = $config.max_tokens {
            builder = builder.max_tokens(tokens);
        }
        builder
            .build()
            .prompt($prompt)
            .await
            .map_err(|e| AiError::Provider(e.to_string()))
    }};
}

#[async_trait]
impl CompletionClientTrait for RigCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let config = &self.config;
        debug!(
            "Requesting completion from provider {} model {}",
            config.provider_id, config.model_id
        );

        match config.provider_id.as_str() {
            "anthropic" => {
                let key = self.require_key()?;
                let client: anthropic::Client<HttpClient> =
                    anthropic::Client::new(key).map_err(|e| AiError::Provider(e.to_string()))?;
                prompt_agent!(client, config, prompt)
            }
            "gemini" | "google" => {
                let key = self.require_key()?;
                let client: gemini::Client<HttpClient> =
                    gemini::Client::new(key).map_err(|e| AiError::Provider(e.to_string()))?;
                prompt_agent!(client, config, prompt)
            }
            "groq" => {
                let key = self.require_key()?;
                let client: groq::Client<HttpClient> =
                    groq::Client::new(key).map_err(|e| AiError::Provider(e.to_string()))?;
                prompt_agent!(client, config, prompt)
            }
            "ollama" => {
                let mut builder = ollama::Client::<HttpClient>::builder().api_key(Nothing);
                if let Some(url) = &config.base_url {
                    builder = builder.base_url(url);
                }
                let client = builder
                    .build()
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                prompt_agent!(client, config, prompt)
            }
            _ => {
                // Default to OpenAI-compatible
                let key = self.require_key()?;
                let client: openai::Client<HttpClient> =
                    openai::Client::new(key).map_err(|e| AiError::Provider(e.to_string()))?;
                prompt_agent!(client, config, prompt)
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

// ============================================================================
// Fake Client for Testing
// ============================================================================

#[derive(Debug, Clone)]
enum FakeBehavior {
    Respond(String),
    Fail(String),
    Hang,
}

/// A fake completion client with scripted behavior. Records every prompt.
#[derive(Debug, Clone)]
pub struct FakeCompletionClient {
    behavior: FakeBehavior,
    timeout: Duration,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeCompletionClient {
    fn with_behavior(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer with `response`.
    pub fn responding(response: impl Into<String>) -> Self {
        Self::with_behavior(FakeBehavior::Respond(response.into()))
    }

    /// Always fail with a provider error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(FakeBehavior::Fail(message.into()))
    }

    /// Never answer; the caller's timeout decides.
    pub fn hanging() -> Self {
        Self::with_behavior(FakeBehavior::Hang)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl CompletionClientTrait for FakeCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        match &self.behavior {
            FakeBehavior::Respond(response) => Ok(response.clone()),
            FakeBehavior::Fail(message) => Err(AiError::provider(message.clone())),
            FakeBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(AiError::internal("unreachable"))
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
