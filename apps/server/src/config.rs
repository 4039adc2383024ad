use anyhow::Context;
use goaltracker_ai::{CompletionConfig, DEFAULT_PROVIDER, DEFAULT_TIMEOUT_SECS};
use std::{net::SocketAddr, time::Duration};

/// Slack kept between the provider timeout and the HTTP request timeout so a
/// progress update is still stored after the provider call gives up.
pub const PROVIDER_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Completion provider settings handed to the AI crate.
    pub ai: CompletionConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("GT_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid GT_LISTEN_ADDR")?;
        let db_path = std::env::var("GT_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("GT_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("GT_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            ai: ai_config_from_env(),
        })
    }

    /// Request timeout applied to the HTTP layer. Never shorter than the
    /// provider timeout plus [`PROVIDER_TIMEOUT_MARGIN`].
    pub fn effective_request_timeout(&self) -> Duration {
        self.request_timeout
            .max(self.ai.timeout + PROVIDER_TIMEOUT_MARGIN)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ai_config_from_env() -> CompletionConfig {
    let provider = non_empty_var("GT_AI_PROVIDER")
        .map(|p| p.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    let timeout_secs: u64 = non_empty_var("GT_AI_TIMEOUT_SECS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let mut ai = CompletionConfig::for_provider(&provider, non_empty_var("GT_AI_API_KEY"))
        .with_timeout(Duration::from_secs(timeout_secs));
    if let Some(model) = non_empty_var("GT_AI_MODEL") {
        ai = ai.with_model(model);
    }
    if let Some(url) = non_empty_var("GT_AI_BASE_URL") {
        ai = ai.with_base_url(url);
    }
    ai
}
