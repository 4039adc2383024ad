use std::sync::Arc;

use crate::config::Config;
use goaltracker_ai::{
    CompletionClientTrait, ProgressSynthesizer, RigCompletionClient, SuggestionGenerator,
    SuggestionGeneratorTrait,
};
use goaltracker_core::{
    goals::{GoalService, GoalServiceTrait},
    progress::{ProgressService, ProgressServiceTrait},
};
use goaltracker_storage_sqlite::{db, goals::GoalRepository, progress::ProgressRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub goal_service: Arc<dyn GoalServiceTrait + Send + Sync>,
    pub progress_service: Arc<dyn ProgressServiceTrait + Send + Sync>,
    pub suggestion_generator: Arc<dyn SuggestionGeneratorTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("GT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the application state with the configured completion provider.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    if config.ai.api_key.is_none() && config.ai.provider_id != "ollama" {
        tracing::warn!(
            "No API key configured for AI provider {}; progress analysis will use fallback results",
            config.ai.provider_id
        );
    }
    tracing::info!(
        "AI provider: {} (model {}, timeout {:?})",
        config.ai.provider_id,
        config.ai.model_id,
        config.ai.timeout
    );
    let client: Arc<dyn CompletionClientTrait> =
        Arc::new(RigCompletionClient::new(config.ai.clone()));
    build_state_with_client(config, client).await
}

/// Builds the application state around an injected completion client.
pub async fn build_state_with_client(
    config: &Config,
    completion_client: Arc<dyn CompletionClientTrait>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&pool)?;

    let goal_repo = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let progress_repo = Arc::new(ProgressRepository::new(pool.clone(), writer.clone()));

    let goal_service = Arc::new(GoalService::new(goal_repo.clone(), progress_repo.clone()));

    let synthesizer = Arc::new(ProgressSynthesizer::new(completion_client.clone()));
    let progress_service = Arc::new(ProgressService::new(
        goal_repo,
        progress_repo,
        synthesizer,
    ));

    let suggestion_generator = Arc::new(SuggestionGenerator::new(completion_client));

    Ok(Arc::new(AppState {
        goal_service,
        progress_service,
        suggestion_generator,
    }))
}
