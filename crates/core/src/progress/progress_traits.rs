use crate::errors::Result;
use crate::progress::progress_model::{
    NewProgressUpdate, ProgressUpdate, SynthesisRequest, SynthesisResult,
};
use async_trait::async_trait;

/// Trait for progress update repository operations
#[async_trait]
pub trait ProgressRepositoryTrait: Send + Sync {
    /// Progress updates for a goal, newest first, optionally limited.
    fn get_progress_updates(&self, goal_id: &str, limit: Option<i64>)
        -> Result<Vec<ProgressUpdate>>;
    async fn insert_progress_update(&self, new_update: NewProgressUpdate)
        -> Result<ProgressUpdate>;
}

/// Turns a free-text update into a progress estimate.
///
/// Implementations are total: provider failures are absorbed into
/// [`SynthesisResult::fallback`] instead of being returned as errors.
#[async_trait]
pub trait ProgressAnalyzerTrait: Send + Sync {
    async fn synthesize_progress(&self, request: &SynthesisRequest) -> SynthesisResult;
}

/// Trait for progress service operations
#[async_trait]
pub trait ProgressServiceTrait: Send + Sync {
    /// Validates the update, synthesizes progress and persists the result.
    async fn record_progress(&self, goal_id: &str, update_text: &str) -> Result<ProgressUpdate>;
    fn get_progress_history(&self, goal_id: &str) -> Result<Vec<ProgressUpdate>>;
    fn get_latest_progress(&self, goal_id: &str) -> Result<Option<ProgressUpdate>>;
}
