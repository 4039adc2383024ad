use log::{debug, info};
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::goals::GoalRepositoryTrait;
use crate::progress::progress_model::{
    clamp_progress, NewProgressUpdate, ProgressUpdate, SynthesisRequest,
};
use crate::progress::progress_traits::{
    ProgressAnalyzerTrait, ProgressRepositoryTrait, ProgressServiceTrait,
};
use async_trait::async_trait;

pub struct ProgressService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    progress_repository: Arc<dyn ProgressRepositoryTrait>,
    analyzer: Arc<dyn ProgressAnalyzerTrait>,
}

impl ProgressService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        progress_repository: Arc<dyn ProgressRepositoryTrait>,
        analyzer: Arc<dyn ProgressAnalyzerTrait>,
    ) -> Self {
        ProgressService {
            goal_repository,
            progress_repository,
            analyzer,
        }
    }
}

#[async_trait]
impl ProgressServiceTrait for ProgressService {
    async fn record_progress(&self, goal_id: &str, update_text: &str) -> Result<ProgressUpdate> {
        let update_text = update_text.trim();
        if update_text.is_empty() {
            return Err(Error::invalid_input("Update text required"));
        }

        let goal = self.goal_repository.get_goal(goal_id)?;
        let request = SynthesisRequest::for_goal(&goal, update_text);
        let result = self.analyzer.synthesize_progress(&request).await;
        debug!(
            "Synthesized progress {} for goal {}",
            result.percentage, goal.id
        );

        let created = self
            .progress_repository
            .insert_progress_update(NewProgressUpdate {
                id: None,
                goal_id: goal.id,
                update_text: update_text.to_string(),
                progress_value: clamp_progress(result.percentage),
                analysis: result.analysis,
            })
            .await?;
        info!(
            "Recorded progress update {} for goal {}",
            created.id, created.goal_id
        );
        Ok(created)
    }

    fn get_progress_history(&self, goal_id: &str) -> Result<Vec<ProgressUpdate>> {
        // Surface a not-found error for unknown goals rather than an empty list.
        self.goal_repository.get_goal(goal_id)?;
        self.progress_repository.get_progress_updates(goal_id, None)
    }

    fn get_latest_progress(&self, goal_id: &str) -> Result<Option<ProgressUpdate>> {
        Ok(self
            .progress_repository
            .get_progress_updates(goal_id, Some(1))?
            .into_iter()
            .next())
    }
}
