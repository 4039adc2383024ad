use log::debug;
use std::sync::Arc;

use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalSummary, GoalWithProgress, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::progress::ProgressRepositoryTrait;
use async_trait::async_trait;

pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    progress_repository: Arc<dyn ProgressRepositoryTrait>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        progress_repository: Arc<dyn ProgressRepositoryTrait>,
    ) -> Self {
        GoalService {
            goal_repository,
            progress_repository,
        }
    }

    /// Latest progress value and the change from the one before it.
    fn progress_and_trend(&self, goal_id: &str) -> Result<(f64, Option<f64>)> {
        let recent = self
            .progress_repository
            .get_progress_updates(goal_id, Some(2))?;
        let latest = recent.first().map(|u| u.progress_value).unwrap_or(0.0);
        let trend = match recent.as_slice() {
            [newest, previous, ..] => Some(newest.progress_value - previous.progress_value),
            _ => None,
        };
        Ok((latest, trend))
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        self.goal_repository.load_goals()
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goal_repository.get_goal(goal_id)
    }

    fn get_goals_with_progress(&self) -> Result<Vec<GoalWithProgress>> {
        self.goal_repository
            .load_goals()?
            .into_iter()
            .map(|goal| {
                let (progress, _) = self.progress_and_trend(&goal.id)?;
                Ok(GoalWithProgress { goal, progress })
            })
            .collect()
    }

    fn get_goal_summaries(&self) -> Result<Vec<GoalSummary>> {
        let goals = self.goal_repository.load_goals()?;
        debug!("Building summaries for {} goals", goals.len());
        goals
            .iter()
            .map(|goal| {
                let (progress, trend) = self.progress_and_trend(&goal.id)?;
                Ok(GoalSummary::from_goal(goal, progress, trend))
            })
            .collect()
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        self.goal_repository.insert_new_goal(new_goal).await
    }

    async fn update_goal(&self, updated_goal_data: Goal) -> Result<Goal> {
        updated_goal_data.validate()?;
        self.goal_repository.update_goal(updated_goal_data).await
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        self.goal_repository.delete_goal(goal_id_to_delete).await
    }
}
