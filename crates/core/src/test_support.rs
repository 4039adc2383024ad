//! In-memory repositories shared by the service tests.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalRepositoryTrait, NewGoal};
use crate::progress::{NewProgressUpdate, ProgressRepositoryTrait, ProgressUpdate};

pub fn sample_new_goal(category: &str, description: &str) -> NewGoal {
    NewGoal {
        id: None,
        category: category.to_string(),
        description: description.to_string(),
        target_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
    }
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[derive(Default)]
pub struct MockGoalRepository {
    goals: RwLock<Vec<Goal>>,
    next_id: AtomicUsize,
}

#[async_trait]
impl GoalRepositoryTrait for MockGoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.read().unwrap().clone())
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goals
            .read()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Goal {}", goal_id)))
    }

    async fn insert_new_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let goal = Goal {
            id: new_goal.id.unwrap_or_else(|| format!("goal-{}", n)),
            category: new_goal.category,
            description: new_goal.description,
            target_date: new_goal.target_date,
            created_at: base_time() + Duration::minutes(n as i64),
        };
        self.goals.write().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, goal_update: Goal) -> Result<Goal> {
        let mut goals = self.goals.write().unwrap();
        let existing = goals
            .iter_mut()
            .find(|g| g.id == goal_update.id)
            .ok_or_else(|| Error::not_found(format!("Goal {}", goal_update.id)))?;
        *existing = goal_update.clone();
        Ok(goal_update)
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        let mut goals = self.goals.write().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != goal_id_to_delete);
        Ok(before - goals.len())
    }
}

#[derive(Default)]
pub struct MockProgressRepository {
    updates: RwLock<Vec<ProgressUpdate>>,
    next_id: AtomicUsize,
}

#[async_trait]
impl ProgressRepositoryTrait for MockProgressRepository {
    fn get_progress_updates(
        &self,
        goal_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ProgressUpdate>> {
        let updates = self.updates.read().unwrap();
        let newest_first = updates.iter().rev().filter(|u| u.goal_id == goal_id).cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit.max(0) as usize).collect(),
            None => newest_first.collect(),
        })
    }

    async fn insert_progress_update(
        &self,
        new_update: NewProgressUpdate,
    ) -> Result<ProgressUpdate> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let update = ProgressUpdate {
            id: new_update.id.unwrap_or_else(|| format!("progress-{}", n)),
            goal_id: new_update.goal_id,
            update_text: new_update.update_text,
            progress_value: new_update.progress_value,
            analysis: new_update.analysis,
            created_at: base_time() + Duration::minutes(n as i64),
        };
        self.updates.write().unwrap().push(update.clone());
        Ok(update)
    }
}
