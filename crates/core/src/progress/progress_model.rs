//! Progress update domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_ANALYSIS, MAX_PROGRESS, MIN_PROGRESS};
use crate::goals::Goal;

/// A recorded progress update for a goal. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub id: String,
    pub goal_id: String,
    pub update_text: String,
    /// Always within 0..=100.
    pub progress_value: f64,
    pub analysis: String,
    pub created_at: NaiveDateTime,
}

/// Input model for persisting a progress update
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressUpdate {
    pub id: Option<String>,
    pub goal_id: String,
    pub update_text: String,
    pub progress_value: f64,
    pub analysis: String,
}

/// Request body for recording progress against a goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecordProgressRequest {
    pub update_text: String,
}

/// Everything the synthesizer needs to estimate progress. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub goal_description: String,
    pub goal_category: String,
    pub update_text: String,
}

impl SynthesisRequest {
    pub fn new(
        goal_description: impl Into<String>,
        goal_category: impl Into<String>,
        update_text: impl Into<String>,
    ) -> Self {
        Self {
            goal_description: goal_description.into(),
            goal_category: goal_category.into(),
            update_text: update_text.into(),
        }
    }

    pub fn for_goal(goal: &Goal, update_text: impl Into<String>) -> Self {
        Self::new(goal.description.clone(), goal.category.clone(), update_text)
    }
}

/// Estimated progress and a short explanation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    pub percentage: f64,
    pub analysis: String,
}

impl SynthesisResult {
    /// Builds a result, clamping the percentage into 0..=100.
    pub fn new(percentage: f64, analysis: impl Into<String>) -> Self {
        Self {
            percentage: clamp_progress(percentage),
            analysis: analysis.into(),
        }
    }

    /// The deterministic result used whenever synthesis fails.
    pub fn fallback() -> Self {
        Self {
            percentage: MIN_PROGRESS,
            analysis: FALLBACK_ANALYSIS.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.percentage == MIN_PROGRESS && self.analysis == FALLBACK_ANALYSIS
    }
}

/// Clamps a progress value into 0..=100. NaN maps to 0.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_PROGRESS;
    }
    value.clamp(MIN_PROGRESS, MAX_PROGRESS)
}
