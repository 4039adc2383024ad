//! Goals domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CATEGORY_LEN, MAX_DESCRIPTION_LEN};
use crate::errors::{Result, ValidationError};

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub category: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub category: String,
    pub description: String,
    pub target_date: NaiveDate,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        validate_goal_fields(&self.category, &self.description)
    }
}

impl Goal {
    pub fn validate(&self) -> Result<()> {
        validate_goal_fields(&self.category, &self.description)
    }
}

fn validate_goal_fields(category: &str, description: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::MissingField("category".to_string()).into());
    }
    if description.trim().is_empty() {
        return Err(ValidationError::MissingField("description".to_string()).into());
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        }
        .into());
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        }
        .into());
    }
    Ok(())
}

/// A goal together with its most recent progress value (0 when none recorded).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: f64,
}

/// Compact view of a goal used as context for coaching suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub category: String,
    pub description: String,
    pub target_date: Option<NaiveDate>,
    /// Latest recorded progress, 0 to 100.
    pub progress: f64,
    /// Change between the two most recent progress values, if known.
    pub trend: Option<f64>,
}

impl GoalSummary {
    pub fn from_goal(goal: &Goal, progress: f64, trend: Option<f64>) -> Self {
        Self {
            category: goal.category.clone(),
            description: goal.description.clone(),
            target_date: Some(goal.target_date),
            progress,
            trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_goal(category: &str, description: &str) -> NewGoal {
        NewGoal {
            id: None,
            category: category.to_string(),
            description: description.to_string(),
            target_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_validate_accepts_regular_goal() {
        assert!(new_goal("Fitness", "Run a 10K").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(new_goal("  ", "Run a 10K").validate().is_err());
        assert!(new_goal("Fitness", "").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_category() {
        let category = "x".repeat(MAX_CATEGORY_LEN + 1);
        assert!(new_goal(&category, "Run a 10K").validate().is_err());
    }

    #[test]
    fn test_goal_with_progress_serializes_flat() {
        let goal = Goal {
            id: "g1".to_string(),
            category: "Fitness".to_string(),
            description: "Run a 10K".to_string(),
            target_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        let json = serde_json::to_value(GoalWithProgress {
            goal,
            progress: 45.0,
        })
        .unwrap();
        assert_eq!(json["id"], "g1");
        assert_eq!(json["targetDate"], "2025-01-01");
        assert_eq!(json["progress"], 45.0);
    }
}
