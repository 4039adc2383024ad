//! Database models for progress updates.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::goals::GoalDB;

/// Database model for progress updates
#[derive(Queryable, Identifiable, Associations, Selectable, PartialEq, Debug, Clone)]
#[diesel(belongs_to(GoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::progress_updates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProgressUpdateDB {
    pub id: String,
    pub goal_id: String,
    pub update_text: String,
    pub progress_value: f64,
    pub analysis: String,
    pub created_at: NaiveDateTime,
}

/// Database model for recording a progress update
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::progress_updates)]
pub struct NewProgressUpdateDB {
    pub id: String,
    pub goal_id: String,
    pub update_text: String,
    pub progress_value: f64,
    pub analysis: String,
    pub created_at: NaiveDateTime,
}

impl From<ProgressUpdateDB> for goaltracker_core::progress::ProgressUpdate {
    fn from(db: ProgressUpdateDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            update_text: db.update_text,
            progress_value: db.progress_value,
            analysis: db.analysis,
            created_at: db.created_at,
        }
    }
}
