//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

/// Database model for goals
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub category: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Database model for creating a new goal
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct NewGoalDB {
    pub id: String,
    pub category: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Editable goal columns; `created_at` is never rewritten.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct GoalChangesetDB {
    pub category: String,
    pub description: String,
    pub target_date: NaiveDate,
}

// Conversion to domain models
impl From<GoalDB> for goaltracker_core::goals::Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            id: db.id,
            category: db.category,
            description: db.description,
            target_date: db.target_date,
            created_at: db.created_at,
        }
    }
}

impl From<&goaltracker_core::goals::Goal> for GoalChangesetDB {
    fn from(domain: &goaltracker_core::goals::Goal) -> Self {
        Self {
            category: domain.category.clone(),
            description: domain.description.clone(),
            target_date: domain.target_date,
        }
    }
}
