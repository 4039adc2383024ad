use goaltracker_core::progress::{NewProgressUpdate, ProgressRepositoryTrait, ProgressUpdate};
use goaltracker_core::Result;

use super::model::{NewProgressUpdateDB, ProgressUpdateDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::progress_updates;
use crate::schema::progress_updates::dsl::*;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct ProgressRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ProgressRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ProgressRepository { pool, writer }
    }
}

#[async_trait]
impl ProgressRepositoryTrait for ProgressRepository {
    fn get_progress_updates(
        &self,
        goal_id_filter: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ProgressUpdate>> {
        let mut conn = get_connection(&self.pool)?;
        // Ids are time-ordered (UUIDv7), so they break created_at ties.
        let mut query = progress_updates
            .filter(goal_id.eq(goal_id_filter))
            .order((created_at.desc(), id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit.max(0));
        }
        let updates_db = query
            .load::<ProgressUpdateDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(updates_db.into_iter().map(ProgressUpdate::from).collect())
    }

    async fn insert_progress_update(&self, new_update: NewProgressUpdate) -> Result<ProgressUpdate> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ProgressUpdate> {
                let new_update_db = NewProgressUpdateDB {
                    id: new_update.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
                    goal_id: new_update.goal_id,
                    update_text: new_update.update_text,
                    progress_value: new_update.progress_value,
                    analysis: new_update.analysis,
                    created_at: Utc::now().naive_utc(),
                };

                let result_db = diesel::insert_into(progress_updates::table)
                    .values(&new_update_db)
                    .returning(ProgressUpdateDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(ProgressUpdate::from(result_db))
            })
            .await
    }
}
