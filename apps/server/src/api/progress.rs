use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use goaltracker_core::progress::{ProgressUpdate, RecordProgressRequest};

async fn get_progress_history(
    Path(goal_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProgressUpdate>>> {
    let history = state.progress_service.get_progress_history(&goal_id)?;
    Ok(Json(history))
}

/// Records a free-text update; progress and analysis come from the synthesizer.
async fn record_progress(
    Path(goal_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordProgressRequest>,
) -> ApiResult<(StatusCode, Json<ProgressUpdate>)> {
    let update = state
        .progress_service
        .record_progress(&goal_id, &request.update_text)
        .await?;
    Ok((StatusCode::CREATED, Json(update)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/goals/{id}/progress",
        get(get_progress_history).post(record_progress),
    )
}
