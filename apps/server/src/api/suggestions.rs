use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

async fn get_suggestions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SuggestionsResponse>> {
    let summaries = state.goal_service.get_goal_summaries()?;
    let suggestions = state
        .suggestion_generator
        .generate_suggestions(&summaries)
        .await;
    Ok(Json(SuggestionsResponse { suggestions }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/suggestions", get(get_suggestions))
}
