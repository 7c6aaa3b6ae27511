use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: usize,
    pub source: String,
}

/// Unfiltered number of tournament rows. A failed count reads as zero.
pub async fn count_tournaments(State(state): State<AppState>) -> Json<CountResponse> {
    let total = state.engine.total_tournaments().await;
    Json(CountResponse {
        total,
        source: state.engine.source_name().to_string(),
    })
}
