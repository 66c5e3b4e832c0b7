//! Stateless grading endpoint

use axum::{extract::State, Json};
use pronunciation_core::score_pronunciation;

use crate::error::Result;
use crate::models::*;
use crate::store::ProgressStore;
use crate::AppState;

/// POST /api/grade
pub async fn grade<S: ProgressStore>(
    State(state): State<AppState<S>>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<GradeResponse>> {
    let result = score_pronunciation(
        &payload.target_ipa,
        &payload.actual_ipa,
        state.catalog.features(),
        payload.language,
    );

    tracing::debug!(
        language = %payload.language,
        similarity = result.similarity,
        "graded pronunciation"
    );

    Ok(Json(result.into()))
}
