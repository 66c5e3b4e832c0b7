//! User level endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use pronunciation_core::{clamp_level, DEFAULT_USER_LEVEL};

use crate::error::Result;
use crate::models::*;
use crate::store::ProgressStore;
use crate::AppState;

/// Stored level for a language, or the default for new users.
pub(crate) async fn current_level<S: ProgressStore>(store: &S, language: Language) -> Result<u32> {
    Ok(store
        .get_user_level(language)
        .await?
        .unwrap_or(DEFAULT_USER_LEVEL))
}

/// GET /api/level?language=
pub async fn get<S: ProgressStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<LevelQuery>,
) -> Result<Json<LevelResponse>> {
    let level = current_level(&state.store, query.language).await?;

    Ok(Json(LevelResponse {
        language: query.language,
        level,
    }))
}

/// PUT /api/level
pub async fn set<S: ProgressStore>(
    State(state): State<AppState<S>>,
    Json(payload): Json<SetLevelRequest>,
) -> Result<Json<LevelResponse>> {
    let level = clamp_level(payload.level);
    state.store.save_user_level(payload.language, level).await?;

    tracing::info!(language = %payload.language, level, "user level set");

    Ok(Json(LevelResponse {
        language: payload.language,
        level,
    }))
}
