//! Attempt submission: grade, update history, adjust level, log.

use axum::{extract::State, Json};
use chrono::Utc;
use pronunciation_core::{
    adjust_user_level, grade_best_variant, index_histories, performance_level, record_review,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::level::current_level;
use crate::store::ProgressStore;
use crate::AppState;

/// POST /api/attempts
pub async fn submit<S: ProgressStore>(
    State(state): State<AppState<S>>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<Json<SubmitAttemptResponse>> {
    let language = payload.language;
    let phrase = state
        .catalog
        .find_phrase(language, &payload.phrase)
        .ok_or_else(|| ApiError::NotFound(format!("Phrase not found: {}", payload.phrase)))?;

    let result = grade_best_variant(
        &phrase.ipas,
        &payload.actual_ipa,
        state.catalog.features(),
        language,
    );
    let score = result.score();
    let now = Utc::now();

    // Update review history
    let mut histories = index_histories(state.store.get_all_phrase_histories(language).await?);
    let history = record_review(
        histories.get(&phrase.text),
        &phrase.text,
        score,
        result.tier,
        now,
    );
    state.store.save_phrase_history(language, &history).await?;
    histories.insert(history.phrase.clone(), history.clone());

    // Drift the user level toward measured performance
    let previous = current_level(&state.store, language).await?;
    let performance = performance_level(state.catalog.phrases(language), &histories);
    let current = adjust_user_level(previous, performance.unwrap_or(previous), score);
    if current != previous {
        state.store.save_user_level(language, current).await?;
        tracing::info!(%language, previous, current, "user level adjusted");
    }

    state
        .store
        .record_attempt(&AttemptRecord {
            id: Uuid::new_v4(),
            language,
            phrase: phrase.text.clone(),
            actual_ipa: payload.actual_ipa.clone(),
            similarity: result.similarity,
            score,
            tier: result.tier,
            created_at: now,
        })
        .await?;

    Ok(Json(SubmitAttemptResponse {
        result: result.into(),
        history,
        level: LevelChange {
            previous,
            current,
            performance,
        },
    }))
}
