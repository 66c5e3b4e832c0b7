//! Phrase selection endpoints

use std::collections::HashMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use pronunciation_core::{index_histories, prefetch_phrases, select_next_phrase, SelectionRequest};

use crate::catalog::Catalog;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::level::current_level;
use crate::store::ProgressStore;
use crate::AppState;

/// Upper bound on phrases returned by one prefetch call.
pub const MAX_PREFETCH: usize = 50;

/// Everything a selection call reads, gathered up front.
struct Snapshot<'a> {
    catalog: &'a Catalog,
    language: Language,
    user_level: u32,
    histories: HashMap<String, PhraseHistory>,
    now: DateTime<Utc>,
}

impl Snapshot<'_> {
    fn with_request<T>(
        &self,
        recent: &[String],
        f: impl FnOnce(&SelectionRequest<'_>) -> T,
    ) -> T {
        let catalog = self.catalog;
        let language = self.language;
        let has_audio = |phrase: &Phrase| catalog.has_audio(language, &phrase.text);

        let request = SelectionRequest {
            phrases: catalog.phrases(language),
            user_level: self.user_level,
            now: self.now,
            histories: &self.histories,
            recent,
            has_audio: catalog
                .filters_audio()
                .then_some(&has_audio as &dyn Fn(&Phrase) -> bool),
        };
        f(&request)
    }
}

async fn snapshot<'a, S: ProgressStore>(
    state: &'a AppState<S>,
    language: Language,
) -> Result<Snapshot<'a>> {
    let histories = state.store.get_all_phrase_histories(language).await?;
    let user_level = current_level(&state.store, language).await?;

    Ok(Snapshot {
        catalog: &state.catalog,
        language,
        user_level,
        histories: index_histories(histories),
        now: Utc::now(),
    })
}

/// POST /api/study/next
pub async fn next<S: ProgressStore>(
    State(state): State<AppState<S>>,
    Json(payload): Json<NextPhraseRequest>,
) -> Result<Json<NextPhraseResponse>> {
    let snapshot = snapshot(&state, payload.language).await?;

    let phrase = snapshot
        .with_request(&payload.recent, |request| {
            select_next_phrase(request, &mut rand::thread_rng()).cloned()
        })
        .ok_or_else(|| {
            ApiError::NotFound(format!("No phrases available for {}", payload.language))
        })?;

    let display_language = payload.ui_language.unwrap_or(payload.language);
    let display_text = phrase.translation(display_language).to_string();

    Ok(Json(NextPhraseResponse {
        display_text,
        user_level: snapshot.user_level,
        phrase,
    }))
}

/// POST /api/study/prefetch
pub async fn prefetch<S: ProgressStore>(
    State(state): State<AppState<S>>,
    Json(payload): Json<PrefetchRequest>,
) -> Result<Json<PrefetchResponse>> {
    if payload.count > MAX_PREFETCH {
        return Err(ApiError::BadRequest(format!(
            "count must be at most {MAX_PREFETCH}"
        )));
    }

    let snapshot = snapshot(&state, payload.language).await?;
    let phrases = snapshot.with_request(&[], |request| prefetch_phrases(request, payload.count));

    Ok(Json(PrefetchResponse { phrases }))
}
