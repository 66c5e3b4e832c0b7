//! In-process progress store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ProgressStore;
use crate::error::Result;
use crate::models::{AttemptRecord, Language, PhraseHistory};

#[derive(Debug, Default)]
struct MemoryState {
    histories: HashMap<Language, HashMap<String, PhraseHistory>>,
    levels: HashMap<Language, u32>,
    attempts: Vec<AttemptRecord>,
}

/// Progress store kept entirely in memory. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attempt recorded so far, oldest first.
    pub async fn attempts(&self) -> Vec<AttemptRecord> {
        self.state.read().await.attempts.clone()
    }
}

impl ProgressStore for MemoryStore {
    async fn get_all_phrase_histories(&self, language: Language) -> Result<Vec<PhraseHistory>> {
        let state = self.state.read().await;
        let mut histories: Vec<PhraseHistory> = state
            .histories
            .get(&language)
            .map(|by_phrase| by_phrase.values().cloned().collect())
            .unwrap_or_default();
        histories.sort_by(|a, b| a.phrase.cmp(&b.phrase));
        Ok(histories)
    }

    async fn save_phrase_history(&self, language: Language, history: &PhraseHistory) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .histories
            .entry(language)
            .or_default()
            .insert(history.phrase.clone(), history.clone());
        Ok(())
    }

    async fn get_user_level(&self, language: Language) -> Result<Option<u32>> {
        Ok(self.state.read().await.levels.get(&language).copied())
    }

    async fn save_user_level(&self, language: Language, level: u32) -> Result<()> {
        self.state.write().await.levels.insert(language, level);
        Ok(())
    }

    async fn record_attempt(&self, attempt: &AttemptRecord) -> Result<()> {
        self.state.write().await.attempts.push(attempt.clone());
        Ok(())
    }
}
