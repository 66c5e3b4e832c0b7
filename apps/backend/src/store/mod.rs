//! Persistence collaborator for review history and user levels.
//!
//! The engine only reads snapshots; every write goes through this trait.
//! [`crate::db::Database`] backs it with PostgreSQL, [`MemoryStore`] keeps
//! everything in process.

mod memory;

pub use memory::MemoryStore;

use std::future::Future;

use crate::error::Result;
use crate::models::{AttemptRecord, Language, PhraseHistory};

/// Async access to per-language progress.
pub trait ProgressStore: Clone + Send + Sync + 'static {
    /// Every phrase history recorded for a study language.
    fn get_all_phrase_histories(
        &self,
        language: Language,
    ) -> impl Future<Output = Result<Vec<PhraseHistory>>> + Send;

    /// Insert or replace the history of one phrase.
    fn save_phrase_history(
        &self,
        language: Language,
        history: &PhraseHistory,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Stored user level, if the user has one for this language.
    fn get_user_level(&self, language: Language) -> impl Future<Output = Result<Option<u32>>> + Send;

    fn save_user_level(&self, language: Language, level: u32) -> impl Future<Output = Result<()>> + Send;

    /// Append a graded attempt to the attempt log.
    fn record_attempt(&self, attempt: &AttemptRecord) -> impl Future<Output = Result<()>> + Send;
}
