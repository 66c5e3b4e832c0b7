//! Pronunciation scoring and adaptive phrase scheduling.
//!
//! Provides:
//! - Phoneme feature table and IPA tokenizer
//! - Feature-weighted alignment distance and grade tiers
//! - Level-windowed, priority-based phrase selection
//! - Review history updates and user level adjustment
//!
//! Everything here is pure: the current time is always passed in, and the
//! feature table is an immutable value shared by reference.

pub mod distance;
pub mod error;
pub mod features;
pub mod level;
pub mod rules;
pub mod scheduling;
pub mod scoring;
pub mod tokenizer;
pub mod types;

pub use distance::{calculate_distance, phoneme_distance, AlignedPair, DistanceResult, INDEL_COST};
pub use error::{CoreError, Result};
pub use features::PhonemeFeatureTable;
pub use level::{adjust_user_level, difficulty_to_level, performance_level, DEFAULT_USER_LEVEL};
pub use rules::LanguageRules;
pub use scheduling::{
    build_priority_queue, filter_by_level, prefetch_phrases, record_review, select_next_phrase,
    PhraseCandidate, SelectionRequest,
};
pub use scoring::{grade_best_variant, score_pronunciation, GradeTier, ScoreResult};
pub use tokenizer::{normalize, tokenize};
pub use types::{clamp_level, index_histories, Language, Phrase, PhraseHistory, MAX_LEVEL, MIN_LEVEL};
