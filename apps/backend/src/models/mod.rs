//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from pronunciation-core
pub use pronunciation_core::{GradeTier, Language, Phrase, PhraseHistory, ScoreResult};

// === Database Entity Types ===

/// Phrase history row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbPhraseHistory {
    pub phrase: String,
    pub next_review_date: DateTime<Utc>,
    pub interval_days: f64,
    pub average_score: f64,
    pub repetitions: i32,
}

impl DbPhraseHistory {
    /// Convert to pronunciation-core PhraseHistory
    pub fn into_core(self) -> PhraseHistory {
        PhraseHistory {
            phrase: self.phrase,
            next_review_date: self.next_review_date,
            interval_days: self.interval_days,
            average_score: self.average_score,
            repetitions: self.repetitions.max(0) as u32,
        }
    }
}

/// One graded attempt, appended to the attempt log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub language: Language,
    pub phrase: String,
    pub actual_ipa: String,
    pub similarity: f64,
    pub score: f64,
    pub tier: GradeTier,
    pub created_at: DateTime<Utc>,
}

// === API Request/Response Types ===

/// Request for POST /api/grade
#[derive(Debug, Clone, Deserialize)]
pub struct GradeRequest {
    pub language: Language,
    pub target_ipa: String,
    pub actual_ipa: String,
}

/// Grading outcome with presentation keys for the client.
#[derive(Debug, Clone, Serialize)]
pub struct GradeResponse {
    #[serde(flatten)]
    pub result: ScoreResult,
    /// Similarity as 0-100.
    pub score: f64,
    pub label_key: &'static str,
    pub hint_key: &'static str,
}

impl From<ScoreResult> for GradeResponse {
    fn from(result: ScoreResult) -> Self {
        Self {
            score: result.score(),
            label_key: result.tier.label_key(),
            hint_key: result.tier.hint_key(),
            result,
        }
    }
}

/// Request for POST /api/study/next
#[derive(Debug, Clone, Deserialize)]
pub struct NextPhraseRequest {
    pub language: Language,
    /// Language for the display text; defaults to the study language.
    #[serde(default)]
    pub ui_language: Option<Language>,
    /// Recently shown phrase texts, most recent last.
    #[serde(default)]
    pub recent: Vec<String>,
}

/// Response for POST /api/study/next
#[derive(Debug, Clone, Serialize)]
pub struct NextPhraseResponse {
    pub phrase: Phrase,
    pub display_text: String,
    pub user_level: u32,
}

fn default_prefetch_count() -> usize {
    5
}

/// Request for POST /api/study/prefetch
#[derive(Debug, Clone, Deserialize)]
pub struct PrefetchRequest {
    pub language: Language,
    #[serde(default = "default_prefetch_count")]
    pub count: usize,
}

/// Response for POST /api/study/prefetch
#[derive(Debug, Clone, Serialize)]
pub struct PrefetchResponse {
    pub phrases: Vec<String>,
}

/// Query for GET /api/level
#[derive(Debug, Clone, Deserialize)]
pub struct LevelQuery {
    pub language: Language,
}

/// Request for PUT /api/level
#[derive(Debug, Clone, Deserialize)]
pub struct SetLevelRequest {
    pub language: Language,
    pub level: i64,
}

/// Response for level endpoints
#[derive(Debug, Clone, Serialize)]
pub struct LevelResponse {
    pub language: Language,
    pub level: u32,
}

/// Request for POST /api/attempts
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    pub language: Language,
    pub phrase: String,
    pub actual_ipa: String,
}

/// Level movement caused by an attempt.
#[derive(Debug, Clone, Serialize)]
pub struct LevelChange {
    pub previous: u32,
    pub current: u32,
    /// Measured performance level, if the user has mastered any leveled phrase.
    pub performance: Option<u32>,
}

/// Response for POST /api/attempts
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAttemptResponse {
    pub result: GradeResponse,
    pub history: PhraseHistory,
    pub level: LevelChange,
}
