//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::store::ProgressStore;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ProgressStore for Database {
    async fn get_all_phrase_histories(&self, language: Language) -> Result<Vec<PhraseHistory>> {
        let rows = sqlx::query_as::<_, DbPhraseHistory>(
            r#"
            SELECT phrase, next_review_date, interval_days, average_score, repetitions
            FROM phrase_histories
            WHERE language = $1
            ORDER BY phrase
            "#,
        )
        .bind(language.code())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DbPhraseHistory::into_core).collect())
    }

    async fn save_phrase_history(&self, language: Language, history: &PhraseHistory) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO phrase_histories
                (language, phrase, next_review_date, interval_days, average_score, repetitions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (language, phrase) DO UPDATE SET
                next_review_date = EXCLUDED.next_review_date,
                interval_days = EXCLUDED.interval_days,
                average_score = EXCLUDED.average_score,
                repetitions = EXCLUDED.repetitions,
                updated_at = NOW()
            "#,
        )
        .bind(language.code())
        .bind(&history.phrase)
        .bind(history.next_review_date)
        .bind(history.interval_days)
        .bind(history.average_score)
        .bind(history.repetitions as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user_level(&self, language: Language) -> Result<Option<u32>> {
        let level = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT level
            FROM user_levels
            WHERE language = $1
            "#,
        )
        .bind(language.code())
        .fetch_optional(&self.pool)
        .await?;

        Ok(level.map(|l| l.max(0) as u32))
    }

    async fn save_user_level(&self, language: Language, level: u32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_levels (language, level)
            VALUES ($1, $2)
            ON CONFLICT (language) DO UPDATE SET
                level = EXCLUDED.level,
                updated_at = NOW()
            "#,
        )
        .bind(language.code())
        .bind(level as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_attempt(&self, attempt: &AttemptRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attempts (id, language, phrase, actual_ipa, similarity, score, tier, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(attempt.id)
        .bind(attempt.language.code())
        .bind(&attempt.phrase)
        .bind(&attempt.actual_ipa)
        .bind(attempt.similarity)
        .bind(attempt.score)
        .bind(attempt.tier.label_key())
        .bind(attempt.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
