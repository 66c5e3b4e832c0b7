//! Review priority for candidate phrases.

use super::days_between;
use crate::types::{Phrase, PhraseHistory};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

pub const UNSEEN_PRIORITY: f64 = 500.0;
pub const DUE_PRIORITY: f64 = 1000.0;
pub const OVERDUE_BONUS_PER_DAY: f64 = 10.0;
/// Cap so one long-neglected phrase cannot dominate forever.
pub const MAX_OVERDUE_BONUS: f64 = 500.0;
pub const UPCOMING_MAX_PRIORITY: f64 = 400.0;

/// A phrase with its scheduling priority for one call.
#[derive(Debug, Clone, Serialize)]
pub struct PhraseCandidate<'a> {
    pub phrase: &'a Phrase,
    pub priority: f64,
}

/// Priority of a phrase given its history (if any) at `now`.
///
/// - unseen: 500
/// - due or overdue: 1000 + min(overdue_days * 10, 500)
/// - not yet due: max(0, 1 - days_until_due / interval) * 400
///
/// Seen phrases are scaled by `1 + (100 - average_score) / 200`.
pub fn phrase_priority(history: Option<&PhraseHistory>, now: DateTime<Utc>) -> f64 {
    let Some(history) = history else {
        return UNSEEN_PRIORITY;
    };

    let urgency = if now >= history.next_review_date {
        let overdue_days = days_between(history.next_review_date, now);
        DUE_PRIORITY + (overdue_days * OVERDUE_BONUS_PER_DAY).min(MAX_OVERDUE_BONUS)
    } else {
        let days_until_due = days_between(now, history.next_review_date);
        let interval = history.interval_days.max(1.0);
        let progress = 1.0 - days_until_due / interval;
        progress.max(0.0) * UPCOMING_MAX_PRIORITY
    };

    urgency * difficulty_factor(history.average_score)
}

/// Multiplier in [1.0, 1.5]; poorly scored phrases become more urgent.
fn difficulty_factor(average_score: f64) -> f64 {
    1.0 + (100.0 - average_score.clamp(0.0, 100.0)) / 200.0
}

/// Prioritize candidates, highest first. Ties keep corpus order.
pub fn build_priority_queue<'a, I>(
    phrases: I,
    histories: &HashMap<String, PhraseHistory>,
    now: DateTime<Utc>,
) -> Vec<PhraseCandidate<'a>>
where
    I: IntoIterator<Item = &'a Phrase>,
{
    let mut candidates: Vec<PhraseCandidate<'a>> = phrases
        .into_iter()
        .map(|phrase| PhraseCandidate {
            phrase,
            priority: phrase_priority(histories.get(&phrase.text), now),
        })
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    candidates
}
