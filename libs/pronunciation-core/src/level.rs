//! User level tracking.
//!
//! The user's manually chosen level drifts toward the level they actually
//! perform at. Persisting the result is the caller's job.

use crate::types::{clamp_level, Language, Phrase, PhraseHistory, MAX_LEVEL, MIN_LEVEL};
use std::collections::HashMap;

/// Level for a user with no stored level.
pub const DEFAULT_USER_LEVEL: u32 = MIN_LEVEL;

/// Average score at which a phrase counts toward the performance level.
pub const MASTERY_SCORE: f64 = 80.0;

const STRUGGLE_SCORE: f64 = 60.0;
const EXCEL_SCORE: f64 = 95.0;
const DECREASE_RATE: f64 = 0.05;
const INCREASE_RATE: f64 = 0.03;
const DECAY_RATE: f64 = 0.01;
const DECAY_DEADBAND: i64 = 5;

/// Nudge `current` toward `actual` after an attempt scoring `score` (0-100).
///
/// First matching rule wins:
/// 1. above actual and struggling (< 60): step down 5% of the gap
/// 2. below actual and excelling (>= 95): step up 3% of the gap
/// 3. gap wider than 5: decay 1% of the gap toward actual
/// 4. otherwise unchanged
///
/// Steps 1 and 2 never cross `actual`.
pub fn adjust_user_level(current: u32, actual: u32, score: f64) -> u32 {
    let current_i = current as i64;
    let actual_i = actual as i64;
    let offset = current_i - actual_i;
    let gap = offset.abs();

    let adjusted = if offset > 0 && score < STRUGGLE_SCORE {
        (current_i - step(gap, DECREASE_RATE)).max(actual_i)
    } else if offset < 0 && score >= EXCEL_SCORE {
        (current_i + step(gap, INCREASE_RATE)).min(actual_i)
    } else if gap > DECAY_DEADBAND {
        current_i - offset.signum() * step(gap, DECAY_RATE)
    } else {
        current_i
    };

    clamp_level(adjusted)
}

fn step(gap: i64, rate: f64) -> i64 {
    (gap as f64 * rate).ceil() as i64
}

/// Mean level of the phrases the user has mastered, if any.
///
/// Only phrases with a level and an average score of at least
/// [`MASTERY_SCORE`] count.
pub fn performance_level(
    phrases: &[Phrase],
    histories: &HashMap<String, PhraseHistory>,
) -> Option<u32> {
    let mastered: Vec<u32> = phrases
        .iter()
        .filter_map(|phrase| {
            let level = phrase.level?;
            let history = histories.get(&phrase.text)?;
            (history.average_score >= MASTERY_SCORE).then_some(level)
        })
        .collect();

    if mastered.is_empty() {
        return None;
    }
    let mean = mastered.iter().map(|&l| l as f64).sum::<f64>() / mastered.len() as f64;
    Some(clamp_level(mean.round() as i64))
}

/// Raw difficulty score range observed for each language's corpus.
fn difficulty_range(language: Language) -> (f64, f64) {
    match language {
        Language::EnGb => (16.8, 48.3),
        Language::DeDe => (22.8, 66.0),
        Language::FrFr => (41.7, 66.4),
    }
}

/// Map a raw difficulty score linearly onto levels 1-1000.
pub fn difficulty_to_level(score: f64, language: Language) -> u32 {
    let (min, max) = difficulty_range(language);
    let normalized = (score - min) / (max - min);
    let level = (normalized * (MAX_LEVEL - MIN_LEVEL) as f64).round() as i64 + MIN_LEVEL as i64;
    clamp_level(level)
}
