//! Phrase scheduling: level window, review priority, selection.
//!
//! Every function here is pure over its inputs. The current time and the
//! history snapshot are passed in on each call and nothing is cached, so a
//! call with a newer `now` or fresher history never sees stale priorities.

pub mod level_filter;
pub mod priority;
pub mod review;
pub mod selector;

pub use level_filter::filter_by_level;
pub use priority::{build_priority_queue, phrase_priority, PhraseCandidate};
pub use review::{record_review, ReviewSchedule};
pub use selector::{prefetch_phrases, select_next_phrase, SelectionRequest};

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Signed number of (fractional) days from `from` to `to`.
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}
