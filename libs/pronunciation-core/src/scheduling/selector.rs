//! Choose the next phrase to practise.

use super::level_filter::filter_by_level;
use super::priority::{build_priority_queue, PhraseCandidate};
use crate::types::{Phrase, PhraseHistory};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;

/// How many of the highest-priority candidates the random pick draws from.
pub const TOP_CANDIDATES: usize = 3;

/// Inputs for one scheduling call.
pub struct SelectionRequest<'a> {
    pub phrases: &'a [Phrase],
    pub user_level: u32,
    pub now: DateTime<Utc>,
    /// History snapshot keyed by phrase text; missing means never seen.
    pub histories: &'a HashMap<String, PhraseHistory>,
    /// Recently shown phrase texts, most recent last.
    pub recent: &'a [String],
    /// Keep only phrases with pre-generated audio, when set.
    pub has_audio: Option<&'a dyn Fn(&Phrase) -> bool>,
}

impl<'a> SelectionRequest<'a> {
    /// Level filter, audio filter, then priority ordering.
    fn ranked_candidates(&self) -> Vec<PhraseCandidate<'a>> {
        let mut pool = filter_by_level(self.phrases, self.user_level);
        if let Some(has_audio) = self.has_audio {
            pool.retain(|phrase| has_audio(*phrase));
        }
        build_priority_queue(pool, self.histories, self.now)
    }
}

/// Pick the next phrase, or `None` when no candidate exists at all.
///
/// Recently shown phrases are skipped unless that would leave nothing to
/// pick. The choice is uniform among the top [`TOP_CANDIDATES`].
pub fn select_next_phrase<'a, R>(request: &SelectionRequest<'a>, rng: &mut R) -> Option<&'a Phrase>
where
    R: Rng + ?Sized,
{
    let ranked = request.ranked_candidates();

    let fresh: Vec<&PhraseCandidate<'a>> = ranked
        .iter()
        .filter(|c| !request.recent.iter().any(|r| *r == c.phrase.text))
        .collect();
    let pool: Vec<&PhraseCandidate<'a>> = if fresh.is_empty() {
        ranked.iter().collect()
    } else {
        fresh
    };

    if pool.is_empty() {
        return None;
    }

    let top = pool.len().min(TOP_CANDIDATES);
    let chosen = pool[rng.gen_range(0..top)];
    tracing::debug!(
        phrase = %chosen.phrase.text,
        priority = chosen.priority,
        pool = pool.len(),
        "selected next phrase"
    );
    Some(chosen.phrase)
}

/// The first `count` phrase texts in priority order, without randomization
/// or recency filtering. Used to warm caches ahead of selection.
pub fn prefetch_phrases(request: &SelectionRequest<'_>, count: usize) -> Vec<String> {
    request
        .ranked_candidates()
        .into_iter()
        .take(count)
        .map(|c| c.phrase.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn due(phrase: &str, overdue_days: i64) -> PhraseHistory {
        PhraseHistory {
            phrase: phrase.to_string(),
            next_review_date: now() - Duration::days(overdue_days),
            interval_days: 3.0,
            average_score: 100.0,
            repetitions: 2,
        }
    }

    /// Five phrases with strictly decreasing priority: e, d, c, b, a.
    fn ranked_fixture() -> (Vec<Phrase>, HashMap<String, PhraseHistory>) {
        let phrases: Vec<Phrase> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|t| Phrase::new(*t, "a").with_level(100))
            .collect();
        let histories = [due("b", 0), due("c", 1), due("d", 2), due("e", 3)]
            .into_iter()
            .map(|h| (h.phrase.clone(), h))
            .collect();
        (phrases, histories)
    }

    fn request<'a>(
        phrases: &'a [Phrase],
        histories: &'a HashMap<String, PhraseHistory>,
        recent: &'a [String],
    ) -> SelectionRequest<'a> {
        SelectionRequest {
            phrases,
            user_level: 100,
            now: now(),
            histories,
            recent,
            has_audio: None,
        }
    }

    #[test]
    fn picks_only_from_top_three() {
        let (phrases, histories) = ranked_fixture();
        let req = request(&phrases, &histories, &[]);
        let mut rng = StdRng::seed_from_u64(7);

        let picked: HashSet<String> = (0..200)
            .filter_map(|_| select_next_phrase(&req, &mut rng))
            .map(|p| p.text.clone())
            .collect();
        let expected: HashSet<String> = ["e", "d", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(picked, expected);
    }

    #[test]
    fn recent_phrases_are_skipped() {
        let (phrases, histories) = ranked_fixture();
        let recent = vec!["e".to_string(), "d".to_string()];
        let req = request(&phrases, &histories, &recent);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let text = &select_next_phrase(&req, &mut rng).unwrap().text;
            assert!(["c", "b", "a"].contains(&text.as_str()), "picked {text}");
        }
    }

    #[test]
    fn single_phrase_returned_even_if_recent() {
        let phrases = vec![Phrase::new("only", "a")];
        let histories = HashMap::new();
        let recent = vec!["only".to_string()];
        let req = request(&phrases, &histories, &recent);
        let mut rng = StdRng::seed_from_u64(1);

        let picked = select_next_phrase(&req, &mut rng).unwrap();
        assert_eq!(picked.text, "only");
    }

    #[test]
    fn audio_predicate_filters_candidates() {
        let (phrases, histories) = ranked_fixture();
        let has_audio = |p: &Phrase| p.text == "a";
        let req = SelectionRequest {
            has_audio: Some(&has_audio),
            ..request(&phrases, &histories, &[])
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(select_next_phrase(&req, &mut rng).unwrap().text, "a");

        let none = |_: &Phrase| false;
        let req = SelectionRequest {
            has_audio: Some(&none),
            ..request(&phrases, &histories, &[])
        };
        assert!(select_next_phrase(&req, &mut rng).is_none());
    }

    #[test]
    fn empty_corpus_selects_nothing() {
        let histories = HashMap::new();
        let req = request(&[], &histories, &[]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(select_next_phrase(&req, &mut rng).is_none());
        assert!(prefetch_phrases(&req, 5).is_empty());
    }

    #[test]
    fn prefetch_is_deterministic_priority_order() {
        let (phrases, histories) = ranked_fixture();
        let recent = vec!["e".to_string()];
        let req = request(&phrases, &histories, &recent);
        assert_eq!(prefetch_phrases(&req, 3), vec!["e", "d", "c"]);
        assert_eq!(prefetch_phrases(&req, 3), prefetch_phrases(&req, 3));
        assert_eq!(prefetch_phrases(&req, 10).len(), 5);
    }

    #[test]
    fn level_window_applies_before_priority() {
        let phrases = vec![
            Phrase::new("easy", "a").with_level(10),
            Phrase::new("hard", "a").with_level(900),
        ];
        let histories = HashMap::new();
        let req = SelectionRequest {
            user_level: 880,
            ..request(&phrases, &histories, &[])
        };
        assert_eq!(prefetch_phrases(&req, 5), vec!["hard"]);
    }
}
