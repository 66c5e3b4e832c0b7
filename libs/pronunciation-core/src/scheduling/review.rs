//! Phrase history update after a graded attempt.
//!
//! SM-2 style interval growth keyed on the grade tier instead of a
//! self-reported rating.

use crate::scoring::GradeTier;
use crate::types::PhraseHistory;
use chrono::{DateTime, Duration, Utc};

/// Interval parameters for review recording.
#[derive(Debug, Clone)]
pub struct ReviewSchedule {
    pub graduating_interval: f64,
    pub easy_interval: f64,
    pub lapse_interval: f64,
    pub ease_factor: f64,
    pub easy_bonus: f64,
    pub hard_multiplier: f64,
    /// Longest interval in days; keeps due dates representable.
    pub maximum_interval: f64,
}

impl Default for ReviewSchedule {
    fn default() -> Self {
        Self {
            graduating_interval: 1.0,
            easy_interval: 4.0,
            lapse_interval: 1.0,
            ease_factor: 2.5,
            easy_bonus: 1.3,
            hard_multiplier: 1.2,
            maximum_interval: 36500.0,
        }
    }
}

impl ReviewSchedule {
    /// New history after an attempt scoring `score` (0-100) in `tier`.
    pub fn record(
        &self,
        previous: Option<&PhraseHistory>,
        phrase: &str,
        score: f64,
        tier: GradeTier,
        now: DateTime<Utc>,
    ) -> PhraseHistory {
        let score = score.clamp(0.0, 100.0);

        let (interval, average_score, repetitions) = match previous {
            None => (self.first_interval(tier), score, 1),
            Some(prev) => {
                let reps = prev.repetitions as f64;
                let average = (prev.average_score * reps + score) / (reps + 1.0);
                (
                    self.next_interval(prev.interval_days, tier),
                    average,
                    prev.repetitions + 1,
                )
            }
        };

        let interval = interval.min(self.maximum_interval);
        let next_review_date = now
            .checked_add_signed(Duration::seconds((interval * 86400.0) as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        PhraseHistory {
            phrase: phrase.to_string(),
            next_review_date,
            interval_days: interval,
            average_score,
            repetitions,
        }
    }

    fn first_interval(&self, tier: GradeTier) -> f64 {
        match tier {
            GradeTier::Excellent => self.easy_interval,
            GradeTier::Good | GradeTier::Fair => self.graduating_interval,
            GradeTier::TryAgain => 0.0,
        }
    }

    fn next_interval(&self, interval: f64, tier: GradeTier) -> f64 {
        let next = match tier {
            // Lapse: start over
            GradeTier::TryAgain => self.lapse_interval,
            GradeTier::Fair => interval * self.hard_multiplier,
            GradeTier::Good => interval * self.ease_factor,
            GradeTier::Excellent => interval * self.ease_factor * self.easy_bonus,
        };
        next.max(1.0).min(self.maximum_interval)
    }
}

/// Record an attempt with the default schedule.
pub fn record_review(
    previous: Option<&PhraseHistory>,
    phrase: &str,
    score: f64,
    tier: GradeTier,
    now: DateTime<Utc>,
) -> PhraseHistory {
    ReviewSchedule::default().record(previous, phrase, score, tier, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn seen(interval: f64, average_score: f64, repetitions: u32) -> PhraseHistory {
        PhraseHistory {
            phrase: "Hallo".to_string(),
            next_review_date: now(),
            interval_days: interval,
            average_score,
            repetitions,
        }
    }

    #[test]
    fn first_excellent_attempt_gets_easy_interval() {
        let h = record_review(None, "Hallo", 92.0, GradeTier::Excellent, now());
        assert_eq!(h.interval_days, 4.0);
        assert_eq!(h.repetitions, 1);
        assert_eq!(h.average_score, 92.0);
        assert_eq!(h.next_review_date, now() + Duration::days(4));
    }

    #[test]
    fn first_failed_attempt_is_due_immediately() {
        let h = record_review(None, "Hallo", 20.0, GradeTier::TryAgain, now());
        assert_eq!(h.interval_days, 0.0);
        assert_eq!(h.next_review_date, now());
    }

    #[test]
    fn average_is_running_mean() {
        let h = record_review(Some(&seen(2.0, 80.0, 3)), "Hallo", 40.0, GradeTier::Fair, now());
        assert_eq!(h.repetitions, 4);
        assert_eq!(h.average_score, 70.0);
    }

    #[test]
    fn good_attempt_grows_interval() {
        let h = record_review(Some(&seen(2.0, 80.0, 3)), "Hallo", 70.0, GradeTier::Good, now());
        assert_eq!(h.interval_days, 5.0);
    }

    #[test]
    fn lapse_resets_interval() {
        let h = record_review(Some(&seen(30.0, 90.0, 8)), "Hallo", 10.0, GradeTier::TryAgain, now());
        assert_eq!(h.interval_days, 1.0);
    }

    #[test]
    fn interval_never_below_one_day_after_first_attempt() {
        let h = record_review(Some(&seen(0.0, 20.0, 1)), "Hallo", 50.0, GradeTier::Fair, now());
        assert_eq!(h.interval_days, 1.0);
    }

    #[test]
    fn interval_is_capped_over_long_excellent_streak() {
        let mut history = record_review(None, "Hallo", 100.0, GradeTier::Excellent, now());
        for _ in 0..40 {
            history = record_review(Some(&history), "Hallo", 100.0, GradeTier::Excellent, now());
        }
        assert_eq!(history.repetitions, 41);
        assert_eq!(history.interval_days, 36500.0);
        assert_eq!(history.next_review_date, now() + Duration::days(36500));
    }

    #[test]
    fn stored_oversized_interval_is_clamped() {
        let h = record_review(Some(&seen(1.0e9, 90.0, 20)), "Hallo", 80.0, GradeTier::Good, now());
        assert_eq!(h.interval_days, 36500.0);
    }
}
