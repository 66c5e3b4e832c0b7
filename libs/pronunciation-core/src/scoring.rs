//! Pronunciation grading: tokenize, align, map similarity to a tier.

use crate::distance::{calculate_distance, AlignedPair};
use crate::features::PhonemeFeatureTable;
use crate::tokenizer::tokenize;
use crate::types::Language;
use serde::{Deserialize, Serialize};

pub const EXCELLENT_THRESHOLD: f64 = 0.85;
pub const GOOD_THRESHOLD: f64 = 0.65;
pub const FAIR_THRESHOLD: f64 = 0.45;

/// Grade tiers, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeTier {
    TryAgain,
    Fair,
    Good,
    Excellent,
}

impl GradeTier {
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if similarity >= GOOD_THRESHOLD {
            Self::Good
        } else if similarity >= FAIR_THRESHOLD {
            Self::Fair
        } else {
            Self::TryAgain
        }
    }

    /// Localization key for the tier label.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::TryAgain => "try_again",
        }
    }

    /// Presentation hint (color class) for the tier.
    pub fn hint_key(self) -> &'static str {
        match self {
            Self::Excellent => "success",
            Self::Good => "info",
            Self::Fair => "warning",
            Self::TryAgain => "error",
        }
    }
}

/// Full grading outcome for one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub tier: GradeTier,
    pub similarity: f64,
    pub distance: f64,
    pub alignment: Vec<AlignedPair>,
    pub target_phonemes: Vec<String>,
    pub actual_phonemes: Vec<String>,
}

impl ScoreResult {
    /// Similarity as a 0-100 score.
    pub fn score(&self) -> f64 {
        (self.similarity * 100.0).round()
    }
}

/// Grade a spoken IPA string against one target transcription.
pub fn score_pronunciation(
    target_ipa: &str,
    actual_ipa: &str,
    table: &PhonemeFeatureTable,
    language: Language,
) -> ScoreResult {
    let target_phonemes = tokenize(target_ipa, table, language);
    let actual_phonemes = tokenize(actual_ipa, table, language);
    let result = calculate_distance(&target_phonemes, &actual_phonemes, table, language);

    ScoreResult {
        tier: GradeTier::from_similarity(result.similarity),
        similarity: result.similarity,
        distance: result.distance,
        alignment: result.alignment,
        target_phonemes,
        actual_phonemes,
    }
}

/// Grade against every accepted variant and keep the best match.
///
/// The first variant wins ties. With no variants the attempt is graded
/// against an empty target.
pub fn grade_best_variant<S: AsRef<str>>(
    variants: &[S],
    actual_ipa: &str,
    table: &PhonemeFeatureTable,
    language: Language,
) -> ScoreResult {
    let mut results = variants
        .iter()
        .map(|ipa| score_pronunciation(ipa.as_ref(), actual_ipa, table, language));

    let Some(first) = results.next() else {
        return score_pronunciation("", actual_ipa, table, language);
    };

    results.fold(first, |best, candidate| {
        if candidate.similarity > best.similarity {
            candidate
        } else {
            best
        }
    })
}
