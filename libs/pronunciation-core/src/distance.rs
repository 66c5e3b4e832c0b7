//! Feature-weighted phoneme alignment.
//!
//! Edit distance over phoneme sequences where a substitution costs the
//! fraction of differing articulatory features, and insertions/deletions cost
//! a flat [`INDEL_COST`]. Recognizers drop or add short sounds far more often
//! than they produce an unrelated phoneme, so indels are cheaper than the
//! worst substitution.

use crate::features::PhonemeFeatureTable;
use crate::types::Language;
use serde::{Deserialize, Serialize};

/// Cost of inserting or deleting one phoneme.
pub const INDEL_COST: f64 = 0.5;

/// Pair distance below which an aligned pair counts as a match.
pub const MATCH_THRESHOLD: f64 = 0.3;

/// Cost of substituting a phoneme missing from the feature table.
pub const UNKNOWN_COST: f64 = 1.0;

const EPSILON: f64 = 1e-9;

/// One step of an alignment. `None` marks an insertion or deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub target: Option<String>,
    pub actual: Option<String>,
    pub distance: f64,
    pub is_match: bool,
}

impl AlignedPair {
    fn new(target: Option<&String>, actual: Option<&String>, distance: f64) -> Self {
        Self {
            target: target.cloned(),
            actual: actual.cloned(),
            distance,
            is_match: distance < MATCH_THRESHOLD,
        }
    }
}

/// Outcome of aligning a target sequence against a spoken one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance: f64,
    /// `1 - distance / max_len`, clamped to [0, 1].
    pub similarity: f64,
    /// Left-to-right alignment steps.
    pub alignment: Vec<AlignedPair>,
}

/// Substitution cost between two phonemes, in [0, 1].
///
/// Every feature position counts, including positions where only one side is
/// specified; comparing jointly specified features alone equates clearly
/// distinct phonemes.
pub fn phoneme_distance(
    a: &str,
    b: &str,
    table: &PhonemeFeatureTable,
    language: Language,
) -> f64 {
    if a == b || language.rules().equivalent(a, b) {
        return 0.0;
    }

    match (table.get(a), table.get(b)) {
        (Some(va), Some(vb)) => {
            let differing = va.iter().zip(vb).filter(|(x, y)| x != y).count();
            differing as f64 / table.feature_count() as f64
        }
        _ => UNKNOWN_COST,
    }
}

/// Align `target` against `actual` and compute distance and similarity.
pub fn calculate_distance(
    target: &[String],
    actual: &[String],
    table: &PhonemeFeatureTable,
    language: Language,
) -> DistanceResult {
    let m = target.len();
    let n = actual.len();

    let mut dp = vec![vec![0.0_f64; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i as f64 * INDEL_COST;
    }
    for j in 0..=n {
        dp[0][j] = j as f64 * INDEL_COST;
    }

    for i in 1..=m {
        for j in 1..=n {
            let substitution = phoneme_distance(&target[i - 1], &actual[j - 1], table, language);
            dp[i][j] = (dp[i - 1][j] + INDEL_COST) // deletion
                .min(dp[i][j - 1] + INDEL_COST) // insertion
                .min(dp[i - 1][j - 1] + substitution);
        }
    }

    let distance = dp[m][n];
    let max_len = m.max(n);
    let similarity = if max_len == 0 {
        1.0
    } else {
        (1.0 - distance / max_len as f64).clamp(0.0, 1.0)
    };

    DistanceResult {
        distance,
        similarity,
        alignment: backtrack(&dp, target, actual, table, language),
    }
}

/// Walk the table back from (m, n), preferring the diagonal on ties.
fn backtrack(
    dp: &[Vec<f64>],
    target: &[String],
    actual: &[String],
    table: &PhonemeFeatureTable,
    language: Language,
) -> Vec<AlignedPair> {
    let mut steps = Vec::with_capacity(target.len().max(actual.len()));
    let (mut i, mut j) = (target.len(), actual.len());

    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let cost = phoneme_distance(&target[i - 1], &actual[j - 1], table, language);
            if (dp[i][j] - (dp[i - 1][j - 1] + cost)).abs() < EPSILON {
                steps.push(AlignedPair::new(Some(&target[i - 1]), Some(&actual[j - 1]), cost));
                i -= 1;
                j -= 1;
                continue;
            }
        }

        if i > 0 && (j == 0 || (dp[i][j] - (dp[i - 1][j] + INDEL_COST)).abs() < EPSILON) {
            steps.push(AlignedPair::new(Some(&target[i - 1]), None, INDEL_COST));
            i -= 1;
        } else {
            steps.push(AlignedPair::new(None, Some(&actual[j - 1]), INDEL_COST));
            j -= 1;
        }
    }

    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    fn table() -> PhonemeFeatureTable {
        PhonemeFeatureTable::bundled().unwrap()
    }

    fn seq(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn ipa_similarity(target: &str, actual: &str, table: &PhonemeFeatureTable) -> f64 {
        let lang = Language::EnGb;
        calculate_distance(
            &tokenize(target, table, lang),
            &tokenize(actual, table, lang),
            table,
            lang,
        )
        .similarity
    }

    #[test]
    fn identity_and_symmetry_over_table() {
        let table = table();
        let symbols: Vec<&str> = table.symbols().collect();
        for lang in Language::ALL {
            for a in &symbols {
                assert_eq!(phoneme_distance(a, a, &table, lang), 0.0);
                for b in &symbols {
                    let ab = phoneme_distance(a, b, &table, lang);
                    let ba = phoneme_distance(b, a, &table, lang);
                    assert_eq!(ab, ba, "{a} vs {b} in {lang}");
                    assert!((0.0..=1.0).contains(&ab));
                }
            }
        }
    }

    #[test]
    fn unknown_symbol_costs_maximum() {
        let table = table();
        assert_eq!(phoneme_distance("p", "ʘ", &table, Language::EnGb), UNKNOWN_COST);
        assert!(phoneme_distance("p", "ʘ", &table, Language::EnGb) > INDEL_COST);
    }

    #[test]
    fn equivalence_rules_zero_the_cost() {
        let table = table();
        assert_eq!(phoneme_distance("ç", "x", &table, Language::DeDe), 0.0);
        assert!(phoneme_distance("ç", "x", &table, Language::EnGb) > 0.0);
    }

    #[test]
    fn substitution_of_opposite_phoneme_costs_more_than_indel() {
        let table = PhonemeFeatureTable::from_entries(vec![
            ("p".to_string(), vec![1, 1, -1, 0]),
            ("q".to_string(), vec![-1, -1, 1, 1]),
        ])
        .unwrap();
        let cost = phoneme_distance("p", "q", &table, Language::EnGb);
        assert_eq!(cost, 1.0);
        assert!(cost > INDEL_COST);

        let result = calculate_distance(&seq(&["p"]), &seq(&["q"]), &table, Language::EnGb);
        assert_eq!(result.distance, 1.0);
        assert_eq!(result.alignment.len(), 1, "diagonal wins the tie with delete+insert");
    }

    #[test]
    fn empty_vs_empty_is_perfect() {
        let result = calculate_distance(&[], &[], &table(), Language::EnGb);
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.similarity, 1.0);
        assert!(result.alignment.is_empty());
    }

    #[test]
    fn empty_vs_nonempty_is_all_insertions() {
        let result = calculate_distance(&[], &seq(&["a", "b"]), &table(), Language::EnGb);
        assert_eq!(result.distance, 1.0);
        assert_eq!(result.similarity, 0.0);
        assert_eq!(result.alignment.len(), 2);
        assert!(result.alignment.iter().all(|p| p.target.is_none() && !p.is_match));
    }

    #[test]
    fn deletion_is_aligned_in_order() {
        let table = table();
        let result = calculate_distance(&seq(&["m", "a", "t"]), &seq(&["m", "t"]), &table, Language::EnGb);
        assert_eq!(result.distance, INDEL_COST);
        assert!((result.similarity - (1.0 - 0.5 / 3.0)).abs() < 1e-12);
        assert_eq!(
            result.alignment,
            vec![
                AlignedPair::new(Some(&"m".to_string()), Some(&"m".to_string()), 0.0),
                AlignedPair::new(Some(&"a".to_string()), None, INDEL_COST),
                AlignedPair::new(Some(&"t".to_string()), Some(&"t".to_string()), 0.0),
            ]
        );
    }

    #[test]
    fn near_phonemes_are_lenient_matches() {
        let table = table();
        let result = calculate_distance(&seq(&["ʁ"]), &seq(&["r"]), &table, Language::EnGb);
        assert!(result.alignment[0].distance > 0.0);
        assert!(result.alignment[0].is_match);

        let result = calculate_distance(&seq(&["a"]), &seq(&["p"]), &table, Language::EnGb);
        assert!(!result.alignment[0].is_match);
    }

    #[test]
    fn self_similarity_is_one() {
        let table = table();
        for ipa in ["/mʊnt/", "/ˈɡuːtn̩ ˈmɔʁɡn̩/", "t ʃ iː z", "bɔ̃ʒuʁ", "ʘʘ", ""] {
            assert_eq!(ipa_similarity(ipa, ipa, &table), 1.0, "{ipa}");
        }
    }

    #[test]
    fn near_miss_ranks_between_exact_and_disjoint() {
        let table = table();
        let exact = ipa_similarity("/mʊnt/", "mʊnt", &table);
        let near = ipa_similarity("/mʊnt/", "muːnt", &table);
        let disjoint = ipa_similarity("/mʊnt/", "ɑiɔe", &table);
        assert_eq!(exact, 1.0);
        assert!(near < exact);
        assert!(near > disjoint);
    }
}
