//! Per-language normalization and equivalence rules.
//!
//! New languages are added as data here, not as branches in the tokenizer or
//! distance engine.

use crate::types::Language;

/// Rule table for one study language.
#[derive(Debug)]
pub struct LanguageRules {
    /// Letter sequences rewritten, in order, before tokenization.
    pub rewrites: &'static [(&'static str, &'static str)],
    /// Groups of phonemes graded as interchangeable.
    pub equivalences: &'static [&'static [&'static str]],
}

static EN_GB: LanguageRules = LanguageRules {
    rewrites: &[],
    equivalences: &[&["ɹ", "r", "ɾ"], &["ɒ", "ɑ"], &["ʌ", "ɐ"], &["ɫ", "l"]],
};

// Vocalized r: recognizers hear "-er" endings as a bare ɐ.
static DE_DE: LanguageRules = LanguageRules {
    rewrites: &[("əʁ", "ɐ"), ("ɐʁ", "ɐ")],
    equivalences: &[&["ʁ", "r", "ʀ"], &["ç", "x"]],
};

static FR_FR: LanguageRules = LanguageRules {
    rewrites: &[],
    equivalences: &[&["ʁ", "r", "ʀ"], &["a", "ɑ"], &["ɛ̃", "œ̃"]],
};

impl Language {
    /// Normalization and equivalence rules for this study language.
    pub fn rules(self) -> &'static LanguageRules {
        match self {
            Self::EnGb => &EN_GB,
            Self::DeDe => &DE_DE,
            Self::FrFr => &FR_FR,
        }
    }
}

impl LanguageRules {
    /// Whether two distinct phonemes share an equivalence group.
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        self.equivalences
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
    }

    /// Apply every rewrite rule in order.
    pub fn apply_rewrites(&self, ipa: &str) -> String {
        self.rewrites
            .iter()
            .fold(ipa.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}
