//! Core types shared by the grading and scheduling pipelines.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Lowest assignable user or phrase level.
pub const MIN_LEVEL: u32 = 1;
/// Highest assignable user or phrase level.
pub const MAX_LEVEL: u32 = 1000;

/// Supported study and UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
}

impl Language {
    /// Every supported language, in a stable order.
    pub const ALL: [Language; 3] = [Self::EnGb, Self::DeDe, Self::FrFr];

    /// BCP-47 tag for the language.
    pub fn code(self) -> &'static str {
        match self {
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownLanguage(s.to_string()))
    }
}

/// A practice phrase from the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    /// Text in the study language; also the phrase's identity.
    #[serde(alias = "phrase")]
    pub text: String,
    /// Accepted IPA transcriptions, preferred variant first.
    #[serde(default)]
    pub ipas: Vec<String>,
    /// Display text per UI language.
    #[serde(default)]
    pub translations: HashMap<Language, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Raw difficulty score, used to derive `level` when none is assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

impl Phrase {
    /// Create a phrase with a single IPA variant and no metadata.
    pub fn new(text: impl Into<String>, ipa: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ipas: vec![ipa.into()],
            translations: HashMap::new(),
            level: None,
            difficulty: None,
        }
    }

    /// Builder-style level assignment.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Display text for a UI language, falling back to the phrase itself.
    pub fn translation(&self, language: Language) -> &str {
        self.translations
            .get(&language)
            .map(String::as_str)
            .unwrap_or(&self.text)
    }
}

/// Review history of one phrase in one study language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseHistory {
    pub phrase: String,
    pub next_review_date: DateTime<Utc>,
    /// Days between the last review and `next_review_date`.
    pub interval_days: f64,
    /// Running mean of attempt scores, 0-100.
    pub average_score: f64,
    pub repetitions: u32,
}

/// Index a history snapshot by phrase text.
pub fn index_histories(histories: Vec<PhraseHistory>) -> HashMap<String, PhraseHistory> {
    histories
        .into_iter()
        .map(|h| (h.phrase.clone(), h))
        .collect()
}

/// Clamp any integer into the valid level range.
pub fn clamp_level(level: i64) -> u32 {
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_round_trips_tag() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("de-de".parse::<Language>().unwrap(), Language::DeDe);
    }

    #[test]
    fn unknown_language_is_error() {
        let err = "xx-YY".parse::<Language>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownLanguage(tag) if tag == "xx-YY"));
    }

    #[test]
    fn language_serializes_as_tag() {
        let json = serde_json::to_string(&Language::FrFr).unwrap();
        assert_eq!(json, "\"fr-FR\"");
    }

    #[test]
    fn phrase_deserializes_with_alias_and_defaults() {
        let json = r#"{"phrase": "Guten Morgen", "ipas": ["/ˈɡuːtn̩ ˈmɔʁɡn̩/"], "translations": {"en-GB": "Good morning"}}"#;
        let phrase: Phrase = serde_json::from_str(json).unwrap();
        assert_eq!(phrase.text, "Guten Morgen");
        assert_eq!(phrase.level, None);
        assert_eq!(phrase.translation(Language::EnGb), "Good morning");
        assert_eq!(phrase.translation(Language::FrFr), "Guten Morgen");
    }

    #[test]
    fn clamp_level_bounds() {
        assert_eq!(clamp_level(-5), MIN_LEVEL);
        assert_eq!(clamp_level(5000), MAX_LEVEL);
        assert_eq!(clamp_level(420), 420);
    }
}
