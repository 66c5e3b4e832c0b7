//! Test fixtures and factory functions for creating test data.

use std::collections::HashMap;

use serde_json::json;

use pronunciation_backend::catalog::Catalog;
use pronunciation_backend::models::{Language, Phrase};
use pronunciation_core::PhonemeFeatureTable;

/// German phrase with an English translation.
pub fn hallo() -> Phrase {
    let mut phrase = Phrase::new("Hallo", "/haˈloː/").with_level(10);
    phrase
        .translations
        .insert(Language::EnGb, "Hello".to_string());
    phrase
}

/// Three German phrases at levels 10, 20 and 30, one English phrase,
/// and no French corpus.
pub fn catalog() -> Catalog {
    let german = vec![
        hallo(),
        Phrase::new("Danke", "/ˈdaŋkə/").with_level(20),
        Phrase::new("Bitte", "/ˈbɪtə/").with_level(30),
    ];
    let english = vec![Phrase::new("Thank you", "/θæŋk juː/").with_level(10)];

    catalog_with(HashMap::from([
        (Language::DeDe, german),
        (Language::EnGb, english),
    ]))
}

/// Catalog over arbitrary corpora with the bundled feature table.
pub fn catalog_with(corpora: HashMap<Language, Vec<Phrase>>) -> Catalog {
    Catalog::new(PhonemeFeatureTable::bundled().unwrap(), corpora, None)
}

/// Create a grade request body.
pub fn grade_request(language: &str, target_ipa: &str, actual_ipa: &str) -> serde_json::Value {
    json!({
        "language": language,
        "target_ipa": target_ipa,
        "actual_ipa": actual_ipa,
    })
}

/// Create a submit attempt request body.
pub fn attempt_request(language: &str, phrase: &str, actual_ipa: &str) -> serde_json::Value {
    json!({
        "language": language,
        "phrase": phrase,
        "actual_ipa": actual_ipa,
    })
}

/// Create a next phrase request body.
pub fn next_request(language: &str, recent: &[&str]) -> serde_json::Value {
    json!({
        "language": language,
        "recent": recent,
    })
}
