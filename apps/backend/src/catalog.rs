//! Read-only data loaded once at startup: feature table, phrase corpora and
//! the pre-generated audio index.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use pronunciation_core::{difficulty_to_level, PhonemeFeatureTable};

use crate::config::Config;
use crate::models::{Language, Phrase};

/// Immutable catalog shared by all requests.
#[derive(Debug)]
pub struct Catalog {
    features: PhonemeFeatureTable,
    corpora: HashMap<Language, Vec<Phrase>>,
    audio: Option<HashMap<Language, HashSet<String>>>,
}

impl Catalog {
    /// Build a catalog, deriving levels for phrases that only carry a
    /// difficulty score.
    pub fn new(
        features: PhonemeFeatureTable,
        mut corpora: HashMap<Language, Vec<Phrase>>,
        audio: Option<HashMap<Language, HashSet<String>>>,
    ) -> Self {
        for (language, phrases) in corpora.iter_mut() {
            for phrase in phrases.iter_mut() {
                if phrase.level.is_none() {
                    phrase.level = phrase.difficulty.map(|d| difficulty_to_level(d, *language));
                }
            }
        }

        Self {
            features,
            corpora,
            audio,
        }
    }

    /// Load everything named by the configuration.
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let features = match &config.features_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading feature table {}", path.display()))?;
                PhonemeFeatureTable::from_json(&json)?
            }
            None => PhonemeFeatureTable::bundled()?,
        };
        tracing::info!(phonemes = features.len(), "Loaded phoneme feature table");

        let mut corpora = HashMap::new();
        for language in Language::ALL {
            let phrases = load_corpus(&config.phrases_dir, language)?;
            tracing::info!(%language, phrases = phrases.len(), "Loaded phrase corpus");
            corpora.insert(language, phrases);
        }

        let audio = config
            .audio_manifest
            .as_deref()
            .map(load_audio_manifest)
            .transpose()?;

        Ok(Self::new(features, corpora, audio))
    }

    pub fn features(&self) -> &PhonemeFeatureTable {
        &self.features
    }

    /// Corpus for a study language (empty when none was loaded).
    pub fn phrases(&self, language: Language) -> &[Phrase] {
        self.corpora
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_phrase(&self, language: Language, text: &str) -> Option<&Phrase> {
        self.phrases(language).iter().find(|p| p.text == text)
    }

    /// Whether selection should be limited to phrases with audio.
    pub fn filters_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn has_audio(&self, language: Language, text: &str) -> bool {
        match &self.audio {
            Some(index) => index.get(&language).is_some_and(|set| set.contains(text)),
            None => true,
        }
    }
}

/// Read `phrases-<lang>.json`; a missing file yields an empty corpus.
fn load_corpus(dir: &Path, language: Language) -> anyhow::Result<Vec<Phrase>> {
    let path = dir.join(format!("phrases-{}.json", language.code()));
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Phrase corpus not found, using empty corpus");
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading phrase corpus {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing phrase corpus {}", path.display()))
}

fn load_audio_manifest(path: &Path) -> anyhow::Result<HashMap<Language, HashSet<String>>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading audio manifest {}", path.display()))?;
    let manifest: HashMap<Language, Vec<String>> = serde_json::from_str(&json)
        .with_context(|| format!("parsing audio manifest {}", path.display()))?;

    Ok(manifest
        .into_iter()
        .map(|(language, phrases)| (language, phrases.into_iter().collect()))
        .collect())
}
