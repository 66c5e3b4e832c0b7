//! Phoneme feature table.
//!
//! Maps IPA symbols to ternary articulatory feature vectors (PanPhon layout:
//! `+` = 1, `-` = -1, `0` = 0). The table is built once and never mutated, so a
//! single instance can be shared behind an `Arc` by every caller.
//!
//! Two JSON layouts are accepted:
//! ```json
//! {"p": [-1, -1, 1, ...], "b": ["-", "-", "+", ...]}
//! {"phonemes": ["p", "b"], "features": "<base64 int8>", "featureCount": 24}
//! ```

use crate::error::{CoreError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::collections::HashMap;

const BUNDLED_TABLE: &str = include_str!("../data/phoneme_features.json");

/// Immutable lookup from phoneme symbol to feature vector.
#[derive(Debug, Clone)]
pub struct PhonemeFeatureTable {
    vectors: HashMap<String, Vec<i8>>,
    feature_count: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableFile {
    Compact {
        phonemes: Vec<String>,
        features: String,
        #[serde(rename = "featureCount")]
        feature_count: usize,
    },
    Map(HashMap<String, Vec<RawFeature>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeature {
    Int(i64),
    Text(String),
}

impl RawFeature {
    fn decode(&self, symbol: &str) -> Result<i8> {
        let value = match self {
            Self::Int(v @ -1..=1) => Some(*v as i8),
            Self::Int(_) => None,
            Self::Text(s) => match s.as_str() {
                "+" | "1" => Some(1),
                "-" | "-1" => Some(-1),
                "0" => Some(0),
                _ => None,
            },
        };
        value.ok_or_else(|| CoreError::InvalidFeatureValue {
            symbol: symbol.to_string(),
            value: match self {
                Self::Int(v) => v.to_string(),
                Self::Text(s) => s.clone(),
            },
        })
    }
}

impl PhonemeFeatureTable {
    /// The table compiled into the crate (24 features, en-GB/de-DE/fr-FR inventories).
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TABLE)
    }

    /// Parse either supported JSON layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        let table = match file {
            TableFile::Compact {
                phonemes,
                features,
                feature_count,
            } => Self::from_compact(phonemes, &features, feature_count)?,
            TableFile::Map(map) => {
                let entries = map
                    .into_iter()
                    .map(|(symbol, raw)| {
                        let vector = raw
                            .iter()
                            .map(|f| f.decode(&symbol))
                            .collect::<Result<Vec<_>>>()?;
                        Ok((symbol, vector))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::from_entries(entries)?
            }
        };

        tracing::debug!(
            phonemes = table.len(),
            features = table.feature_count,
            "loaded phoneme feature table"
        );
        Ok(table)
    }

    fn from_compact(phonemes: Vec<String>, encoded: &str, feature_count: usize) -> Result<Self> {
        let bytes = STANDARD.decode(encoded)?;
        let expected = phonemes.len() * feature_count;
        if bytes.len() != expected {
            return Err(CoreError::FeatureCountMismatch {
                expected,
                found: bytes.len(),
            });
        }
        if feature_count == 0 {
            return Err(CoreError::EmptyTable);
        }

        let entries = phonemes
            .into_iter()
            .zip(bytes.chunks(feature_count))
            .map(|(symbol, chunk)| {
                let vector = chunk
                    .iter()
                    .map(|&b| match b as i8 {
                        v @ -1..=1 => Ok(v),
                        v => Err(CoreError::InvalidFeatureValue {
                            symbol: symbol.clone(),
                            value: v.to_string(),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((symbol, vector))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_entries(entries)
    }

    /// Build a table from decoded vectors, checking that every vector has one shared length.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<i8>)>,
    {
        let mut vectors = HashMap::new();
        let mut feature_count = None;

        for (symbol, vector) in entries {
            if let Some(value) = vector.iter().find(|v| !(-1..=1).contains(*v)) {
                return Err(CoreError::InvalidFeatureValue {
                    symbol,
                    value: value.to_string(),
                });
            }
            let expected = *feature_count.get_or_insert(vector.len());
            if vector.len() != expected || expected == 0 {
                return Err(CoreError::LengthMismatch {
                    symbol,
                    expected,
                    found: vector.len(),
                });
            }
            vectors.insert(symbol, vector);
        }

        match feature_count {
            Some(feature_count) => Ok(Self {
                vectors,
                feature_count,
            }),
            None => Err(CoreError::EmptyTable),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&[i8]> {
        self.vectors.get(symbol).map(Vec::as_slice)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.vectors.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    /// Length shared by every feature vector.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
