//! IPA normalization and phoneme tokenization.
//!
//! Accepts dictionary transcriptions (`/ˈɡuːtn̩/`), recognizer output that is
//! already split into one symbol per token (`g u ː t ə n`), and multi-word
//! transcriptions. Multi-character symbols are matched greedily against the
//! feature table.

use crate::features::PhonemeFeatureTable;
use crate::types::Language;

const LENGTH_MARK: char = 'ː';
const LENGTH_MARK_STR: &str = "ː";
const SCHWA: char = 'ə';
const RHOTIC: char = 'ɹ';
const MAX_SYMBOL_CHARS: usize = 3;

const STRIPPED: &[char] = &[
    '/', '[', ']', // delimiters
    'ˈ', 'ˌ', // primary/secondary stress
    '.', '‿', // syllable break, linking
    '\u{0361}', '\u{035C}', // tie bars
    '\u{032F}', // non-syllabic
    'ˠ', '\u{0334}', // velarization
];

const SYLLABIC_MARKS: &[char] = &['\u{0329}', '\u{030D}'];
const RHOTIC_HOOK: char = '˞';

const VOWELS: &str = "iyɨʉɯuɪʏʊeøɘɵɤoəɛœɜɞʌɔæɐaɶɑɒ";

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Alternate glyphs mapped to the symbol the feature table uses.
fn canonical_glyph(c: char) -> char {
    match c {
        'ɡ' => 'g',
        ':' => LENGTH_MARK,
        other => other,
    }
}

/// Clean a raw IPA string: strip marks, expand syllabic consonants and
/// rhotic hooks on vowels, canonicalize glyphs and apply the language's
/// rewrites.
pub fn normalize(ipa: &str, language: Language) -> String {
    let mut out: Vec<char> = Vec::with_capacity(ipa.len());

    for c in ipa.chars() {
        if STRIPPED.contains(&c) {
            continue;
        }
        if SYLLABIC_MARKS.contains(&c) {
            // n̩ -> ən
            if let Some(&prev) = out.last() {
                if !prev.is_whitespace() && !is_vowel(prev) {
                    out.pop();
                    out.push(SCHWA);
                    out.push(prev);
                }
            }
            continue;
        }
        if c == RHOTIC_HOOK {
            // Only r-colored vowels carry an r; a stray hook is dropped.
            if out
                .last()
                .is_some_and(|&prev| is_vowel(prev) || prev == LENGTH_MARK)
            {
                out.push(RHOTIC);
            }
            continue;
        }
        out.push(canonical_glyph(c));
    }

    let cleaned: String = out.into_iter().collect();
    language.rules().apply_rewrites(cleaned.trim())
}

/// Tokenize a raw IPA string into phonemes.
///
/// Symbols missing from the table are kept as single-character tokens; the
/// distance engine treats them as maximally distant.
pub fn tokenize(ipa: &str, table: &PhonemeFeatureTable, language: Language) -> Vec<String> {
    let cleaned = normalize(ipa, language);
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let tokens = if words.len() > 1 && words.iter().all(|w| is_single_symbol(w)) {
        merge_length_marks(words.into_iter().map(str::to_string).collect())
    } else {
        words
            .into_iter()
            .flat_map(|word| greedy_tokenize(word, table))
            .collect()
    };

    expand_rhotic_ligatures(rewrite_tokens(tokens, language))
}

/// Apply the language's rewrites across token boundaries, so space-separated
/// recognizer output normalizes like a contiguous transcription.
fn rewrite_tokens(tokens: Vec<String>, language: Language) -> Vec<String> {
    language
        .rules()
        .rewrites
        .iter()
        .fold(tokens, |tokens, (from, to)| {
            let mut rewritten = Vec::with_capacity(tokens.len());
            let mut i = 0;
            while i < tokens.len() {
                match matching_span(&tokens[i..], from) {
                    Some(len) => {
                        rewritten.push(to.to_string());
                        i += len;
                    }
                    None => {
                        rewritten.push(tokens[i].clone());
                        i += 1;
                    }
                }
            }
            rewritten
        })
}

/// Number of leading tokens whose concatenation is exactly `pattern`.
fn matching_span(tokens: &[String], pattern: &str) -> Option<usize> {
    let mut joined = String::new();
    for (n, token) in tokens.iter().enumerate() {
        joined.push_str(token);
        if joined == pattern {
            return Some(n + 1);
        }
        if !pattern.starts_with(joined.as_str()) {
            return None;
        }
    }
    None
}

fn is_single_symbol(word: &str) -> bool {
    word == LENGTH_MARK_STR || word.chars().count() == 1
}

fn greedy_tokenize(word: &str, table: &PhonemeFeatureTable) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let matched = (2..=MAX_SYMBOL_CHARS)
            .rev()
            .filter(|len| i + len <= chars.len())
            .map(|len| chars[i..i + len].iter().collect::<String>())
            .find(|candidate| table.contains(candidate));

        match matched {
            Some(symbol) => {
                i += symbol.chars().count();
                tokens.push(symbol);
            }
            None => {
                tokens.push(chars[i].to_string());
                i += 1;
            }
        }
    }

    merge_length_marks(tokens)
}

/// Fold standalone length marks into the preceding token.
fn merge_length_marks(tokens: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token == LENGTH_MARK_STR {
            if let Some(prev) = merged.last_mut() {
                prev.push(LENGTH_MARK);
            }
            continue;
        }
        merged.push(token);
    }
    merged
}

fn expand_rhotic_ligatures(tokens: Vec<String>) -> Vec<String> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token.as_str() {
            "ɚ" => {
                expanded.push(SCHWA.to_string());
                expanded.push(RHOTIC.to_string());
            }
            "ɝ" => {
                expanded.push("ɜ".to_string());
                expanded.push(RHOTIC.to_string());
            }
            _ => expanded.push(token),
        }
    }
    expanded
}
