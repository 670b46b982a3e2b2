//! Tokenizer / Normalizer.
//!
//! Two tokenizations are used by the engine:
//! - [`count_terms`]: count-vectorizer style term counts for lexical overlap.
//! - [`normalize`]: lowercased, lemmatized, alphabetic-only token set for missing keywords.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::matching::stop_words::is_stop_word;

/// Two or more word characters, as a count vectorizer tokenizes.
static COUNT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Words the suffix rules would otherwise mangle.
const PROTECTED: &[&str] = &[
    "analytics", "atlas", "alias", "canvas", "devops", "dynamics", "economics", "electronics",
    "ethics", "graphics", "jenkins", "kubernetes", "logistics", "mathematics", "news", "pandas",
    "physics", "rails", "robotics", "series", "species", "statistics",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("began", "begin"),
    ("begun", "begin"),
    ("brought", "bring"),
    ("built", "build"),
    ("children", "child"),
    ("coded", "code"),
    ("coding", "code"),
    ("cookies", "cookie"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("driven", "drive"),
    ("drove", "drive"),
    ("focused", "focus"),
    ("focusing", "focus"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("held", "hold"),
    ("hypotheses", "hypothesis"),
    ("led", "lead"),
    ("men", "man"),
    ("met", "meet"),
    ("movies", "movie"),
    ("newbies", "newbie"),
    ("people", "person"),
    ("ran", "run"),
    ("rookies", "rookie"),
    ("saw", "see"),
    ("seen", "see"),
    ("selfies", "selfie"),
    ("shoes", "shoe"),
    ("sold", "sell"),
    ("spent", "spend"),
    ("taught", "teach"),
    ("thought", "think"),
    ("women", "woman"),
    ("won", "win"),
    ("writing", "write"),
    ("written", "write"),
    ("wrote", "write"),
    ("zombies", "zombie"),
];

/// Stem endings that drop a silent `e` when a verb suffix is added.
const SILENT_E_ENDINGS: &[&str] = &[
    "ac", "ag", "as", "at", "bl", "ir", "iv", "iz", "lv", "nc", "ov", "pl", "rc", "rg", "rv",
    "uc", "ul", "us", "ut", "yz",
];

/// Endings that take the silent `e` back only after a consonant:
/// "shar" -> "share" but "clear" stays "clear".
const CONSONANT_SILENT_E_ENDINGS: &[&str] = &["ar", "ur"];

/// A piece of text plus its normalized token set. Built fresh per analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    text: String,
    tokens: BTreeSet<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = normalize(&text);
        Self { text, tokens }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }
}

/// Lowercased term counts with English stop-words removed.
pub fn count_terms(text: &str) -> HashMap<String, u32> {
    let lowered = text.to_lowercase();
    let mut counts = HashMap::new();
    for token in COUNT_TOKEN.find_iter(&lowered).map(|m| m.as_str()) {
        if !is_stop_word(token) {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Lemmatized, lowercased set of alphabetic tokens, stop-words excluded.
///
/// Single-letter tokens are dropped along with stop-words.
pub fn normalize(text: &str) -> BTreeSet<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| token.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= 2 && !is_stop_word(token))
        .map(|token| lemmatize(&token))
        .filter(|lemma| !is_stop_word(lemma))
        .collect()
}

/// Rule-based English lemmatizer. Expects a lowercased word.
pub fn lemmatize(word: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return (*lemma).to_string();
    }
    if word.len() <= 3 || !word.is_ascii() || PROTECTED.contains(&word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("oes") {
        return format!("{stem}o");
    }
    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 2 && has_vowel(stem) {
            return restore_stem(stem);
        }
    }
    if !word.ends_with("eed") {
        if let Some(stem) = word.strip_suffix("ed") {
            if stem.len() >= 2 && has_vowel(stem) {
                return restore_stem(stem);
            }
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

fn has_vowel(stem: &str) -> bool {
    stem.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}

fn is_consonant(c: u8) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Undoes consonant doubling ("plann" -> "plan") or restores a dropped `e` ("creat" -> "create").
fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2
        && bytes[n - 1] == bytes[n - 2]
        && is_consonant(bytes[n - 1])
        && !matches!(bytes[n - 1], b'l' | b's' | b'z')
    {
        return stem[..n - 1].to_string();
    }
    if SILENT_E_ENDINGS.iter().any(|ending| stem.ends_with(ending)) && !stem.ends_with("air") {
        return format!("{stem}e");
    }
    if n >= 3
        && is_consonant(bytes[n - 3])
        && CONSONANT_SILENT_E_ENDINGS.iter().any(|ending| stem.ends_with(ending))
    {
        return format!("{stem}e");
    }
    stem.to_string()
}
