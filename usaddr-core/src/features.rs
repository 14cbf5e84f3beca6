//! # Feature Schema for Address Tokens
//!
//! For each token, emits the feature names the pretrained CRF was trained on.
//! The tagging engine looks features up by exact string, so every name below
//! is part of the model's vocabulary and must not change.
//!
//! ## Features
//!
//! ### Current token
//! | Feature | Fires when |
//! |---------|------------|
//! | `word=<normalized>` | normalized form is non-empty |
//! | `word.isupper` | stripped form is all uppercase letters |
//! | `word.istitle` | stripped form starts with an uppercase letter |
//! | `word.hasdigit` | stripped form contains a digit |
//! | `word.isdigit` | normalized form is all digits |
//! | `word.isdirection` | normalized form is a compass direction |
//!
//! ### Context
//! | Feature | Fires when |
//! |---------|------------|
//! | `prev_word=<normalized>` | previous token has a non-empty normalized form |
//! | `BOS` | first token |
//! | `next_word=<normalized>` | next token has a non-empty normalized form |
//! | `EOS` | last token |
//!
//! "Stripped" and "normalized" are defined in [`crate::normalize`].

use serde::Serialize;

use crate::normalize::{normalize, strip};
use crate::tokenizer::Token;

/// Compass directions recognized by `word.isdirection`.
const DIRECTIONS: &[&str] = &[
    "N", "S", "E", "W", "NE", "NW", "SE", "SW", "NORTH", "SOUTH", "EAST", "WEST",
];

pub const FEATURE_IS_UPPER: &str = "word.isupper";
pub const FEATURE_IS_TITLE: &str = "word.istitle";
pub const FEATURE_HAS_DIGIT: &str = "word.hasdigit";
pub const FEATURE_IS_DIGIT: &str = "word.isdigit";
pub const FEATURE_IS_DIRECTION: &str = "word.isdirection";
pub const FEATURE_BOS: &str = "BOS";
pub const FEATURE_EOS: &str = "EOS";

/// Ordered feature names active for one token.
///
/// Append-only. Built by [`generate`] and moved into the tagging adapter,
/// which consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    pub fn new() -> Self {
        Self(Vec::with_capacity(8))
    }

    /// Appends a feature name.
    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug_assert!(!self.contains(&name), "duplicate feature {name}");
        self.0.push(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl IntoIterator for FeatureSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// True when the normalized form names a compass direction.
pub fn is_direction(normalized: &str) -> bool {
    DIRECTIONS.iter().any(|d| d.eq_ignore_ascii_case(normalized))
}

/// Generates the feature set for `token` given its neighbors.
///
/// Total and deterministic: identical arguments always yield identical sets.
///
/// # Example
/// For "Main" at the start of "Main St":
/// - `word=main`
/// - `word.istitle`
/// - `BOS`
/// - `next_word=st`
pub fn generate(token: &Token, prev: Option<&Token>, next: Option<&Token>) -> FeatureSet {
    let mut fs = FeatureSet::new();
    let norm = normalize(&token.text);
    let clean = strip(&token.text);

    // === Current token ===
    if !norm.is_empty() {
        fs.push(format!("word={norm}"));
    }

    if !clean.is_empty() {
        if clean.chars().all(|c| c.is_ascii_uppercase()) {
            fs.push(FEATURE_IS_UPPER);
        }
        if clean.starts_with(|c: char| c.is_ascii_uppercase()) {
            fs.push(FEATURE_IS_TITLE);
        }
        if clean.chars().any(|c| c.is_ascii_digit()) {
            fs.push(FEATURE_HAS_DIGIT);
        }
    }

    if norm.is_digits() {
        fs.push(FEATURE_IS_DIGIT);
    }

    if is_direction(norm.as_str()) {
        fs.push(FEATURE_IS_DIRECTION);
    }

    // === Context ===
    match prev {
        Some(prev) => {
            let prev_norm = normalize(&prev.text);
            if !prev_norm.is_empty() {
                fs.push(format!("prev_word={prev_norm}"));
            }
        }
        None => fs.push(FEATURE_BOS),
    }

    match next {
        Some(next) => {
            let next_norm = normalize(&next.text);
            if !next_norm.is_empty() {
                fs.push(format!("next_word={next_norm}"));
            }
        }
        None => fs.push(FEATURE_EOS),
    }

    fs
}

/// Generates feature sets for a whole token sequence.
///
/// The returned vector is aligned with `tokens`: entry `i` belongs to token `i`.
pub fn extract_features(tokens: &[Token]) -> Vec<FeatureSet> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let prev = i.checked_sub(1).map(|p| &tokens[p]);
            let next = tokens.get(i + 1);
            generate(token, prev, next)
        })
        .collect()
}
