//! # Token Normalization
//!
//! Two renderings of a token feed the feature schema:
//!
//! | Form | Rule | "St." | "N.E." | "," |
//! |------|------|-------|--------|-----|
//! | stripped | leading/trailing non-alphanumerics removed, case kept | `St` | `N.E` | `` |
//! | normalized | stripped, lowercased, every `.` removed | `st` | `ne` | `` |
//!
//! Periods count as non-alphanumeric, so a trailing period is gone before any
//! feature could look at it. The model was trained that way.

use std::fmt;

use serde::Serialize;

/// Canonical rendering of a token, the key used in `word=`, `prev_word=` and
/// `next_word=` features.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedForm(String);

impl NormalizedForm {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty and made only of ASCII digits.
    pub fn is_digits(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for NormalizedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedForm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Removes leading and trailing characters that are not ASCII alphanumeric.
///
/// Case and internal punctuation are preserved (`"(N.E.)"` → `"N.E"`).
pub fn strip(token_text: &str) -> &str {
    token_text.trim_matches(|c: char| !c.is_ascii_alphanumeric())
}

/// Normalizes a token's surface text.
pub fn normalize(token_text: &str) -> NormalizedForm {
    let text = strip(token_text)
        .chars()
        .filter(|&c| c != '.')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NormalizedForm(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_reference_cases() {
        assert_eq!(normalize("").as_str(), "");
        assert_eq!(normalize(",").as_str(), "");
        assert_eq!(normalize("St.").as_str(), "st");
        assert_eq!(normalize("NE").as_str(), "ne");
    }

    #[test]
    fn test_internal_periods_are_removed() {
        assert_eq!(normalize("P.O").as_str(), "po");
        assert_eq!(normalize("N.E.").as_str(), "ne");
    }

    #[test]
    fn test_internal_punctuation_other_than_period_is_kept() {
        assert_eq!(normalize("#4-B").as_str(), "4-b");
    }

    #[test]
    fn test_strip_keeps_case() {
        assert_eq!(strip("(N.E.)"), "N.E");
        assert_eq!(strip("--"), "");
        assert_eq!(strip("Apt4"), "Apt4");
    }

    #[test]
    fn test_is_digits() {
        assert!(normalize("123").is_digits());
        assert!(normalize("1.2").is_digits());
        assert!(!normalize("Apt4").is_digits());
        assert!(!normalize(",").is_digits());
    }
}
