//! # Address Tokenizer
//!
//! Splits a raw address string into tokens: maximal runs of ASCII letters and
//! digits, and maximal runs of everything else that is not whitespace.
//! Whitespace only separates tokens and is never emitted.
//!
//! The split reproduces the word/punctuation pattern the pretrained model was
//! trained with, so it must stay stable: the same input always produces the
//! same tokens.
//!
//! ## Example
//!
//! ```rust
//! use usaddr_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("123 Main St., Springfield");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["123", "Main", "St", ".,", "Springfield"]);
//! ```

use serde::{Deserialize, Serialize};

/// A token extracted from the input address.
///
/// Tokens are created once, in scan order, and never mutated. The byte span
/// (`start..end`) points back into the original text so hosts can highlight
/// components without re-tokenizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Surface text exactly as it appears in the input (ex: "St", ",", "--").
    pub text: String,
    /// Start byte offset in the input (inclusive).
    pub start: usize,
    /// End byte offset in the input (exclusive).
    pub end: usize,
    /// Sequential position of the token (0, 1, 2...).
    pub index: usize,
}

impl Token {
    /// True for the literal comma token, which the stream output drops.
    pub fn is_comma(&self) -> bool {
        self.text == ","
    }
}

/// Character classes seen by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Punct,
    Space,
}

impl CharClass {
    fn of(ch: char) -> Self {
        if ch.is_ascii_alphanumeric() {
            CharClass::Word
        } else if ch.is_whitespace() {
            CharClass::Space
        } else {
            CharClass::Punct
        }
    }
}

/// Tokenizes `text` in a single left-to-right pass.
///
/// Total over any input: empty or all-whitespace input gives an empty vector.
/// Non-ASCII letters are not word characters here, so "é" forms (or joins) a
/// punctuation run.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    // (class, start byte) of the run being accumulated
    let mut run: Option<(CharClass, usize)> = None;

    for (pos, ch) in text.char_indices() {
        let class = CharClass::of(ch);
        match run {
            Some((current, _)) if current == class => {}
            Some((_, start)) => {
                push_token(&mut tokens, text, start, pos);
                run = (class != CharClass::Space).then_some((class, pos));
            }
            None => {
                run = (class != CharClass::Space).then_some((class, pos));
            }
        }
    }

    if let Some((_, start)) = run {
        push_token(&mut tokens, text, start, text.len());
    }

    tokens
}

/// Closes a run and appends it to the list.
fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
    let index = tokens.len();
    tokens.push(Token {
        text: text[start..end].to_string(),
        start,
        end,
        index,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_basic_address() {
        assert_eq!(
            texts("123 Main St, Springfield IL"),
            ["123", "Main", "St", ",", "Springfield", "IL"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_punctuation_runs_are_grouped() {
        assert_eq!(texts("St."), ["St", "."]);
        assert_eq!(texts("A--B"), ["A", "--", "B"]);
        assert_eq!(texts("#4B"), ["#", "4B"]);
        assert_eq!(texts("P.O. Box"), ["P", ".", "O", ".", "Box"]);
    }

    #[test]
    fn test_offsets_and_indices() {
        let tokens = tokenize("  12 Elm,");
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].start, tokens[0].end), (2, 4));
        assert_eq!((tokens[2].start, tokens[2].end), (8, 9));
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, i);
        }
        assert!(tokens[2].is_comma());
    }

    #[test]
    fn test_non_ascii_letters_are_punctuation() {
        assert_eq!(texts("Café 5"), ["Caf", "é", "5"]);
    }

    proptest! {
        #[test]
        fn prop_tokenization_is_lossless(input in "\\PC{0,64}") {
            let joined: String = tokenize(&input).iter().map(|t| t.text.as_str()).collect();
            let expected: String = input.chars().filter(|c| !c.is_whitespace()).collect();
            prop_assert_eq!(joined, expected);
        }

        #[test]
        fn prop_tokenization_is_deterministic(input in "[ -~]{0,48}") {
            prop_assert_eq!(tokenize(&input), tokenize(&input));
        }

        #[test]
        fn prop_spans_match_text(input in "[ a-zA-Z0-9,.#-]{0,48}") {
            for token in tokenize(&input) {
                prop_assert_eq!(&input[token.start..token.end], token.text.as_str());
            }
        }
    }
}
