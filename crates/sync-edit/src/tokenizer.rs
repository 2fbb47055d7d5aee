//! Word tokenizer.
//!
//! Finds every maximal run of word characters in a text span. Offsets are **character
//! offsets relative to the start of the scanned text**; callers add the region's base offset to
//! move them into document space.

use crate::text::CharIndex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static UNICODE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("unicode word pattern is valid"));

static ASCII_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z_]+").expect("ascii word pattern is valid"));

/// Which characters count as word characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordClass {
    /// Unicode word characters: letters, marks, digits and connector punctuation.
    #[default]
    Unicode,
    /// ASCII letters, digits and `_` only.
    Ascii,
}

impl WordClass {
    fn regex(self) -> &'static Regex {
        match self {
            WordClass::Unicode => &UNICODE_WORD,
            WordClass::Ascii => &ASCII_WORD,
        }
    }
}

/// A maximal run of word characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text.
    pub text: String,
    /// Character offset of the first character.
    pub offset: usize,
}

impl Token {
    /// Length of the token in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Scan `text` with the default ([`WordClass::Unicode`]) word class.
pub fn scan(text: &str) -> Vec<Token> {
    scan_with(text, WordClass::default())
}

/// Scan `text` for maximal word-character runs of the given class.
pub fn scan_with(text: &str, class: WordClass) -> Vec<Token> {
    if text.is_empty() {
        return Vec::new();
    }

    let index = CharIndex::new(text);
    class
        .regex()
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str().to_string(),
            offset: index.byte_to_char(m.start()),
        })
        .collect()
}

/// `true` if `text` is exactly one word of the given class.
pub(crate) fn is_word(text: &str, class: WordClass) -> bool {
    class
        .regex()
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}
