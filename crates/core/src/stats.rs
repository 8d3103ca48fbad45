//! Basic readability statistics.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Regex matching runs of sentence-ending punctuation.
static SENTENCE_END_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

/// Word and sentence counts for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    /// Rounded to one decimal place.
    pub avg_words_per_sentence: f64,
}

impl TextStats {
    /// Count words and sentences in `text`.
    ///
    /// Text without any sentence content reports zeros across the board.
    pub fn from_text(text: &str) -> Self {
        let sentences = SENTENCE_END_REGEX
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();

        if sentences == 0 {
            return Self {
                words: 0,
                sentences: 0,
                avg_words_per_sentence: 0.0,
            };
        }

        let words = text.split_whitespace().count();
        let avg = words as f64 / sentences as f64;

        Self {
            words,
            sentences,
            avg_words_per_sentence: (avg * 10.0).round() / 10.0,
        }
    }
}
