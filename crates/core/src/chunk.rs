//! Sentence-aware text chunking.
//!
//! Splits long text into bounded segments that prefer to end at sentence
//! punctuation, then folds short trailing fragments into the segment before
//! them so that no slide is built from a lone clause.

use crate::error::{Error, Result};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Regex matching any run of whitespace, including newlines and tabs.
static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Characters that end a sentence for the purpose of picking a cut point.
const SENTENCE_TERMINATORS: &[char] = &['.', '?', '!'];

/// Default maximum number of characters per window.
pub const DEFAULT_MAX_CHARS: usize = 900;

/// Segments shorter than this (in chars) are merged into the previous one.
pub const DEFAULT_MERGE_THRESHOLD: usize = 200;

/// Collapse every whitespace run to a single ASCII space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN_REGEX
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// Chunk `text` into segments of roughly `max_chars` characters.
///
/// Shorthand for `Chunker::new().with_max_chars(max_chars).chunk(text)`.
pub fn chunk_text(text: &str, max_chars: usize) -> Result<Vec<String>> {
    Chunker::new().with_max_chars(max_chars).chunk(text)
}

/// Greedy sentence-boundary chunker.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Window size in chars.
    max_chars: usize,

    /// Segments shorter than this are appended to the previous segment.
    merge_threshold: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
        }
    }
}

impl Chunker {
    /// Create a chunker with a 900 char window and a 200 char merge threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size. Zero is rejected when chunking.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the length below which a segment is merged into its predecessor.
    pub fn with_merge_threshold(mut self, threshold: usize) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// The configured window size.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split `text` into ordered, whitespace-normalized segments.
    ///
    /// Empty or whitespace-only input yields an empty vector.
    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        if self.max_chars < 1 {
            return Err(Error::InvalidParameter(
                "max_chars must be at least 1".to_string(),
            ));
        }

        let normalized: Vec<char> = normalize_whitespace(text).chars().collect();
        let windows = self.window_spans(&normalized);
        let merged = self.merge_spans(&normalized, &windows);

        log::debug!(
            "Chunked {} chars into {} windows, {} segments after merging",
            normalized.len(),
            windows.len(),
            merged.len()
        );

        Ok(merged
            .into_iter()
            .map(|span| normalized[span].iter().collect())
            .collect())
    }

    /// Greedy windowing pass. Returns trimmed char spans; empty spans are kept.
    fn window_spans(&self, chars: &[char]) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.max_chars).min(chars.len());
            let last_terminator = chars[start..end]
                .iter()
                .rposition(|c| SENTENCE_TERMINATORS.contains(c));

            let cut = match last_terminator {
                Some(pos) if end < chars.len() => start + pos + 1,
                _ => end,
            };

            spans.push(trim_span(chars, start..cut));
            start = cut;
        }

        spans
    }

    /// Fold short spans into the previous accumulated span.
    ///
    /// Merged spans are taken straight from the normalized text, so the
    /// separator between two merged pieces is whatever the text had there.
    fn merge_spans(&self, chars: &[char], spans: &[Range<usize>]) -> Vec<Range<usize>> {
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());

        for span in spans.iter().filter(|s| !s.is_empty()) {
            match merged.last_mut() {
                Some(previous) if span.len() < self.merge_threshold => {
                    previous.end = span.end;
                }
                _ => merged.push(span.clone()),
            }
        }

        merged.retain(|span| chars[span.clone()].iter().any(|c| !c.is_whitespace()));
        merged
    }
}

/// Shrink a span so it neither starts nor ends with whitespace.
fn trim_span(chars: &[char], mut span: Range<usize>) -> Range<usize> {
    while span.start < span.end && chars[span.start].is_whitespace() {
        span.start += 1;
    }
    while span.end > span.start && chars[span.end - 1].is_whitespace() {
        span.end -= 1;
    }
    span
}
