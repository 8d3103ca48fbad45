//! Offset-based text patching.
//!
//! Replacements are expressed against a fixed base text. They are applied
//! from the highest offset down so that every edit lands before any text
//! that has already been rewritten.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A proposed edit against a base text.
///
/// `offset` and `length` count chars (Unicode scalar values) of the base text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Replacement {
    /// Start of the replaced span.
    pub offset: usize,

    /// Number of chars removed starting at `offset`.
    pub length: usize,

    /// Text inserted in place of the span. Empty means deletion.
    pub replacement_text: String,
}

impl Replacement {
    /// Create a new replacement.
    pub fn new(offset: usize, length: usize, replacement_text: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacement_text: replacement_text.into(),
        }
    }

    /// End of the replaced span (exclusive). Saturates instead of overflowing.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Whether two distinct replacements cannot both be applied.
    ///
    /// Spans that share a char conflict, and so do two edits anchored at the
    /// same offset. Spans that merely touch do not.
    pub fn conflicts_with(&self, other: &Replacement) -> bool {
        if self == other {
            return false;
        }
        self.offset == other.offset || (self.offset < other.end() && other.offset < self.end())
    }
}

/// Apply every replacement to `base` and return the patched text.
///
/// Fails with [`Error::OutOfRange`] if any span leaves the text and with
/// [`Error::OverlappingReplacements`] if two distinct replacements conflict.
/// Nothing is applied on failure. Exact duplicates count once.
pub fn apply_replacements(base: &str, replacements: &[Replacement]) -> Result<String> {
    let text_len = base.chars().count();

    for r in replacements {
        let in_range = r
            .offset
            .checked_add(r.length)
            .is_some_and(|end| end <= text_len);
        if !in_range {
            return Err(Error::OutOfRange {
                offset: r.offset,
                length: r.length,
                text_len,
            });
        }
    }

    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by(|a, b| {
        (a.offset, a.length, &a.replacement_text).cmp(&(b.offset, b.length, &b.replacement_text))
    });
    ordered.dedup();

    for pair in ordered.windows(2) {
        if pair[0].conflicts_with(pair[1]) {
            return Err(Error::OverlappingReplacements {
                first: pair[0].offset,
                second: pair[1].offset,
            });
        }
    }

    // Byte position of every char boundary in the base text, including the end.
    let boundaries: Vec<usize> = base
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(base.len()))
        .collect();

    let mut patched = base.to_string();
    for r in ordered.iter().rev() {
        patched.replace_range(boundaries[r.offset]..boundaries[r.end()], &r.replacement_text);
    }

    log::debug!(
        "Applied {} replacements ({} chars -> {} chars)",
        ordered.len(),
        text_len,
        patched.chars().count()
    );

    Ok(patched)
}

/// Split replacements into a conflict-free set and the ones that were dropped.
///
/// Walks the replacements in offset order (input order breaks ties) and keeps
/// each one that does not conflict with the last kept replacement. Exact
/// duplicates of a kept replacement are discarded without being reported.
pub fn partition_conflicts(replacements: &[Replacement]) -> (Vec<Replacement>, Vec<Replacement>) {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by_key(|r| r.offset);

    let mut kept: Vec<Replacement> = Vec::with_capacity(ordered.len());
    let mut dropped = Vec::new();

    for r in ordered {
        match kept.last() {
            Some(last) if last == r => {}
            Some(last) if last.conflicts_with(r) => dropped.push(r.clone()),
            _ => kept.push(r.clone()),
        }
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_replacements_is_identity() {
        assert_eq!(apply_replacements("", &[]).unwrap(), "");
        assert_eq!(apply_replacements("The cat sat.", &[]).unwrap(), "The cat sat.");
    }

    #[test]
    fn test_single_replacement() {
        let r = Replacement::new(4, 3, "dog");
        assert_eq!(apply_replacements("The cat sat.", &[r]).unwrap(), "The dog sat.");
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let r = Replacement::new(5, 1, "x");
        let err = apply_replacements("abc", &[r]).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                offset: 5,
                length: 1,
                text_len: 3
            }
        ));
    }

    #[test]
    fn test_span_ending_past_text_is_rejected() {
        let err = apply_replacements("abc", &[Replacement::new(2, 2, "")]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    #[test]
    fn test_overflowing_span_is_rejected() {
        let err = apply_replacements("abc", &[Replacement::new(1, usize::MAX, "")]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    #[test]
    fn test_span_touching_end_is_allowed() {
        let r = Replacement::new(3, 0, "d");
        assert_eq!(apply_replacements("abc", &[r]).unwrap(), "abcd");
    }

    #[test]
    fn test_offsets_refer_to_original_text() {
        let replacements = vec![Replacement::new(0, 3, "X"), Replacement::new(5, 2, "YY")];
        assert_eq!(apply_replacements("abcdefgh", &replacements).unwrap(), "XdeYYh");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let base = "one two three four five";
        let mut replacements = vec![
            Replacement::new(0, 3, "1"),
            Replacement::new(8, 5, "THREE"),
            Replacement::new(19, 4, ""),
            Replacement::new(4, 3, "2"),
        ];
        let expected = apply_replacements(base, &replacements).unwrap();
        assert_eq!(expected, "1 2 THREE four ");

        replacements.reverse();
        assert_eq!(apply_replacements(base, &replacements).unwrap(), expected);
        replacements.swap(0, 2);
        assert_eq!(apply_replacements(base, &replacements).unwrap(), expected);
    }

    #[test]
    fn test_length_accounting() {
        let base = "Their going to the park.";
        let cases = [
            Replacement::new(0, 5, "They're"),
            Replacement::new(6, 5, ""),
            Replacement::new(23, 0, "!!"),
            Replacement::new(0, 24, "x"),
        ];
        for r in cases {
            let out = apply_replacements(base, std::slice::from_ref(&r)).unwrap();
            assert_eq!(
                out.chars().count(),
                base.chars().count() - r.length + r.replacement_text.chars().count()
            );
        }
    }

    #[test]
    fn test_overlap_is_rejected() {
        let replacements = vec![Replacement::new(0, 4, "a"), Replacement::new(2, 4, "b")];
        let err = apply_replacements("abcdefgh", &replacements).unwrap_err();
        assert!(matches!(
            err,
            Error::OverlappingReplacements {
                first: 0,
                second: 2
            }
        ));
    }

    #[test]
    fn test_same_offset_is_rejected() {
        let replacements = vec![Replacement::new(2, 0, "x"), Replacement::new(2, 0, "y")];
        let err = apply_replacements("abcdef", &replacements).unwrap_err();
        assert!(matches!(err, Error::OverlappingReplacements { .. }));
    }

    #[test]
    fn test_insertion_inside_span_is_rejected() {
        let replacements = vec![Replacement::new(1, 4, "Z"), Replacement::new(3, 0, "+")];
        assert!(apply_replacements("abcdef", &replacements).is_err());
    }

    #[test]
    fn test_adjacent_spans_are_allowed() {
        let replacements = vec![Replacement::new(0, 2, "X"), Replacement::new(2, 2, "Y")];
        assert_eq!(apply_replacements("abcdef", &replacements).unwrap(), "XYef");
    }

    #[test]
    fn test_duplicates_apply_once() {
        let r = Replacement::new(4, 3, "dog");
        let replacements = vec![r.clone(), r.clone(), r];
        assert_eq!(
            apply_replacements("The cat sat.", &replacements).unwrap(),
            "The dog sat."
        );
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let base = "Ça va très bien, merçi.";
        let replacements = vec![Replacement::new(0, 2, "Ca"), Replacement::new(17, 5, "merci")];
        assert_eq!(
            apply_replacements(base, &replacements).unwrap(),
            "Ca va très bien, merci."
        );
    }

    #[test]
    fn test_conflicts_with() {
        let a = Replacement::new(2, 3, "x");
        assert!(a.conflicts_with(&Replacement::new(4, 1, "y")));
        assert!(a.conflicts_with(&Replacement::new(2, 0, "y")));
        assert!(!a.conflicts_with(&Replacement::new(5, 1, "y")));
        assert!(!a.conflicts_with(&Replacement::new(0, 2, "y")));
        assert!(!a.conflicts_with(&a.clone()));
    }

    #[test]
    fn test_partition_conflicts_keeps_first_by_offset() {
        let replacements = vec![
            Replacement::new(6, 2, "late"),
            Replacement::new(0, 3, "first"),
            Replacement::new(2, 2, "clash"),
            Replacement::new(0, 3, "first"),
            Replacement::new(6, 1, "same-anchor"),
        ];
        let (kept, dropped) = partition_conflicts(&replacements);
        assert_eq!(
            kept,
            vec![Replacement::new(0, 3, "first"), Replacement::new(6, 2, "late")]
        );
        assert_eq!(
            dropped,
            vec![
                Replacement::new(2, 2, "clash"),
                Replacement::new(6, 1, "same-anchor")
            ]
        );
        assert!(apply_replacements("abcdefghij", &kept).is_ok());
    }
}
