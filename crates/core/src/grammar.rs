//! Grammar issue model and checking workflow.
//!
//! The rule engine itself is external and reached through [`GrammarEngine`].
//! This module turns its raw matches into categorized issues, filters them,
//! and optionally applies the top suggestion for each issue.

use crate::error::Result;
use crate::patch::{apply_replacements, partition_conflicts, Replacement};
use serde::{Deserialize, Serialize};

/// Language variants offered to users.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en-US", "en-GB", "en-CA", "en-AU"];

/// Default language variant.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Number of suggestions kept per issue.
pub const MAX_SUGGESTIONS: usize = 3;

/// A rule match as reported by a grammar engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Human readable explanation of the problem.
    pub message: String,

    /// Excerpt of the text around the problem.
    pub context: String,

    /// Start of the flagged span, in chars.
    pub offset: usize,

    /// Length of the flagged span, in chars.
    pub length: usize,

    /// Suggested replacements, best first.
    pub replacements: Vec<String>,

    /// Engine rule identifier (e.g. `MORFOLOGIK_RULE_EN_US`).
    pub rule_id: String,

    /// Engine category identifier (e.g. `GRAMMAR`, `STYLE`).
    pub rule_category: String,

    /// The sentence containing the problem.
    pub sentence: String,
}

/// Something that can check text for grammar and style problems.
pub trait GrammarEngine {
    /// Check `text` in the given language variant.
    fn check(&self, text: &str, language: &str) -> Result<Vec<RuleMatch>>;
}

/// User-facing issue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    Spelling,
    Punctuation,
    Grammar,
    Style,
    Typo,
    Other,
}

impl IssueCategory {
    /// Every category, in display order.
    pub const ALL: [IssueCategory; 6] = [
        IssueCategory::Spelling,
        IssueCategory::Grammar,
        IssueCategory::Punctuation,
        IssueCategory::Style,
        IssueCategory::Typo,
        IssueCategory::Other,
    ];

    /// Map an engine rule id and category onto a user-facing category.
    ///
    /// Rule id markers are checked first, in the order spelling, punctuation,
    /// grammar, style, typo.
    pub fn classify(rule_id: &str, rule_category: &str) -> Self {
        if rule_id.contains("SPELL") || rule_id.contains("MORFOLOGIK") {
            Self::Spelling
        } else if rule_id.contains("PUNCT") || rule_id.contains("COMMA") {
            Self::Punctuation
        } else if rule_id.contains("GRAMMAR") || rule_category == "GRAMMAR" {
            Self::Grammar
        } else if rule_id.contains("STYLE") || rule_category == "STYLE" {
            Self::Style
        } else if rule_id.contains("TYPO") {
            Self::Typo
        } else {
            Self::Other
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spelling => "Spelling",
            Self::Punctuation => "Punctuation",
            Self::Grammar => "Grammar",
            Self::Style => "Style",
            Self::Typo => "Typo",
            Self::Other => "Other",
        }
    }

    /// Parse a label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A categorized issue with at most [`MAX_SUGGESTIONS`] suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub message: String,
    pub context: String,
    pub offset: usize,
    pub length: usize,
    pub replacements: Vec<String>,
    pub category: IssueCategory,
    pub rule_id: String,
    pub sentence: String,
}

impl From<RuleMatch> for GrammarIssue {
    fn from(m: RuleMatch) -> Self {
        let category = IssueCategory::classify(&m.rule_id, &m.rule_category);
        let mut replacements = m.replacements;
        replacements.truncate(MAX_SUGGESTIONS);

        Self {
            message: m.message,
            context: m.context,
            offset: m.offset,
            length: m.length,
            replacements,
            category,
            rule_id: m.rule_id,
            sentence: m.sentence,
        }
    }
}

impl GrammarIssue {
    /// The edit that applies this issue's first suggestion, if it has one.
    pub fn top_correction(&self) -> Option<Replacement> {
        self.replacements
            .first()
            .map(|text| Replacement::new(self.offset, self.length, text.clone()))
    }
}

/// Top-suggestion replacements for every issue that has a suggestion.
pub fn corrections(issues: &[GrammarIssue]) -> Vec<Replacement> {
    issues.iter().filter_map(GrammarIssue::top_correction).collect()
}

/// Options for a single check request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Language variant passed to the engine.
    pub language: String,

    /// Categories to report. Issues in other categories are dropped.
    pub categories: Vec<IssueCategory>,

    /// Apply the first suggestion of every reported issue.
    pub auto_correct: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            categories: IssueCategory::ALL.to_vec(),
            auto_correct: false,
        }
    }
}

impl CheckOptions {
    /// Create options with every category selected and auto-correct off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language variant.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Restrict reporting to the given categories.
    pub fn with_categories(mut self, categories: Vec<IssueCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Enable or disable applying top suggestions.
    pub fn with_auto_correct(mut self, auto_correct: bool) -> Self {
        self.auto_correct = auto_correct;
        self
    }
}

/// Outcome of checking one text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// The text that was checked.
    pub original_text: String,

    /// Issues that passed the category filter, in engine order.
    pub issues: Vec<GrammarIssue>,

    /// Corrected text when auto-correct was on, otherwise the original text.
    pub corrected_text: String,

    /// Suggestions left out because they conflicted with another one.
    pub skipped_corrections: Vec<Replacement>,
}

impl CheckReport {
    /// Number of issues per category, in order of first appearance.
    pub fn category_counts(&self) -> Vec<(IssueCategory, usize)> {
        let mut counts: Vec<(IssueCategory, usize)> = Vec::new();
        for issue in &self.issues {
            match counts.iter_mut().find(|(c, _)| *c == issue.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((issue.category, 1)),
            }
        }
        counts
    }

    /// Whether the engine found nothing worth reporting.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check `text` with `engine`, categorize, filter, and optionally correct it.
pub fn check_text<E: GrammarEngine + ?Sized>(
    engine: &E,
    text: &str,
    options: &CheckOptions,
) -> Result<CheckReport> {
    let matches = engine.check(text, &options.language)?;
    let total = matches.len();

    let issues: Vec<GrammarIssue> = matches
        .into_iter()
        .map(GrammarIssue::from)
        .filter(|issue| options.categories.contains(&issue.category))
        .collect();

    log::debug!(
        "Engine reported {} matches, {} after category filter",
        total,
        issues.len()
    );

    let (corrected_text, skipped_corrections) = if options.auto_correct {
        let (kept, skipped) = partition_conflicts(&corrections(&issues));
        for r in &skipped {
            log::warn!(
                "Skipping suggestion {:?} at offset {}: overlaps another correction",
                r.replacement_text,
                r.offset
            );
        }
        (apply_replacements(text, &kept)?, skipped)
    } else {
        (text.to_string(), Vec::new())
    };

    Ok(CheckReport {
        original_text: text.to_string(),
        issues,
        corrected_text,
        skipped_corrections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FakeEngine {
        matches: Vec<RuleMatch>,
    }

    impl GrammarEngine for FakeEngine {
        fn check(&self, _text: &str, _language: &str) -> Result<Vec<RuleMatch>> {
            Ok(self.matches.clone())
        }
    }

    struct FailingEngine;

    impl GrammarEngine for FailingEngine {
        fn check(&self, _text: &str, _language: &str) -> Result<Vec<RuleMatch>> {
            Err(Error::Engine("server unavailable".to_string()))
        }
    }

    fn rule_match(offset: usize, length: usize, rule_id: &str, suggestions: &[&str]) -> RuleMatch {
        RuleMatch {
            message: format!("Problem from {}", rule_id),
            context: String::new(),
            offset,
            length,
            replacements: suggestions.iter().map(|s| s.to_string()).collect(),
            rule_id: rule_id.to_string(),
            rule_category: "MISC".to_string(),
            sentence: String::new(),
        }
    }

    const SAMPLE: &str = "This is a sample text with some erors. It contain mistakes.";

    fn sample_engine() -> FakeEngine {
        FakeEngine {
            matches: vec![
                rule_match(32, 5, "MORFOLOGIK_RULE_EN_US", &["errors", "Eros", "error", "euros"]),
                rule_match(42, 7, "IT_VBZ", &["contains"]),
                rule_match(50, 8, "EN_PLAIN_ENGLISH_REPLACE", &[]),
            ],
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(IssueCategory::classify("MORFOLOGIK_RULE_EN_US", "TYPOS"), IssueCategory::Spelling);
        assert_eq!(IssueCategory::classify("HUNSPELL_RULE", "TYPOS"), IssueCategory::Spelling);
        assert_eq!(IssueCategory::classify("COMMA_PARENTHESIS_WHITESPACE", "TYPOGRAPHY"), IssueCategory::Punctuation);
        assert_eq!(IssueCategory::classify("UNLIKELY_OPENING_PUNCTUATION", "MISC"), IssueCategory::Punctuation);
        assert_eq!(IssueCategory::classify("HE_VERB_AGR", "GRAMMAR"), IssueCategory::Grammar);
        assert_eq!(IssueCategory::classify("PASSIVE_VOICE", "STYLE"), IssueCategory::Style);
        assert_eq!(IssueCategory::classify("EN_TYPO_SPACE", "MISC"), IssueCategory::Typo);
        assert_eq!(IssueCategory::classify("UPPERCASE_SENTENCE_START", "CASING"), IssueCategory::Other);
    }

    #[test]
    fn test_classify_precedence() {
        // Spelling markers win over a grammar category.
        assert_eq!(IssueCategory::classify("SPELLING_GRAMMAR", "GRAMMAR"), IssueCategory::Spelling);
        // Punctuation markers win over a style category.
        assert_eq!(IssueCategory::classify("PUNCTUATION_PARAGRAPH_END", "STYLE"), IssueCategory::Punctuation);
    }

    #[test]
    fn test_label_round_trip() {
        for category in IssueCategory::ALL {
            assert_eq!(IssueCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(IssueCategory::from_label(" spelling "), Some(IssueCategory::Spelling));
        assert_eq!(IssueCategory::from_label("nonsense"), None);
    }

    #[test]
    fn test_issue_keeps_three_suggestions() {
        let issue = GrammarIssue::from(rule_match(0, 4, "MORFOLOGIK_RULE_EN_US", &["a", "b", "c", "d"]));
        assert_eq!(issue.replacements, vec!["a", "b", "c"]);
        assert_eq!(issue.category, IssueCategory::Spelling);
    }

    #[test]
    fn test_corrections_skip_issues_without_suggestions() {
        let issues: Vec<GrammarIssue> = sample_engine().matches.into_iter().map(Into::into).collect();
        let fixes = corrections(&issues);
        assert_eq!(
            fixes,
            vec![Replacement::new(32, 5, "errors"), Replacement::new(42, 7, "contains")]
        );
    }

    #[test]
    fn test_check_without_auto_correct_keeps_text() {
        let report = check_text(&sample_engine(), SAMPLE, &CheckOptions::new()).unwrap();
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.corrected_text, SAMPLE);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_check_with_auto_correct() {
        let options = CheckOptions::new().with_auto_correct(true);
        let report = check_text(&sample_engine(), SAMPLE, &options).unwrap();
        assert_eq!(
            report.corrected_text,
            "This is a sample text with some errors. It contains mistakes."
        );
        assert!(report.skipped_corrections.is_empty());
    }

    #[test]
    fn test_category_filter_limits_corrections() {
        let options = CheckOptions::new()
            .with_categories(vec![IssueCategory::Spelling])
            .with_auto_correct(true);
        let report = check_text(&sample_engine(), SAMPLE, &options).unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.corrected_text,
            "This is a sample text with some errors. It contain mistakes."
        );
    }

    #[test]
    fn test_conflicting_suggestions_are_skipped() {
        let engine = FakeEngine {
            matches: vec![
                rule_match(0, 4, "EN_A_VS_AN", &["That"]),
                rule_match(2, 5, "MORFOLOGIK_RULE_EN_US", &["is a"]),
            ],
        };
        let options = CheckOptions::new().with_auto_correct(true);
        let report = check_text(&engine, "This is fine.", &options).unwrap();
        assert_eq!(report.corrected_text, "That is fine.");
        assert_eq!(report.skipped_corrections, vec![Replacement::new(2, 5, "is a")]);
    }

    #[test]
    fn test_category_counts_in_first_seen_order() {
        let engine = FakeEngine {
            matches: vec![
                rule_match(0, 1, "EN_TYPO_SPACE", &[]),
                rule_match(2, 1, "MORFOLOGIK_RULE_EN_US", &[]),
                rule_match(4, 1, "EN_TYPO_X", &[]),
            ],
        };
        let report = check_text(&engine, "a b c d e", &CheckOptions::new()).unwrap();
        assert_eq!(
            report.category_counts(),
            vec![(IssueCategory::Typo, 2), (IssueCategory::Spelling, 1)]
        );
    }

    #[test]
    fn test_clean_text() {
        let engine = FakeEngine { matches: vec![] };
        let report = check_text(&engine, "All good.", &CheckOptions::new()).unwrap();
        assert!(report.is_clean());
        assert!(report.category_counts().is_empty());
    }

    #[test]
    fn test_engine_error_propagates() {
        let err = check_text(&FailingEngine, "text", &CheckOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Engine(_)));
    }
}
