//! WASM bindings for the slidecheck core.
//!
//! Exposes chunking, patching, grammar reports, and deck generation to
//! JavaScript. Model inference and the grammar server stay on the JS side:
//! the page passes a generator callback and the raw matches it fetched.

use serde::{Deserialize, Serialize};
use slidecheck_core::{
    apply_replacements as apply_core, check_text, BatchUpdateDocument, CheckOptions, CheckReport,
    Chunker, Deck, DeckBuilder, DeckOptions, Error, GrammarEngine, IssueCategory, Replacement,
    RuleMatch, TextGenerator, TextStats,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Summary of a grammar report for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSummary {
    /// The full report.
    pub report: CheckReport,
    /// Issue counts per category label, in order of first appearance.
    pub counts: Vec<(String, usize)>,
    /// Word and sentence counts for the checked text.
    pub stats: TextStats,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Split text into sentence-aligned chunks.
///
/// # Returns
/// An array of strings, or throws if `max_chars` is zero.
#[wasm_bindgen]
pub fn chunk_text(text: &str, max_chars: usize) -> Result<JsValue, JsValue> {
    let chunks = chunk_text_impl(text, max_chars).map_err(|e| JsValue::from_str(&e))?;
    to_js(&chunks)
}

fn chunk_text_impl(text: &str, max_chars: usize) -> Result<Vec<String>, String> {
    Chunker::new()
        .with_max_chars(max_chars)
        .chunk(text)
        .map_err(|e| e.to_string())
}

/// Apply `{offset, length, replacement_text}` edits to `text`.
#[wasm_bindgen]
pub fn apply_replacements(text: &str, replacements: JsValue) -> Result<String, JsValue> {
    let replacements: Vec<Replacement> = from_js(replacements, "replacements array")?;
    apply_core(text, &replacements).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Map a rule id and rule category onto a category label.
#[wasm_bindgen]
pub fn classify_issue(rule_id: &str, rule_category: &str) -> String {
    IssueCategory::classify(rule_id, rule_category)
        .label()
        .to_string()
}

/// Word and sentence counts.
#[wasm_bindgen]
pub fn text_stats(text: &str) -> Result<JsValue, JsValue> {
    to_js(&TextStats::from_text(text))
}

/// Matches already fetched by the page, replayed as an engine.
struct FetchedMatches(Vec<RuleMatch>);

impl GrammarEngine for FetchedMatches {
    fn check(&self, _text: &str, _language: &str) -> slidecheck_core::Result<Vec<RuleMatch>> {
        Ok(self.0.clone())
    }
}

/// Categorize, filter, and optionally apply matches fetched from a grammar server.
///
/// # Arguments
/// * `text` - The checked text
/// * `matches` - Array of rule matches with char offsets
/// * `options` - `{language, categories, auto_correct}`
#[wasm_bindgen]
pub fn grammar_report(text: &str, matches: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let matches: Vec<RuleMatch> = from_js(matches, "matches array")?;
    let options: CheckOptions = if options.is_undefined() || options.is_null() {
        CheckOptions::default()
    } else {
        from_js(options, "check options")?
    };

    let summary = grammar_report_impl(text, matches, &options).map_err(|e| JsValue::from_str(&e))?;
    to_js(&summary)
}

fn grammar_report_impl(
    text: &str,
    matches: Vec<RuleMatch>,
    options: &CheckOptions,
) -> Result<ReportSummary, String> {
    let report =
        check_text(&FetchedMatches(matches), text, options).map_err(|e| e.to_string())?;
    let counts = report
        .category_counts()
        .into_iter()
        .map(|(category, n)| (category.label().to_string(), n))
        .collect();

    Ok(ReportSummary {
        stats: TextStats::from_text(text),
        counts,
        report,
    })
}

/// A JavaScript function `(prompt: string) => string` used as the model.
struct JsGenerator<'a> {
    callback: &'a js_sys::Function,
}

impl TextGenerator for JsGenerator<'_> {
    fn generate(&self, prompt: &str) -> slidecheck_core::Result<String> {
        let value = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_str(prompt))
            .map_err(|e| Error::Generation(format!("Generator threw: {:?}", e)))?;

        value
            .as_string()
            .ok_or_else(|| Error::Generation("Generator must return a string".to_string()))
    }
}

/// Build a slide deck, calling `generate` for every bullet list and speaker note.
///
/// # Arguments
/// * `text` - Source text
/// * `options` - `{max_bullets, max_chars, add_conclusion, title, subtitle}`, all optional
/// * `generate` - Synchronous `(prompt) => string` model callback
#[wasm_bindgen]
pub fn build_deck(
    text: &str,
    options: JsValue,
    generate: &js_sys::Function,
) -> Result<JsValue, JsValue> {
    let options: DeckOptions = if options.is_undefined() || options.is_null() {
        DeckOptions::default()
    } else {
        from_js(options, "deck options")?
    };

    let generator = JsGenerator { callback: generate };
    let deck = DeckBuilder::with_options(options)
        .build(text, &generator)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_js(&deck)
}

/// Turn a deck into a pretty-printed batch-update request document.
#[wasm_bindgen]
pub fn batch_update_requests(deck: JsValue) -> Result<String, JsValue> {
    let deck: Deck = from_js(deck, "deck")?;
    batch_update_requests_impl(&deck).map_err(|e| JsValue::from_str(&e))
}

fn batch_update_requests_impl(deck: &Deck) -> Result<String, String> {
    BatchUpdateDocument::from_deck(deck)
        .to_json_pretty()
        .map_err(|e| e.to_string())
}
