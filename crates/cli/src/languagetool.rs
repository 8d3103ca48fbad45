//! Grammar engine backed by a LanguageTool HTTP server.
//!
//! The server reports offsets in UTF-16 code units; they are converted to
//! char offsets before leaving this module.

use reqwest::blocking::Client;
use serde::Deserialize;
use slidecheck_core::{Error, GrammarEngine, Result, RuleMatch};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8081";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct LanguageToolConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for LanguageToolConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LanguageToolConfig {
    /// Defaults overridden by `LANGUAGETOOL_URL` and `LANGUAGETOOL_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("LANGUAGETOOL_URL") {
            cfg.base_url = url;
        }
        if let Ok(timeout) = std::env::var("LANGUAGETOOL_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.timeout = Duration::from_secs(parsed);
            }
        }
        cfg
    }
}

pub struct LanguageToolClient {
    http: Client,
    cfg: LanguageToolConfig,
}

impl LanguageToolClient {
    pub fn new(cfg: LanguageToolConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::Engine(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self) -> String {
        format!("{}/v2/check", self.cfg.base_url.trim_end_matches('/'))
    }
}

impl GrammarEngine for LanguageToolClient {
    fn check(&self, text: &str, language: &str) -> Result<Vec<RuleMatch>> {
        let endpoint = self.endpoint();
        log::debug!("POST {} ({} chars, {})", endpoint, text.chars().count(), language);

        let response = self
            .http
            .post(&endpoint)
            .form(&[("text", text), ("language", language)])
            .send()
            .map_err(|e| Error::Engine(format!("Request to {} failed: {}", endpoint, e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::Engine(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Engine(format!("Server returned {}: {}", status, body.trim())));
        }

        decode_matches(text, &body)
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<ApiMatch>,
}

#[derive(Debug, Deserialize)]
struct ApiMatch {
    message: String,
    #[serde(default)]
    replacements: Vec<ApiReplacement>,
    offset: usize,
    length: usize,
    context: ApiContext,
    #[serde(default)]
    sentence: String,
    rule: ApiRule,
}

#[derive(Debug, Deserialize)]
struct ApiReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiContext {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiRule {
    id: String,
    category: ApiCategory,
}

#[derive(Debug, Deserialize)]
struct ApiCategory {
    id: String,
}

/// Decode a `/v2/check` response body into rule matches against `text`.
fn decode_matches(text: &str, body: &str) -> Result<Vec<RuleMatch>> {
    let response: CheckResponse = serde_json::from_str(body)?;
    let index = Utf16Index::new(text);

    Ok(response
        .matches
        .into_iter()
        .map(|m| {
            let start = index.to_char(m.offset);
            let end = index.to_char(m.offset + m.length);
            RuleMatch {
                message: m.message,
                context: m.context.text,
                offset: start,
                length: end - start,
                replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                rule_id: m.rule.id,
                rule_category: m.rule.category.id,
                sentence: m.sentence,
            }
        })
        .collect())
}

/// Maps UTF-16 code unit positions to char positions.
struct Utf16Index {
    /// UTF-16 position at which each char starts, plus the total length.
    starts: Vec<usize>,
}

impl Utf16Index {
    fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() + 1);
        let mut pos = 0;
        for c in text.chars() {
            starts.push(pos);
            pos += c.len_utf16();
        }
        starts.push(pos);
        Self { starts }
    }

    /// Char index of the char containing the given UTF-16 position.
    /// Positions past the end clamp to the char count.
    fn to_char(&self, utf16_pos: usize) -> usize {
        match self.starts.binary_search(&utf16_pos) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }
}
