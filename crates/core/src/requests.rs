//! Batch-update request documents for a hosted slides API.
//!
//! The document creates one slide per deck slide and inserts the title and
//! body text into placeholder object ids (`TITLE_{i}`, `BODY_{i}`). Real
//! object ids only exist after the slides are created, so callers must map
//! the placeholders before sending the batch.

use crate::deck::Deck;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Layout requested for every created slide.
pub const DEFAULT_LAYOUT: &str = "TITLE_AND_BODY";

/// Explanation attached to every generated document.
pub const PLACEHOLDER_NOTE: &str = "This JSON contains placeholder requests. You must map objectIds \
     after creation via the Slides API when running batchUpdate.";

/// A batch of requests plus a note about placeholder ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdateDocument {
    pub requests: Vec<SlideRequest>,
    pub note: String,
}

/// One request in a batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideRequest {
    CreateSlide(CreateSlide),
    InsertText(InsertText),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlide {
    pub slide_layout_reference: LayoutReference,
    pub insertion_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReference {
    pub predefined_layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertText {
    pub object_id: String,
    pub insertion_index: usize,
    pub text: String,
}

impl InsertText {
    fn at_start(object_id: String, text: String) -> Self {
        Self {
            object_id,
            insertion_index: 0,
            text,
        }
    }
}

impl BatchUpdateDocument {
    /// Build the request list for every slide in `deck`.
    pub fn from_deck(deck: &Deck) -> Self {
        let mut requests = Vec::with_capacity(deck.len() * 3);

        for (idx, slide) in deck.slides.iter().enumerate() {
            requests.push(SlideRequest::CreateSlide(CreateSlide {
                slide_layout_reference: LayoutReference {
                    predefined_layout: DEFAULT_LAYOUT.to_string(),
                },
                insertion_index: idx,
            }));
            requests.push(SlideRequest::InsertText(InsertText::at_start(
                format!("TITLE_{}", idx),
                slide.title().to_string(),
            )));
            requests.push(SlideRequest::InsertText(InsertText::at_start(
                format!("BODY_{}", idx),
                slide.body_text(),
            )));
        }

        Self {
            requests,
            note: PLACEHOLDER_NOTE.to_string(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
