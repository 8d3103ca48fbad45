//! Error types for text chunking, patching, and deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the slidecheck core.
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter was outside its accepted range (e.g. `max_chars == 0`).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A replacement span does not fit inside the base text.
    #[error("Replacement at offset {offset} with length {length} exceeds text length {text_len}")]
    OutOfRange {
        offset: usize,
        length: usize,
        text_len: usize,
    },

    /// Two replacements touch the same part of the base text.
    #[error("Replacements at offsets {first} and {second} overlap")]
    OverlappingReplacements { first: usize, second: usize },

    /// The grammar engine failed to check the text.
    #[error("Grammar engine error: {0}")]
    Engine(String),

    /// The text generator failed to produce output.
    #[error("Text generation error: {0}")]
    Generation(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
