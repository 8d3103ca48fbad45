//! Core text handling for slide generation and grammar checking:
//! sentence-aware chunking, offset-based patching, grammar issue
//! categorization, and slide deck assembly.

pub mod bullets;
pub mod chunk;
pub mod deck;
pub mod error;
pub mod grammar;
pub mod patch;
pub mod requests;
pub mod stats;

pub use chunk::{chunk_text, normalize_whitespace, Chunker};
pub use deck::{Deck, DeckBuilder, DeckOptions, Slide, TextGenerator};
pub use error::{Error, Result};
pub use grammar::{
    check_text, CheckOptions, CheckReport, GrammarEngine, GrammarIssue, IssueCategory, RuleMatch,
};
pub use patch::{apply_replacements, partition_conflicts, Replacement};
pub use requests::BatchUpdateDocument;
pub use stats::TextStats;
