//! Slide deck model and assembly from generated content.

use crate::bullets::{bullet_prompt, parse_bullets, speaker_notes_prompt};
use crate::chunk::{Chunker, DEFAULT_MAX_CHARS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Title used when none is given and the first line is too short.
const FALLBACK_TITLE: &str = "Presentation";

/// Subtitle used when none is given.
const FALLBACK_SUBTITLE: &str = "Generated automatically";

/// The first input line must be longer than this to become the title.
const MIN_TITLE_LINE_CHARS: usize = 6;

/// Bullets requested for the conclusion slide.
const CONCLUSION_BULLETS: usize = 4;

/// Something that turns a prompt into generated text.
pub trait TextGenerator {
    /// Generate a completion for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String>,
{
    fn generate(&self, prompt: &str) -> Result<String> {
        self(prompt)
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Slide {
    /// Opening slide with title and subtitle.
    Title { title: String, subtitle: String },

    /// Bullet slide with speaker notes.
    Content {
        title: String,
        bullets: Vec<String>,
        notes: String,
    },
}

impl Slide {
    /// The slide's title.
    pub fn title(&self) -> &str {
        match self {
            Slide::Title { title, .. } | Slide::Content { title, .. } => title,
        }
    }

    /// Body text: the subtitle, or bullets separated by newlines.
    pub fn body_text(&self) -> String {
        match self {
            Slide::Title { subtitle, .. } => subtitle.clone(),
            Slide::Content { bullets, .. } => bullets.join("\n"),
        }
    }
}

/// An ordered list of slides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Settings for building a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckOptions {
    /// Bullets requested per content slide.
    pub max_bullets: usize,

    /// Chunk size in chars; one content slide is built per chunk.
    pub max_chars: usize,

    /// Append a conclusion slide summarizing the whole text.
    pub add_conclusion: bool,

    /// Presentation title. Derived from the text when absent or blank.
    pub title: Option<String>,

    /// Subtitle (author, date). Defaults to a fixed note when absent or blank.
    pub subtitle: Option<String>,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            max_bullets: 4,
            max_chars: DEFAULT_MAX_CHARS,
            add_conclusion: true,
            title: None,
            subtitle: None,
        }
    }
}

/// Builds a [`Deck`] from source text using a [`TextGenerator`].
#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
    options: DeckOptions,
}

impl DeckBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options.
    pub fn with_options(options: DeckOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &DeckOptions {
        &self.options
    }

    /// Build a title slide, one content slide per chunk, and an optional conclusion.
    pub fn build<G: TextGenerator + ?Sized>(&self, text: &str, generator: &G) -> Result<Deck> {
        if text.trim().is_empty() {
            return Err(Error::InvalidParameter("source text is empty".to_string()));
        }

        let chunks = Chunker::new()
            .with_max_chars(self.options.max_chars)
            .chunk(text)?;

        let mut deck = Deck::new();
        deck.add_slide(Slide::Title {
            title: self.resolve_title(text),
            subtitle: non_blank(self.options.subtitle.as_deref())
                .unwrap_or(FALLBACK_SUBTITLE)
                .to_string(),
        });

        for (i, chunk) in chunks.iter().enumerate() {
            let title = format!("Section {}", i + 1);
            log::debug!("Generating {} from {} chars", title, chunk.chars().count());
            deck.add_slide(self.content_slide(generator, title, chunk, self.options.max_bullets)?);
        }

        if self.options.add_conclusion {
            let overall = format!("Overall: {}", text);
            deck.add_slide(self.content_slide(
                generator,
                "Conclusion".to_string(),
                &overall,
                CONCLUSION_BULLETS,
            )?);
        }

        log::debug!("Built deck with {} slides", deck.len());
        Ok(deck)
    }

    fn content_slide<G: TextGenerator + ?Sized>(
        &self,
        generator: &G,
        title: String,
        content: &str,
        max_bullets: usize,
    ) -> Result<Slide> {
        let raw = generator.generate(&bullet_prompt(content, max_bullets))?;
        let bullets = parse_bullets(&raw, max_bullets);
        if bullets.is_empty() {
            log::warn!("No bullets could be extracted for {}", title);
        }

        let notes = generator
            .generate(&speaker_notes_prompt(&title, &bullets))?
            .trim()
            .to_string();

        Ok(Slide::Content {
            title,
            bullets,
            notes,
        })
    }

    /// Explicit title, else the first line when it is long enough, else a fallback.
    fn resolve_title(&self, text: &str) -> String {
        if let Some(title) = non_blank(self.options.title.as_deref()) {
            return title.to_string();
        }

        match text.lines().next() {
            Some(first) if first.chars().count() > MIN_TITLE_LINE_CHARS => first.to_string(),
            _ => FALLBACK_TITLE.to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
