//! CLI for turning text into slide outlines and grammar-checking text.

mod generator;
mod languagetool;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use generator::{ChatGenerator, GeneratorConfig};
use languagetool::{LanguageToolClient, LanguageToolConfig};
use slidecheck_core::grammar::SUPPORTED_LANGUAGES;
use slidecheck_core::{
    check_text, BatchUpdateDocument, CheckOptions, CheckReport, Chunker, Deck, DeckBuilder,
    DeckOptions, IssueCategory, TextStats,
};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Chunk text into slides and check grammar.
#[derive(Parser, Debug)]
#[command(name = "slidecheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split text into sentence-aligned chunks
    Chunk {
        /// Input text file (default: stdin)
        input: Option<PathBuf>,

        /// Maximum characters per chunk
        #[arg(short, long, default_value = "900")]
        max_chars: usize,

        /// Print chunks as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print word and sentence counts
    Stats {
        /// Input text file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Check grammar with a LanguageTool server
    Check {
        /// Input text file (default: stdin)
        input: Option<PathBuf>,

        /// LanguageTool server URL (default: $LANGUAGETOOL_URL or http://localhost:8081)
        #[arg(short, long)]
        server: Option<String>,

        /// Language variant
        #[arg(short, long, default_value = "en-US", value_parser = PossibleValuesParser::new(SUPPORTED_LANGUAGES.iter().copied()))]
        language: String,

        /// Only report these categories (repeatable; default: all)
        #[arg(short, long = "category", value_parser = parse_category)]
        categories: Vec<IssueCategory>,

        /// Apply the first suggestion of every issue
        #[arg(short, long)]
        apply: bool,

        /// Write the corrected text here instead of stdout (implies --apply)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include word and sentence counts
        #[arg(long)]
        stats: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a slide deck using an OpenAI-compatible endpoint
    Deck {
        /// Input text file (default: stdin)
        input: Option<PathBuf>,

        /// Presentation title (default: first line of the text)
        #[arg(short, long)]
        title: Option<String>,

        /// Subtitle, e.g. author and date
        #[arg(short, long)]
        subtitle: Option<String>,

        /// Bullets per slide
        #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(3..=6))]
        bullets: u8,

        /// Maximum characters per chunk
        #[arg(short, long, default_value = "900")]
        max_chars: usize,

        /// Skip the conclusion slide
        #[arg(long)]
        no_conclusion: bool,

        /// Write the deck JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a slides API batch-update request document
        #[arg(short, long)]
        requests: Option<PathBuf>,
    },

    /// Convert a saved deck JSON into a batch-update request document
    Requests {
        /// Deck JSON produced by `deck`
        deck: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Chunk {
            input,
            max_chars,
            json,
        } => {
            let text = read_input(input.as_deref())?;
            let chunks = Chunker::new().with_max_chars(max_chars).chunk(&text)?;
            log::info!("Produced {} chunks", chunks.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else {
                println!("{}", chunks.join("\n\n"));
            }
        }
        Command::Stats { input } => {
            let text = read_input(input.as_deref())?;
            print_stats(&TextStats::from_text(&text));
        }
        Command::Check {
            input,
            server,
            language,
            categories,
            apply,
            output,
            stats,
            json,
        } => {
            let text = read_input(input.as_deref())?;
            if text.trim().is_empty() {
                anyhow::bail!("Input text is empty");
            }

            let mut cfg = LanguageToolConfig::from_env();
            if let Some(server) = server {
                cfg.base_url = server;
            }
            let engine = LanguageToolClient::new(cfg)?;

            let mut options = CheckOptions::new()
                .with_language(language)
                .with_auto_correct(apply || output.is_some());
            if !categories.is_empty() {
                options = options.with_categories(categories);
            }

            let report = check_text(&engine, &text, &options)
                .context("Grammar check failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
                if stats {
                    print_stats(&TextStats::from_text(&text));
                }
            }

            if options.auto_correct {
                match output {
                    Some(path) => {
                        write_output(&path, &report.corrected_text)?;
                        log::info!("Written to: {}", path.display());
                    }
                    None if !json => {
                        println!("\nCorrected text:\n{}", report.corrected_text);
                    }
                    None => {}
                }
            }
        }
        Command::Deck {
            input,
            title,
            subtitle,
            bullets,
            max_chars,
            no_conclusion,
            output,
            requests,
        } => {
            let text = read_input(input.as_deref())?;
            let generator = ChatGenerator::new(GeneratorConfig::from_env())?;
            let builder = DeckBuilder::with_options(DeckOptions {
                max_bullets: usize::from(bullets),
                max_chars,
                add_conclusion: !no_conclusion,
                title,
                subtitle,
            });

            let deck = builder.build(&text, &generator).context("Deck generation failed")?;
            log::info!("Generated {} slides", deck.len());

            emit(output.as_deref(), &serde_json::to_string_pretty(&deck)?)?;
            if let Some(path) = requests {
                let doc = BatchUpdateDocument::from_deck(&deck);
                write_output(&path, &doc.to_json_pretty()?)?;
            }
        }
        Command::Requests { deck, output } => {
            let content = std::fs::read_to_string(&deck)
                .with_context(|| format!("Failed to read {}", deck.display()))?;
            let parsed: Deck = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a valid deck", deck.display()))?;

            let doc = BatchUpdateDocument::from_deck(&parsed);
            emit(output.as_deref(), &doc.to_json_pretty()?)?;
        }
    }

    Ok(())
}

fn parse_category(value: &str) -> std::result::Result<IssueCategory, String> {
    IssueCategory::from_label(value).ok_or_else(|| {
        let known: Vec<&str> = IssueCategory::ALL.iter().map(|c| c.label()).collect();
        format!("unknown category '{}' (expected one of: {})", value, known.join(", "))
    })
}

/// Read the whole input file, or stdin when no path (or `-`) is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match path {
        Some(p) if p != Path::new("-") => {
            File::open(p)
                .with_context(|| format!("Failed to open {}", p.display()))?
                .read_to_string(&mut text)
                .with_context(|| format!("Failed to read {}", p.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
        }
    }
    Ok(text)
}

fn print_report(report: &CheckReport) {
    if report.is_clean() {
        println!("No grammar issues found.");
        return;
    }

    let summary: Vec<String> = report
        .category_counts()
        .iter()
        .map(|(category, count)| format!("{}: {}", category, count))
        .collect();
    println!("Found {} issues ({})", report.issues.len(), summary.join(", "));

    for issue in &report.issues {
        println!();
        println!("[{}] {}", issue.category, issue.message);
        println!("  context: ...{}...", issue.context);
        if issue.replacements.is_empty() {
            println!("  no automatic suggestions");
        } else {
            println!("  suggestions: {}", issue.replacements.join(", "));
        }
    }

    for skipped in &report.skipped_corrections {
        eprintln!(
            "Skipped overlapping suggestion {:?} at offset {}",
            skipped.replacement_text, skipped.offset
        );
    }
}

fn print_stats(stats: &TextStats) {
    println!(
        "Words: {}  Sentences: {}  Avg words/sentence: {}",
        stats.words, stats.sentences, stats.avg_words_per_sentence
    );
}

/// Write to `path` when given, otherwise print to stdout.
fn emit(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) => write_output(p, content),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
