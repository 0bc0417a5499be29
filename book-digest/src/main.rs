//! book-digest - Summarize plain-text books chapter by chapter into markdown

use anyhow::{Context, Result};
use book_digest::summarize::PROGRAM_NAME;
use book_digest::{DigestConfig, Outline, Section, Summarizer, parse_book, summarize_sections, write_digest};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use llm_client::{Config, ModelPreset, ProviderKind};
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "book-digest")]
#[command(about = "Detect the chapters of a plain-text book and write a summarized markdown digest", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the plain-text book
    book: Option<PathBuf>,

    /// Output file path (default: <book-name>.md)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model preset to use (overrides default from config)
    #[arg(short, long)]
    model: Option<String>,

    /// Section range to summarize, zero-based and inclusive (e.g., "0-10")
    #[arg(long)]
    chapters: Option<String>,

    /// Print the detected structure and section titles without summarizing
    #[arg(long)]
    outline: bool,

    /// Print the outline as JSON
    #[arg(long, requires = "outline")]
    json: bool,

    /// Sections summarized concurrently (overrides config)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Column width of the markdown output (overrides config)
    #[arg(long)]
    width: Option<usize>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// List available model presets
    List,
    /// Set the default model preset
    SetDefault {
        /// Name of the preset to use as default
        preset: String,
    },
    /// Add a new model preset
    AddPreset {
        /// Preset name
        name: String,
        /// Provider (ollama, anthropic, openrouter, cerebras)
        #[arg(short, long)]
        provider: String,
        /// Model identifier
        #[arg(short = 'M', long)]
        model: String,
    },
    /// Set the default output width
    SetWidth {
        /// Columns
        width: usize,
    },
    /// Set the summarization window size
    SetWindow {
        /// Words per window
        words: usize,
        /// Words shared between consecutive windows
        #[arg(long)]
        overlap: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let book_path = args
        .book
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Book path is required. Run 'book-digest --help' for usage."))?;

    let raw = std::fs::read_to_string(&book_path)
        .with_context(|| format!("Failed to read book: {}", book_path.display()))?;

    let parsed = parse_book(&raw);
    let outline = &parsed.value;
    log::info!(
        "{}: {} structure, {} sections ({})",
        book_path.display(),
        outline.kind,
        outline.sections.len(),
        parsed.status()
    );

    if args.outline {
        return print_outline(outline, &parsed.status(), args.json);
    }

    if outline.sections.is_empty() {
        log::warn!("No sections detected in {}, nothing written", book_path.display());
        return Ok(());
    }

    let mut config = DigestConfig::load().context("Failed to load configuration")?;
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(width) = args.width {
        config.wrap_width = width;
    }

    let range = parse_chapter_range(&args.chapters, outline.sections.len())?;
    let sections = &outline.sections[range.clone()];
    if sections.is_empty() {
        log::warn!("Section range {:?} selects nothing, nothing written", args.chapters);
        return Ok(());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&book_path));
    log::debug!("Output: {}", output_path.display());
    log::debug!("Sections {}..{} of {}", range.start, range.end, outline.sections.len());

    let summarizer = Summarizer::from_config(args.model.as_deref(), config.retry_policy())?;

    let pb = ProgressBar::new(sections.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let report = summarize_sections(&summarizer, sections, &config.digest_settings(), |section| {
        pb.set_message(section.title.clone());
        pb.inc(1);
    })
    .await;
    pb.finish_and_clear();

    if report.entries.is_empty() {
        log::warn!("No section could be summarized, nothing written");
    } else {
        write_digest(&output_path, &report.entries, config.wrap_width)?;
        eprintln!("Output: {}", output_path.display());
    }

    eprintln!(
        "Sections: {} written, {} skipped (too short), {} failed",
        report.entries.len(),
        report.too_short_count(),
        report.failed_count()
    );
    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// `<book stem>.md` next to the book.
fn default_output_path(book: &Path) -> PathBuf {
    let stem = book.file_stem().unwrap_or_default();
    book.with_file_name(format!("{}.md", stem.to_string_lossy()))
}

/// Parse a zero-based inclusive range like "0-10" or "5", clamped to `total`.
fn parse_chapter_range(range: &Option<String>, total: usize) -> Result<Range<usize>> {
    let Some(r) = range else {
        return Ok(0..total);
    };

    let (start, end) = match r.split_once('-') {
        Some((start, end)) => {
            let start: usize = start.trim().parse().context("Invalid start chapter")?;
            let end: usize = end.trim().parse().context("Invalid end chapter")?;
            (start, end)
        }
        None => {
            let chapter: usize = r.trim().parse().context("Invalid chapter number")?;
            (chapter, chapter)
        }
    };

    if start > end {
        anyhow::bail!("Invalid chapter range '{}': start is after end", r);
    }
    Ok(start.min(total)..end.saturating_add(1).min(total))
}

fn print_outline(outline: &Outline, status: &str, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "kind": outline.kind,
            "status": status,
            "sections": outline.sections.iter().map(outline_row).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Structure: {}", outline.kind);
    println!("Status: {}", status);
    println!("Sections: {}", outline.sections.len());
    for (i, section) in outline.sections.iter().enumerate() {
        match &section.part {
            Some(part) => println!(
                "  {:>3}  {} / {} ({} words)",
                i,
                part,
                section.title,
                section.word_count()
            ),
            None => println!("  {:>3}  {} ({} words)", i, section.title, section.word_count()),
        }
    }
    Ok(())
}

fn outline_row(section: &Section) -> serde_json::Value {
    serde_json::json!({
        "title": section.title,
        "part": section.part,
        "words": section.word_count(),
    })
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let llm_config = Config::load()?;
            let config = DigestConfig::load()?;
            println!("Configuration file: {}", DigestConfig::config_path()?.display());
            println!("LLM configuration file: {}", Config::config_path()?.display());
            println!();
            println!("preset = \"{}\"", llm_config.get_default_for_program(PROGRAM_NAME));
            println!("window_words = {}", config.window_words);
            println!("overlap_words = {}", config.overlap_words);
            println!("reduce_threshold_words = {}", config.reduce_threshold_words);
            println!("min_section_chars = {}", config.min_section_chars);
            println!("wrap_width = {}", config.wrap_width);
            println!("concurrency = {}", config.concurrency);
            println!("max_attempts = {}", config.max_attempts);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let current_default = config.get_default_for_program(PROGRAM_NAME);
            println!("Available presets:");
            for (name, preset) in &config.presets {
                let default_marker = if name == current_default {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "  {} - {} / {}{}",
                    name, preset.provider, preset.model, default_marker
                );
            }
        }
        ConfigAction::SetDefault { preset } => {
            let mut config = Config::load()?;
            config.get_preset(preset)?;
            config
                .defaults
                .insert(PROGRAM_NAME.to_string(), preset.clone());
            config.save()?;
            println!("Default preset for {} set to: {}", PROGRAM_NAME, preset);
        }
        ConfigAction::AddPreset {
            name,
            provider,
            model,
        } => {
            ProviderKind::parse(provider)?;
            let mut config = Config::load()?;
            config.presets.insert(
                name.clone(),
                ModelPreset {
                    provider: provider.clone(),
                    model: model.clone(),
                },
            );
            config.save()?;
            println!("Added preset: {}", name);
        }
        ConfigAction::SetWidth { width } => {
            if *width == 0 {
                anyhow::bail!("Width must be at least 1");
            }
            let mut config = DigestConfig::load()?;
            config.wrap_width = *width;
            config.save()?;
            println!("Default output width set to: {}", width);
        }
        ConfigAction::SetWindow { words, overlap } => {
            if *words == 0 {
                anyhow::bail!("Window size must be at least 1 word");
            }
            let mut config = DigestConfig::load()?;
            config.window_words = *words;
            if let Some(overlap) = overlap {
                config.overlap_words = *overlap;
            }
            config.save()?;
            println!(
                "Window set to {} words with {} words of overlap",
                config.window_words, config.overlap_words
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chapter_range() {
        assert_eq!(parse_chapter_range(&None, 10).unwrap(), 0..10);
        assert_eq!(parse_chapter_range(&Some("2-4".into()), 10).unwrap(), 2..5);
        assert_eq!(parse_chapter_range(&Some("3".into()), 10).unwrap(), 3..4);
    }

    #[test]
    fn test_parse_chapter_range_clamps() {
        assert_eq!(parse_chapter_range(&Some("8-20".into()), 10).unwrap(), 8..10);
        assert_eq!(parse_chapter_range(&Some("15".into()), 10).unwrap(), 10..10);
    }

    #[test]
    fn test_parse_chapter_range_rejects_garbage() {
        assert!(parse_chapter_range(&Some("a-b".into()), 10).is_err());
        assert!(parse_chapter_range(&Some("5-2".into()), 10).is_err());
        assert!(parse_chapter_range(&Some("1-2-3".into()), 10).is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/books/moby-dick.txt")),
            PathBuf::from("/books/moby-dick.md")
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["book-digest", "moby.txt", "--outline", "--json"]);
        assert_eq!(args.book, Some(PathBuf::from("moby.txt")));
        assert!(args.outline && args.json);

        let args = Args::parse_from(["book-digest", "config", "set-window", "300", "--overlap", "30"]);
        assert!(matches!(
            args.command,
            Some(Commands::Config {
                action: ConfigAction::SetWindow {
                    words: 300,
                    overlap: Some(30)
                }
            })
        ));
    }
}
