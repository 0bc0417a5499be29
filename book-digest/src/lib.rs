//! book-digest: chapter detection and summarized markdown digests for
//! plain-text books.
//!
//! [`structure`] turns a raw book into titled sections, [`digest`] runs each
//! section through a [`summarize::Summarizer`] and [`output`] writes the
//! result as markdown.

pub mod config;
pub mod digest;
pub mod output;
pub mod structure;
pub mod summarize;
pub mod text;

pub use config::DigestConfig;
pub use digest::{DigestEntry, DigestReport, DigestSettings, SkipReason, SkippedSection, summarize_sections};
pub use output::{render_markdown, write_digest};
pub use structure::{Fallback, Outcome, Outline, Section, StructureKind, assemble, parse_book};
pub use summarize::{SummaryLimits, Summarizer, WindowSettings, summarize_long_text};
