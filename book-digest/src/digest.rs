//! Section-by-section summarization of a parsed book.

use futures_util::StreamExt;
use futures_util::stream;
use std::fmt;

use crate::structure::Section;
use crate::summarize::{Summarizer, WindowSettings, summarize_long_text};

/// A summarized section, ready for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub title: String,
    pub part: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Content below the minimum length, in characters
    TooShort { chars: usize },
    /// Summarization failed; holds the error message
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { chars } => write!(f, "too short ({} chars)", chars),
            Self::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSection {
    pub title: String,
    pub reason: SkipReason,
}

/// Entries and skips, both in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestReport {
    pub entries: Vec<DigestEntry>,
    pub skipped: Vec<SkippedSection>,
}

impl DigestReport {
    pub fn too_short_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::TooShort { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Failed(_)))
            .count()
    }
}

/// Runtime settings for a digest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestSettings {
    pub window: WindowSettings,
    /// Sections with fewer characters are not summarized
    pub min_section_chars: usize,
    /// Sections summarized at the same time (at least 1)
    pub concurrency: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            min_section_chars: 500,
            concurrency: 1,
        }
    }
}

/// Summarize every section long enough to be worth it.
///
/// Failures are logged and recorded as skips; the run always completes.
/// `on_progress` is called once per section, in document order.
pub async fn summarize_sections<F>(
    summarizer: &Summarizer,
    sections: &[Section],
    settings: &DigestSettings,
    mut on_progress: F,
) -> DigestReport
where
    F: FnMut(&Section),
{
    let window = settings.window;
    let min_chars = settings.min_section_chars;

    let tasks = sections.iter().map(|section| async move {
        let content = section.content.trim();
        let chars = content.chars().count();
        if chars < min_chars {
            log::debug!("Skipping \"{}\": {} chars", section.title, chars);
            return (section, Err(SkipReason::TooShort { chars }));
        }

        match summarize_long_text(summarizer, content, &window).await {
            Ok(summary) if summary.trim().is_empty() => {
                log::error!("Empty summary for \"{}\"", section.title);
                (section, Err(SkipReason::Failed("empty summary".to_string())))
            }
            Ok(summary) => (section, Ok(summary)),
            Err(e) => {
                log::error!("Failed to summarize \"{}\": {}", section.title, e);
                (section, Err(SkipReason::Failed(e.to_string())))
            }
        }
    });

    let mut report = DigestReport::default();
    let mut results = stream::iter(tasks).buffered(settings.concurrency.max(1));
    while let Some((section, result)) = results.next().await {
        match result {
            Ok(summary) => report.entries.push(DigestEntry {
                title: section.title.clone(),
                part: section.part.clone(),
                summary,
            }),
            Err(reason) => report.skipped.push(SkippedSection {
                title: section.title.clone(),
                reason,
            }),
        }
        on_progress(section);
    }

    report
}
