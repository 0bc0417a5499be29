//! Windowed summarization for passages longer than one request.

use super::{SummaryLimits, Summarizer};
use crate::text::{split_windows, word_count};

/// Share of a window's length its summary may take.
const WINDOW_RATIO: f64 = 0.6;
const WINDOW_MAX_FLOOR: usize = 80;
const WINDOW_MIN: usize = 60;
const REDUCE_MAX: usize = 300;
const REDUCE_MIN: usize = 100;

/// How long passages are cut and when partial summaries are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSettings {
    /// Words per window sent to the model
    pub window_words: usize,
    /// Words repeated from the end of the previous window
    pub overlap_words: usize,
    /// Joined partial summaries at or above this length get a reduction pass
    pub reduce_threshold_words: usize,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            window_words: 400,
            overlap_words: 50,
            reduce_threshold_words: 512,
        }
    }
}

fn scaled(words: usize) -> usize {
    (words as f64 * WINDOW_RATIO).round() as usize
}

fn window_limits(window: &str) -> SummaryLimits {
    let max = scaled(word_count(window)).max(WINDOW_MAX_FLOOR);
    SummaryLimits::new(max, WINDOW_MIN)
}

fn reduce_limits(joined: &str) -> SummaryLimits {
    let max = scaled(word_count(joined)).min(REDUCE_MAX);
    SummaryLimits::new(max, REDUCE_MIN)
}

/// Summarize `text` window by window, then reduce if the result is long.
///
/// A failing window is skipped; only when every window fails is the last
/// error returned. A failed reduction returns the joined partial summaries.
pub async fn summarize_long_text(
    summarizer: &Summarizer,
    text: &str,
    settings: &WindowSettings,
) -> llm_client::Result<String> {
    let windows = split_windows(text, settings.window_words, settings.overlap_words);
    if windows.is_empty() {
        return Ok(String::new());
    }

    let mut partials = Vec::with_capacity(windows.len());
    let mut last_error = None;
    for (i, window) in windows.iter().enumerate() {
        log::debug!(
            "Summarizing window {}/{} ({} words)",
            i + 1,
            windows.len(),
            word_count(window)
        );
        match summarizer.summarize(window, window_limits(window)).await {
            Ok(summary) => partials.push(summary),
            Err(e) => {
                log::warn!("Window {}/{} failed: {}", i + 1, windows.len(), e);
                last_error = Some(e);
            }
        }
    }

    if let (true, Some(e)) = (partials.is_empty(), last_error) {
        return Err(e);
    }

    let joined = partials.join(" ");
    if word_count(&joined) < settings.reduce_threshold_words {
        return Ok(joined);
    }

    log::debug!("Reducing {} words of partial summaries", word_count(&joined));
    match summarizer.summarize(&joined, reduce_limits(&joined)).await {
        Ok(reduced) => Ok(reduced),
        Err(e) => {
            log::warn!("Reduction pass failed, keeping partial summaries: {}", e);
            Ok(joined)
        }
    }
}
