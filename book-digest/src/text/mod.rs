//! Text utilities: cleaning, sentence splitting, windowing and wrapping.

pub mod cleaner;
pub mod seams;
pub mod window;
pub mod wrap;

pub use window::split_windows;
pub use wrap::fill;

/// Number of whitespace separated words, the length unit used throughout.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
