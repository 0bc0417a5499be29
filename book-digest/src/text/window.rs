//! Overlapping word-budget windows over long passages.

use super::seams::split_into_sentences;
use super::word_count;

/// A sentence (or a word-boundary piece of one) with its word count.
struct Unit {
    text: String,
    words: usize,
}

/// Split `text` into roughly equal windows of at most `budget_words` words.
///
/// Windows are packed from whole sentences toward a target of
/// `ceil(total / ceil(total / budget))` words. Each window after the first
/// opens with the trailing sentences of its predecessor, up to
/// `overlap_words` words (at most half the budget).
pub fn split_windows(text: &str, budget_words: usize, overlap_words: usize) -> Vec<String> {
    let total = word_count(text);
    if total == 0 {
        return Vec::new();
    }

    let budget = budget_words.max(1);
    if total <= budget {
        return vec![text.trim().to_string()];
    }

    let overlap = overlap_words.min(budget / 2);
    let count = total.div_ceil(budget);
    let target = total.div_ceil(count);

    let units = sentence_units(text, target);
    log::debug!(
        "Windowing {} words into ~{} windows of {} (overlap {})",
        total,
        count,
        target,
        overlap
    );

    let mut windows = Vec::new();
    let mut current: Vec<&Unit> = Vec::new();
    let mut current_words = 0;
    let mut fresh_words = 0;

    for unit in &units {
        let over_target = fresh_words + unit.words > target;
        let over_budget = current_words + unit.words > budget;
        if fresh_words > 0 && (over_target || over_budget) {
            windows.push(join(&current));

            current = carry_over(&current, overlap, budget - unit.words);
            current_words = current.iter().map(|u| u.words).sum();
            fresh_words = 0;
        }
        current.push(unit);
        current_words += unit.words;
        fresh_words += unit.words;
    }

    if fresh_words > 0 {
        windows.push(join(&current));
    }

    windows
}

/// Sentences of `text`, with any sentence longer than `max_words` cut on
/// word boundaries.
fn sentence_units(text: &str, max_words: usize) -> Vec<Unit> {
    let mut units = Vec::new();
    for sentence in split_into_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if words.len() <= max_words {
            units.push(Unit {
                words: words.len(),
                text: sentence,
            });
        } else {
            units.extend(words.chunks(max_words).map(|piece| Unit {
                text: piece.join(" "),
                words: piece.len(),
            }));
        }
    }
    units
}

/// Trailing units of a closed window worth at most `overlap` words and at
/// most `room` words, so the next unit still fits in the budget.
fn carry_over<'a>(window: &[&'a Unit], overlap: usize, room: usize) -> Vec<&'a Unit> {
    let limit = overlap.min(room);
    let mut carried = Vec::new();
    let mut words = 0;

    for unit in window.iter().rev() {
        if words + unit.words > limit {
            break;
        }
        words += unit.words;
        carried.push(*unit);
    }

    carried.reverse();
    carried
}

fn join(units: &[&Unit]) -> String {
    units
        .iter()
        .map(|u| u.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_word_sentences(n: usize) -> Vec<String> {
        (1..=n)
            .map(|i| format!("Sentence {} has exactly ten words in it, no more.", i))
            .collect()
    }

    #[test]
    fn test_blank_text_has_no_windows() {
        assert!(split_windows("", 100, 10).is_empty());
        assert!(split_windows("  \n\t", 100, 10).is_empty());
    }

    #[test]
    fn test_short_text_is_one_window() {
        let windows = split_windows("  A short passage.  ", 100, 10);
        assert_eq!(windows, vec!["A short passage."]);
    }

    #[test]
    fn test_windows_stay_within_budget() {
        let sentences = ten_word_sentences(10);
        let windows = split_windows(&sentences.join(" "), 30, 10);

        assert!(windows.len() > 1);
        for window in &windows {
            assert!(word_count(window) <= 30, "window too long: {}", window);
        }
        for sentence in &sentences {
            assert!(
                windows.iter().any(|w| w.contains(sentence.as_str())),
                "missing: {}",
                sentence
            );
        }
    }

    #[test]
    fn test_windows_overlap_by_trailing_sentence() {
        let sentences = ten_word_sentences(10);
        let windows = split_windows(&sentences.join(" "), 30, 10);

        for pair in windows.windows(2) {
            let previous_last = sentences
                .iter()
                .find(|s| pair[0].ends_with(s.as_str()))
                .map(String::as_str);
            let Some(last) = previous_last else {
                panic!("window does not end on a sentence: {}", pair[0]);
            };
            assert!(pair[1].starts_with(last));
        }
    }

    #[test]
    fn test_no_overlap_partitions_text() {
        let sentences = ten_word_sentences(9);
        let windows = split_windows(&sentences.join(" "), 40, 0);

        let total: usize = windows.iter().map(|w| word_count(w)).sum();
        assert_eq!(total, 90);
        assert_eq!(windows.len(), 3);
    }

    #[test]
    fn test_long_sentence_split_on_words() {
        let words: Vec<String> = (1..=70).map(|i| format!("w{}", i)).collect();
        let windows = split_windows(&words.join(" "), 30, 0);

        assert!(windows.len() >= 3);
        for window in &windows {
            assert!(word_count(window) <= 30);
        }
        let total: usize = windows.iter().map(|w| word_count(w)).sum();
        assert_eq!(total, 70);
    }

    #[test]
    fn test_overlap_clamped_to_half_budget() {
        let sentences = ten_word_sentences(12);
        let windows = split_windows(&sentences.join(" "), 20, 100);
        for window in &windows {
            assert!(word_count(window) <= 20);
        }
    }
}
