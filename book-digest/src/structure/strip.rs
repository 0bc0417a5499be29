//! Boilerplate stripping: license wrappers and front matter before the first unit.

use super::patterns::{CONTENTS_HEADING, END_MARKER, FIRST_UNIT, START_MARKER, headers_before_prose};
use super::{Fallback, Outcome};
use crate::text::cleaner::normalize_line_endings;

/// Isolate the narrative body of a raw book.
///
/// Never fails: missing markers or a missing first-unit header fall back to
/// keeping the text, and the fallback is reported in the outcome.
pub fn strip(raw: &str) -> Outcome<String> {
    let text = normalize_line_endings(raw);
    let mut fallbacks = Vec::new();

    let body = isolate_marked_body(&text, &mut fallbacks);
    let body = skip_front_matter(body, &mut fallbacks);

    Outcome::new(body.to_string(), fallbacks)
}

/// Text between the start and end license markers, trimmed.
fn isolate_marked_body<'a>(text: &'a str, fallbacks: &mut Vec<Fallback>) -> &'a str {
    let start = START_MARKER.find(text);
    let search_from = start.map(|m| m.end()).unwrap_or(0);
    let end = END_MARKER.find_at(text, search_from);

    let body = match (start, end) {
        (Some(s), Some(e)) => &text[s.end()..e.start()],
        (Some(s), None) => {
            fallbacks.push(Fallback::MissingEndMarker);
            &text[s.end()..]
        }
        (None, Some(e)) => {
            fallbacks.push(Fallback::MissingStartMarker);
            &text[..e.start()]
        }
        (None, None) => {
            fallbacks.push(Fallback::NoBoilerplateMarkers);
            text
        }
    };

    body.trim()
}

/// Drop everything before the first part, chapter or letter header.
///
/// When a contents heading precedes the first candidate and that candidate is
/// a listing entry (more header lines follow it before any prose), the cut
/// moves to the first later repeat of the same header that opens real text.
fn skip_front_matter<'a>(body: &'a str, fallbacks: &mut Vec<Fallback>) -> &'a str {
    let candidates: Vec<(usize, String)> = FIRST_UNIT
        .captures_iter(body)
        .filter_map(|caps| {
            let line_start = caps.get(0)?.start();
            let unit = caps.name("unit")?.as_str();
            Some((line_start, unit_key(unit)))
        })
        .collect();

    let Some((first_start, first_key)) = candidates.first() else {
        fallbacks.push(Fallback::NoFirstUnitHeader);
        return body;
    };

    let contents_before = CONTENTS_HEADING
        .find(body)
        .is_some_and(|m| m.start() < *first_start);

    if !contents_before || !is_listing_entry(body, *first_start, first_key) {
        return body[*first_start..].trim();
    }

    let repeats: Vec<usize> = candidates
        .iter()
        .skip(1)
        .filter(|(_, key)| key == first_key)
        .map(|(start, _)| *start)
        .collect();
    let cut = repeats
        .iter()
        .find(|start| !is_listing_entry(body, **start, first_key))
        .or(repeats.first())
        .copied()
        .unwrap_or(*first_start);

    body[cut..].trim()
}

/// A candidate followed by header lines instead of prose. An opening `PART`
/// header may carry its first chapter header on the next line.
fn is_listing_entry(body: &str, line_start: usize, key: &str) -> bool {
    let line_end = body[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(body.len());
    let allowed = usize::from(key.starts_with("part"));
    headers_before_prose(&body[line_end..]) > allowed
}

/// Compare header tokens ignoring case and spacing: `Chapter  1` == `CHAPTER 1`.
fn unit_key(unit: &str) -> String {
    unit.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
