//! Segmenters, one per structure kind.
//!
//! Each takes a body and returns its sections in document order. Text before
//! the first header is discarded and section content is trimmed.

use std::collections::HashSet;

use super::Section;
use super::patterns::{
    CHAPTER_HEADER, LETTER_CONTENTS, LETTER_HEADER, PART_HEADER, ROMAN_HEADER, headers_before_prose,
};
use super::roman;

/// A matched header: byte span of the header line and its section title.
struct Header {
    start: usize,
    end: usize,
    title: String,
}

/// Split an epistolary body on `Letter N` lines.
///
/// A `CONTENTS` listing in front of the letters is skipped by restarting at
/// the first `Letter 1` after it that is not itself a listing entry.
pub fn split_letters(body: &str) -> Vec<Section> {
    let text = skip_letter_contents(body);
    let headers: Vec<Header> = letter_headers(text).collect();
    sections_between(text, &headers)
}

/// Split on `PART <roman>` lines, then on chapter headers within each part.
pub fn split_parts(body: &str) -> Vec<Section> {
    let parts: Vec<Header> = PART_HEADER
        .captures_iter(body)
        .filter_map(|caps| {
            let line = caps.get(0)?;
            let numeral = caps.get(2)?.as_str();
            roman::parse(&numeral.to_uppercase())?;
            Some(Header {
                start: line.start(),
                end: line.end(),
                title: format!("{} {}", &caps[1], numeral),
            })
        })
        .collect();

    let mut sections = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let end = parts.get(i + 1).map(|next| next.start).unwrap_or(body.len());
        let part_body = body[part.end..end].trim();

        let chapters = split_headed_lines(part_body, chapter_title, false);
        if chapters.is_empty() {
            log::debug!("{} has no chapter headers", part.title);
        }
        sections.extend(
            chapters
                .into_iter()
                .map(|chapter| chapter.in_part(&part.title)),
        );
    }

    sections
}

/// Split on `Chapter N[.:] Title` lines, suppressing repeated titles.
pub fn split_chapters(body: &str) -> Vec<Section> {
    split_headed_lines(body, chapter_title, true)
}

/// Split on `XIV. Title` lines, suppressing repeated titles.
pub fn split_roman(body: &str) -> Vec<Section> {
    split_headed_lines(body, roman_title, true)
}

fn letter_headers(text: &str) -> impl Iterator<Item = Header> + '_ {
    LETTER_HEADER.captures_iter(text).filter_map(|caps| {
        let line = caps.get(0)?;
        let digits = caps.get(1)?.as_str();
        let number = digits
            .parse::<u32>()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| digits.to_string());
        Some(Header {
            start: line.start(),
            end: line.end(),
            title: format!("Letter {}", number),
        })
    })
}

fn skip_letter_contents(body: &str) -> &str {
    let Some(contents) = LETTER_CONTENTS.find(body) else {
        return body;
    };

    let headers: Vec<Header> = letter_headers(body).collect();
    if headers.len() < 2 {
        return body;
    }

    let first_letters: Vec<&Header> = headers.iter().filter(|h| h.title == "Letter 1").collect();
    match first_letters.first() {
        Some(first) if contents.start() < first.start => {}
        _ => return body,
    }

    // A listed `Letter 1` is followed by more headers, the real one by prose
    let after_contents: Vec<&&Header> = first_letters
        .iter()
        .filter(|h| h.start > contents.end())
        .collect();
    after_contents
        .iter()
        .find(|h| headers_before_prose(&body[h.end..]) == 0)
        .or(after_contents.first())
        .map(|h| &body[h.start..])
        .unwrap_or(body)
}

/// Sections from pre-located headers; content runs to the next header.
fn sections_between(text: &str, headers: &[Header]) -> Vec<Section> {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let end = headers.get(i + 1).map(|next| next.start).unwrap_or(text.len());
            Section::new(header.title.clone(), text[header.end..end].trim())
        })
        .collect()
}

/// Line scanner: a line for which `parse` yields a title starts a section,
/// every other line is content of the current one.
fn split_headed_lines(
    text: &str,
    parse: fn(&str) -> Option<String>,
    suppress_duplicates: bool,
) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        match parse(line) {
            Some(title) => {
                if suppress_duplicates && !seen.insert(title.to_lowercase()) {
                    log::debug!("Skipping repeated header \"{}\"", title);
                    continue;
                }
                if let Some((title, lines)) = current.take() {
                    sections.push(Section::new(title, lines.join("\n").trim()));
                }
                current = Some((title, Vec::new()));
            }
            None => {
                if let Some((_, lines)) = current.as_mut() {
                    lines.push(line);
                }
            }
        }
    }

    if let Some((title, lines)) = current {
        sections.push(Section::new(title, lines.join("\n").trim()));
    }

    sections
}

fn chapter_title(line: &str) -> Option<String> {
    let caps = CHAPTER_HEADER.captures(line)?;
    let trailing = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
    if trailing.is_empty() {
        // Bare header: the token itself is the title
        Some(collapse_spaces(&caps[1]))
    } else {
        Some(trailing.to_string())
    }
}

fn roman_title(line: &str) -> Option<String> {
    let caps = ROMAN_HEADER.captures(line)?;
    let numeral = caps.get(1)?.as_str();
    roman::parse(numeral)?;
    let trailing = caps[2].trim();
    if trailing.is_empty() {
        Some(numeral.to_string())
    } else {
        Some(trailing.to_string())
    }
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
