//! Chapter structure detection and segmentation for plain-text books.
//!
//! The pipeline is strip → detect → segment: [`strip::strip`] isolates the
//! narrative body, [`detect::detect`] classifies its chaptering convention and
//! [`assemble`] dispatches to the matching segmenter. Nothing here fails;
//! degraded paths are reported as [`Fallback`]s on the returned [`Outcome`].

pub mod detect;
mod patterns;
pub mod roman;
pub mod segment;
pub mod strip;

use serde::Serialize;
use std::fmt;

pub use detect::detect;
pub use strip::strip;

/// The book-wide chaptering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// `Letter 1`, `Letter 2`, ... (epistolary novels)
    LetterNumbered,
    /// `PART I` headers with `Chapter N` headers inside each part
    MultiTierParts,
    /// `Chapter 1`, `Chapter 2: Title`, ...
    ChapterNumbered,
    /// `I. Title`, `II. Title`, ...
    RomanNumeral,
    /// No convention matched
    Unknown,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LetterNumbered => "letter-numbered",
            Self::MultiTierParts => "multi-tier parts",
            Self::ChapterNumbered => "chapter-numbered",
            Self::RomanNumeral => "roman-numeral",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One titled unit of text: a chapter, letter or roman-numbered section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Title derived from the header line, never empty
    pub title: String,
    /// Text between this header and the next, trimmed
    pub content: String,
    /// Enclosing `PART` label, only for multi-tier books
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            part: None,
        }
    }

    /// Tag the section with its enclosing part.
    pub fn in_part(mut self, part: impl Into<String>) -> Self {
        self.part = Some(part.into());
        self
    }

    pub fn word_count(&self) -> usize {
        crate::text::word_count(&self.content)
    }
}

/// A degraded-but-defined path taken while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// Neither license marker was found; the whole text is the body
    NoBoilerplateMarkers,
    /// Only an end marker was found
    MissingStartMarker,
    /// Only a start marker was found
    MissingEndMarker,
    /// No first part/chapter/letter header; front matter was kept
    NoFirstUnitHeader,
    /// No chaptering convention matched
    UnknownStructure,
    /// A convention matched but produced no sections
    NoSections,
}

impl Fallback {
    fn describe(&self) -> &'static str {
        match self {
            Self::NoBoilerplateMarkers => "no boilerplate markers found, using the full text",
            Self::MissingStartMarker => "no start marker found, keeping text before the end marker",
            Self::MissingEndMarker => "no end marker found, keeping text after the start marker",
            Self::NoFirstUnitHeader => "no first chapter header found, front matter kept",
            Self::UnknownStructure => "no chapter structure detected",
            Self::NoSections => "structure detected but no sections could be split",
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoBoilerplateMarkers => "no-boilerplate-markers",
            Self::MissingStartMarker => "missing-start-marker",
            Self::MissingEndMarker => "missing-end-marker",
            Self::NoFirstUnitHeader => "no-first-unit-header",
            Self::UnknownStructure => "unknown-structure",
            Self::NoSections => "no-sections",
        };
        f.write_str(reason)
    }
}

/// A parse result together with the fallbacks taken to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub fallbacks: Vec<Fallback>,
}

impl<T> Outcome<T> {
    /// Wrap a value, logging every fallback as a warning.
    pub fn new(value: T, fallbacks: Vec<Fallback>) -> Self {
        for fallback in &fallbacks {
            log::warn!("{}", fallback.describe());
        }
        Self { value, fallbacks }
    }

    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    /// `succeeded` or `succeeded-with-fallback:<reason>[,<reason>...]`
    pub fn status(&self) -> String {
        if self.fallbacks.is_empty() {
            return "succeeded".to_string();
        }
        let reasons: Vec<String> = self.fallbacks.iter().map(Fallback::to_string).collect();
        format!("succeeded-with-fallback:{}", reasons.join(","))
    }
}

/// The segmented book: its convention and sections in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub kind: StructureKind,
    pub sections: Vec<Section>,
}

/// Detect the convention of `body` and split it into sections.
///
/// Multi-tier books come back flattened, each chapter tagged with its part.
pub fn assemble(body: &str) -> Outcome<Outline> {
    let kind = detect(body);
    log::info!("Detected {} structure", kind);

    let sections = match kind {
        StructureKind::LetterNumbered => segment::split_letters(body),
        StructureKind::MultiTierParts => segment::split_parts(body),
        StructureKind::ChapterNumbered => segment::split_chapters(body),
        StructureKind::RomanNumeral => segment::split_roman(body),
        StructureKind::Unknown => Vec::new(),
    };

    let mut fallbacks = Vec::new();
    if kind == StructureKind::Unknown {
        fallbacks.push(Fallback::UnknownStructure);
    } else if sections.is_empty() {
        fallbacks.push(Fallback::NoSections);
    }

    Outcome::new(Outline { kind, sections }, fallbacks)
}

/// Strip a raw book and assemble its sections.
pub fn parse_book(raw: &str) -> Outcome<Outline> {
    let stripped = strip(raw);
    let assembled = assemble(&stripped.value);

    let mut fallbacks = stripped.fallbacks;
    fallbacks.extend(assembled.fallbacks);

    Outcome {
        value: assembled.value,
        fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_assemble_numbered_chapters() {
        let body = "Chapter 1\nCall me Ishmael...\nChapter 2\nSome years ago...\nChapter 3\nWhenever I find myself...";
        let outcome = assemble(body);
        let sections = &outcome.value.sections;

        assert_eq!(outcome.value.kind, StructureKind::ChapterNumbered);
        assert_eq!(sections.len(), 3);
        assert!(sections[0].title.to_lowercase().starts_with("chapter 1"));
        assert!(sections[0].content.to_lowercase().contains("ishmael"));
        assert!(sections[1].content.contains("Some years ago..."));
        assert!(!outcome.is_degraded());
    }

    #[test]
    fn test_assemble_parts() {
        let body = "PART I\nChapter 1. Arrival\nText A\nPART II\nChapter 1. Departure\nText B";
        let outline = assemble(body).value;

        assert_eq!(outline.kind, StructureKind::MultiTierParts);
        assert_eq!(outline.sections.len(), 2);
        assert_eq!(outline.sections[0].title, "Arrival");
        assert_eq!(outline.sections[0].part.as_deref(), Some("PART I"));
        assert_eq!(outline.sections[1].title, "Departure");
        assert_eq!(outline.sections[1].part.as_deref(), Some("PART II"));
    }

    #[test]
    fn test_assemble_letters_with_contents() {
        let body = "CONTENTS\nLetter 1\nLetter 2\n\nLetter 1\nDear sister.\nLetter 2\nStill at sea.";
        let outline = assemble(body).value;

        assert_eq!(outline.kind, StructureKind::LetterNumbered);
        assert_eq!(outline.sections.len(), 2);
        assert_eq!(outline.sections[0].content, "Dear sister.");
    }

    #[test]
    fn test_letters_take_priority_over_chapters() {
        let body = "Letter 1\nTo Mrs. Saville.\nChapter 1\nI am by birth a Genevese.";
        let outline = assemble(body).value;
        assert_eq!(outline.kind, StructureKind::LetterNumbered);
        assert_eq!(outline.sections.len(), 1);
        assert!(outline.sections.iter().all(|s| s.part.is_none()));
    }

    #[test]
    fn test_unknown_structure_is_empty_not_error() {
        let outcome = assemble("Just some prose with no headers at all.");
        assert_eq!(outcome.value.kind, StructureKind::Unknown);
        assert!(outcome.value.sections.is_empty());
        assert_eq!(outcome.fallbacks, vec![Fallback::UnknownStructure]);
        assert_eq!(outcome.status(), "succeeded-with-fallback:unknown-structure");
    }

    #[test]
    fn test_parts_without_chapters_report_no_sections() {
        let outcome = assemble("PART I\nA prologue only.\nPART II\nAn epilogue only.");
        assert_eq!(outcome.value.kind, StructureKind::MultiTierParts);
        assert!(outcome.value.sections.is_empty());
        assert_eq!(outcome.fallbacks, vec![Fallback::NoSections]);
    }

    #[test]
    fn test_parse_book_end_to_end() {
        let raw = "The Project Gutenberg eBook of Moby Dick\r\n\
                   *** START OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***\r\n\
                   CONTENTS\r\nCHAPTER 1. Loomings.\r\nCHAPTER 2. The Carpet-Bag.\r\n\r\n\
                   CHAPTER 1. Loomings.\r\nCall me Ishmael.\r\n\r\n\
                   CHAPTER 2. The Carpet-Bag.\r\nI stuffed a shirt or two.\r\n\
                   *** END OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***\r\nLicense";
        let outcome = parse_book(raw);
        let outline = outcome.value;

        assert!(outcome.fallbacks.is_empty());
        assert_eq!(outline.kind, StructureKind::ChapterNumbered);
        let titles: Vec<&str> = outline.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Loomings.", "The Carpet-Bag."]);
        assert_eq!(outline.sections[0].content, "Call me Ishmael.");
        assert_eq!(outline.sections[1].content, "I stuffed a shirt or two.");
    }

    #[test]
    fn test_parse_book_collects_all_fallbacks() {
        let outcome = parse_book("No markers and no structure.");
        assert_eq!(
            outcome.fallbacks,
            vec![
                Fallback::NoBoilerplateMarkers,
                Fallback::NoFirstUnitHeader,
                Fallback::UnknownStructure
            ]
        );
    }

    #[test]
    fn test_outline_serializes() {
        let outline = assemble("Chapter 1. Start\nText").value;
        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(json["kind"], "chapter_numbered");
        assert_eq!(json["sections"][0]["title"], "Start");
        assert!(json["sections"][0].get("part").is_none());
    }

    proptest! {
        #[test]
        fn prop_sequential_chapters_split_exactly(
            // Leading letters that could open a header line are excluded
            bodies in proptest::collection::vec(
                "[abd-kmnoq-z][a-z]{0,7}( [abd-kmnoq-z][a-z]{0,7}){0,6}",
                1..12
            )
        ) {
            let text: String = bodies
                .iter()
                .enumerate()
                .map(|(i, body)| format!("Chapter {}: Title {}\n{}\n", i + 1, i + 1, body))
                .collect();

            let outline = assemble(&text).value;
            prop_assert_eq!(outline.kind, StructureKind::ChapterNumbered);
            prop_assert_eq!(outline.sections.len(), bodies.len());
            for (i, (section, body)) in outline.sections.iter().zip(&bodies).enumerate() {
                prop_assert_eq!(&section.title, &format!("Title {}", i + 1));
                prop_assert_eq!(&section.content, body);
            }
        }
    }
}
