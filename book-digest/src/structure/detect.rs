//! Structure detection: which chaptering convention a body follows.

use super::StructureKind;
use super::patterns::{CHAPTER_HEADER, LETTER_HEADER, PART_HEADER, ROMAN_HEADER};
use super::roman;

/// Classify a body. The more specific conventions are tested first, so an
/// epistolary novel with `Chapter` headers still counts as letter-numbered.
pub fn detect(body: &str) -> StructureKind {
    if LETTER_HEADER.is_match(body) {
        StructureKind::LetterNumbered
    } else if has_part_header(body) {
        StructureKind::MultiTierParts
    } else if CHAPTER_HEADER.is_match(body) {
        StructureKind::ChapterNumbered
    } else if has_roman_header(body) {
        StructureKind::RomanNumeral
    } else {
        StructureKind::Unknown
    }
}

fn has_part_header(body: &str) -> bool {
    PART_HEADER
        .captures_iter(body)
        .any(|caps| roman::parse(&caps[2].to_uppercase()).is_some())
}

fn has_roman_header(body: &str) -> bool {
    ROMAN_HEADER
        .captures_iter(body)
        .any(|caps| roman::parse(&caps[1]).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_letters() {
        assert_eq!(
            detect("Letter 1\nDear sister,\nLetter 2\nStill at sea."),
            StructureKind::LetterNumbered
        );
    }

    #[test]
    fn test_letters_win_over_chapters() {
        let body = "Letter 1\nTo Mrs. Saville.\nChapter 1\nI am by birth a Genevese.";
        assert_eq!(detect(body), StructureKind::LetterNumbered);
    }

    #[test]
    fn test_parts_win_over_chapters() {
        let body = "PART I\nChapter 1. Arrival\nText A\nPART II\nChapter 1. Departure\nText B";
        assert_eq!(detect(body), StructureKind::MultiTierParts);
    }

    #[test]
    fn test_detect_chapters() {
        assert_eq!(
            detect("Chapter 1\nCall me Ishmael.\nChapter 2\nSome years ago."),
            StructureKind::ChapterNumbered
        );
    }

    #[test]
    fn test_detect_roman() {
        let body = "I. A Scandal in Bohemia\nTo Sherlock Holmes...\nII. The Red-Headed League\n";
        assert_eq!(detect(body), StructureKind::RomanNumeral);
    }

    #[test]
    fn test_numeral_lookalike_words_are_not_roman_headers() {
        assert_eq!(detect("CIVIL. War was coming."), StructureKind::Unknown);
    }

    #[test]
    fn test_part_with_bad_numeral_is_not_a_part() {
        assert_eq!(detect("PART IIII\nSomething"), StructureKind::Unknown);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(
            detect("Once upon a time there was no markup at all."),
            StructureKind::Unknown
        );
        assert_eq!(detect(""), StructureKind::Unknown);
    }
}
