//! Header and marker patterns, compiled once on first use.
//!
//! Every pattern is line anchored and assumes `\n` line endings.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("header pattern should compile")
}

/// `*** START OF THE PROJECT GUTENBERG EBOOK MOBY DICK ***` and friends.
pub static START_MARKER: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?im)^[^\n]*\bSTART[ \t]+OF[ \t]+(?:THIS|THE)[ \t]+(?:PROJECT[ \t]+)?GUTENBERG[ \t]+E-?BOOK[^\n]*$",
    )
});

pub static END_MARKER: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?im)^[^\n]*\bEND[ \t]+OF[ \t]+(?:THIS|THE)[ \t]+(?:PROJECT[ \t]+)?GUTENBERG[ \t]+E-?BOOK[^\n]*$",
    )
});

/// A table-of-contents heading of any case.
pub static CONTENTS_HEADING: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?im)^[ \t]*(?:TABLE[ \t]+OF[ \t]+)?CONTENTS\.?[ \t]*$")
});

/// The exact `CONTENTS` line that precedes a letter listing.
pub static LETTER_CONTENTS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*CONTENTS[ \t]*$"));

/// The header that opens the narrative: first part, chapter, letter or roman section.
pub static FIRST_UNIT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?im)^[ \t]*(?P<unit>PART[ \t]+(?:I|ONE)\b|CHAPTER[ \t]+(?:1|I|ONE)\b|LETTER[ \t]+1\b|(?-i:I)\.[ \t])",
    )
});

pub static LETTER_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"(?im)^[ \t]*Letter[ \t]+([0-9]+)[ \t]*$"));

pub static PART_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"(?im)^[ \t]*(PART)[ \t]+([IVXLCDM]+)[ \t]*$"));

/// `Chapter 12. The Title`; the title group is absent or empty for bare headers.
pub static CHAPTER_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"(?im)^[ \t]*(Chapter[ \t]+([0-9]+))[.:]?(?:[ \t]+([^\n]*))?$"));

/// `XIV. The Title`; the numeral still has to pass [`super::roman::parse`].
pub static ROMAN_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*([IVXLCDM]+)\.[ \t]+([^\n]*)$"));

/// A line that reads like a table-of-contents entry: a numbered unit label
/// or a roman section header. Matched against single trimmed lines.
static LISTING_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^(?:(?:CHAPTER|LETTER|PART|BOOK|VOLUME)[ \t]+(?:[0-9]+|[IVXLCDM]+|ONE|TWO|THREE|FOUR|FIVE|SIX|SEVEN|EIGHT|NINE|TEN)\b|(?-i:[IVXLCDM]+)\.(?:[ \t]|$))",
    )
});

/// Count the listing lines at the start of `text`, up to the first line of
/// prose. Blank lines are skipped.
pub fn headers_before_prose(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take_while(|line| LISTING_LINE.is_match(line))
        .count()
}
