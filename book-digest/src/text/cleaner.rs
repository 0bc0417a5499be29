//! Text normalization before parsing and prompting.

/// Characters that render as nothing or as a plain space.
const INVISIBLE_CHARS: &[(char, &str)] = &[
    ('\u{00a0}', " "), // Non-breaking space
    ('\u{202f}', " "), // Narrow non-breaking space
    ('\u{200b}', ""),  // Zero-width space
    ('\u{200c}', ""),  // Zero-width non-joiner
    ('\u{200d}', ""),  // Zero-width joiner
    ('\u{2060}', ""),  // Word joiner
    ('\u{feff}', ""),  // BOM
];

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Clean a passage before it is sent to the summarizer.
///
/// Drops control and zero-width characters, turns non-breaking spaces into
/// plain ones, collapses runs of blanks and keeps at most one empty line
/// between paragraphs.
pub fn clean_for_prompt(text: &str) -> String {
    let text = normalize_line_endings(text);
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match INVISIBLE_CHARS.iter().find(|(ch, _)| *ch == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None if is_allowed_char(c) => result.push(c),
            None => {}
        }
    }

    collapse_whitespace(&result)
}

fn is_allowed_char(c: char) -> bool {
    c == '\n' || c == '\t' || !c.is_control()
}

fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;
    let mut newline_count = 0;

    for c in text.chars() {
        match c {
            '\n' => {
                newline_count += 1;
                prev_was_space = false;
                // Trailing blanks before a newline are dropped
                while result.ends_with(' ') {
                    result.pop();
                }
                if newline_count <= 2 {
                    result.push('\n');
                }
            }
            ' ' | '\t' => {
                if !prev_was_space && newline_count == 0 {
                    result.push(' ');
                }
                prev_was_space = true;
            }
            _ => {
                newline_count = 0;
                prev_was_space = false;
                result.push(c);
            }
        }
    }

    result.trim().to_string()
}
