//! Greedy fixed-width word wrap.

/// Wrap `text` to `width` columns, keeping paragraph breaks.
///
/// Lines break only between words; a word longer than the width sits on a
/// line of its own.
pub fn fill(text: &str, width: usize) -> String {
    let width = width.max(1);
    text.split("\n\n")
        .map(|paragraph| fill_paragraph(paragraph, width))
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn fill_paragraph(paragraph: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in paragraph.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if !line.is_empty() && needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}
