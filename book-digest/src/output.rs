//! Markdown rendering of a digest.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::digest::DigestEntry;
use crate::text::fill;

/// Render entries as markdown, one `## <title>` block per entry.
///
/// For multi-tier books a `# <part>` heading opens each new part.
pub fn render_markdown(entries: &[DigestEntry], width: usize) -> String {
    let mut out = String::new();
    let mut current_part: Option<&str> = None;

    for entry in entries {
        if let Some(part) = entry.part.as_deref() {
            if current_part != Some(part) {
                out.push_str(&format!("# {}\n\n", part));
                current_part = Some(part);
            }
        }
        out.push_str(&format!("## {}\n\n{}\n\n", entry.title, fill(&entry.summary, width)));
    }

    out
}

/// Write the rendered digest to `path`, creating parent directories.
pub fn write_digest(path: &Path, entries: &[DigestEntry], width: usize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, render_markdown(entries, width))
        .with_context(|| format!("Failed to write digest: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(title: &str, summary: &str) -> DigestEntry {
        DigestEntry {
            title: title.to_string(),
            part: None,
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_render_in_order() {
        let entries = vec![
            entry("Loomings", "Ishmael goes to sea."),
            entry("The Carpet-Bag", "He arrives in New Bedford."),
        ];
        assert_eq!(
            render_markdown(&entries, 100),
            "## Loomings\n\nIshmael goes to sea.\n\n## The Carpet-Bag\n\nHe arrives in New Bedford.\n\n"
        );
    }

    #[test]
    fn test_render_wraps_summary() {
        let entries = vec![entry("One", "alpha beta gamma delta")];
        assert_eq!(
            render_markdown(&entries, 11),
            "## One\n\nalpha beta\ngamma delta\n\n"
        );
    }

    #[test]
    fn test_render_part_headings() {
        let mut first = entry("Arrival", "A.");
        first.part = Some("PART I".into());
        let mut second = entry("Unpacking", "B.");
        second.part = Some("PART I".into());
        let mut third = entry("Departure", "C.");
        third.part = Some("PART II".into());

        let markdown = render_markdown(&[first, second, third], 100);
        assert_eq!(markdown.matches("# PART I\n").count(), 1);
        assert_eq!(markdown.matches("# PART II\n").count(), 1);
        assert!(markdown.find("# PART II").unwrap() > markdown.find("## Unpacking").unwrap());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_markdown(&[], 100), "");
    }

    #[test]
    fn test_write_digest_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("moby.md");

        write_digest(&path, &[entry("Loomings", "Ishmael goes to sea.")], 100).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("## Loomings\n\n"));
    }
}
