// sitefix/src/ui/diff_viewer.rs
//! Unified diff preview for `--diff`.
//!
//! Renders a `diffy` patch between a file's original and rewritten text,
//! colouring removed lines, added lines and hunk headers from the theme.

use diffy::{create_patch, Line as DiffLine};
use std::io::{self, Write};
use std::path::Path;

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes the diff of one file. Nothing is written when the texts are equal.
pub fn print_diff<W: Write + ?Sized>(
    path: &Path,
    original: &str,
    rewritten: &str,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    if original == rewritten {
        return Ok(());
    }
    let patch = create_patch(original, rewritten);

    let name = path.display();
    write_styled(writer, &format!("--- a/{}", name), ThemeEntry::DiffHeader, theme_map, supports_color)?;
    writeln!(writer)?;
    write_styled(writer, &format!("+++ b/{}", name), ThemeEntry::DiffHeader, theme_map, supports_color)?;
    writeln!(writer)?;

    for hunk in patch.hunks() {
        let header = format!(
            "@@ -{},{} +{},{} @@",
            hunk.old_range().start(),
            hunk.old_range().len(),
            hunk.new_range().start(),
            hunk.new_range().len()
        );
        write_styled(writer, &header, ThemeEntry::DiffHeader, theme_map, supports_color)?;
        writeln!(writer)?;

        for line in hunk.lines() {
            let (prefix, text, entry) = match line {
                DiffLine::Delete(s) => ("-", *s, Some(ThemeEntry::DiffRemoved)),
                DiffLine::Insert(s) => ("+", *s, Some(ThemeEntry::DiffAdded)),
                DiffLine::Context(s) => (" ", *s, None),
            };
            let rendered = format!("{}{}", prefix, text.trim_end_matches(['\r', '\n']));
            match entry {
                Some(entry) => write_styled(writer, &rendered, entry, theme_map, supports_color)?,
                None => write!(writer, "{}", rendered)?,
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
