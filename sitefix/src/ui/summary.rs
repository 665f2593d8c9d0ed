// sitefix/src/ui/summary.rs
//! Human-readable summaries of batch runs and hostsafety reports.

use std::io::{self, Write};

use sitefix_core::hostsafety::{HostsafetyReport, ABSOLUTE_SAMPLE_LIMIT, MISSING_SAMPLE_LIMIT};
use sitefix_core::BatchSummary;

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub const CLEAN_VERDICT: &str = "No immediate hosting-blocking issues detected.";
pub const HAZARD_VERDICT: &str = "Fixes recommended for the issues above.";

/// Prints the modified-file count and one `- path` line per modified file.
pub fn print_batch_summary<W: Write + ?Sized>(
    summary: &BatchSummary,
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let label = if summary.dry_run { "Files that would be modified: " } else { "Files modified: " };
    write!(writer, "{}", label)?;
    write_styled(writer, &summary.changes.len().to_string(), ThemeEntry::SummaryCount, theme, supports_color)?;
    writeln!(writer)?;

    for change in &summary.changes {
        write!(writer, "- ")?;
        write_styled(writer, &change.path.display().to_string(), ThemeEntry::SummaryPath, theme, supports_color)?;
        writeln!(writer)?;
    }

    if !summary.skipped.is_empty() {
        write!(writer, "Files skipped: ")?;
        write_styled(writer, &summary.skipped.len().to_string(), ThemeEntry::Warn, theme, supports_color)?;
        writeln!(writer)?;
        for skipped in &summary.skipped {
            writeln!(writer, "- {} ({})", skipped.path.display(), skipped.reason)?;
        }
    }
    Ok(())
}

/// Prints a hostsafety report followed by its verdict.
pub fn print_hostsafety_report<W: Write + ?Sized>(
    report: &HostsafetyReport,
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    write_styled(
        writer,
        &format!("Summary for {}", report.root.display()),
        ThemeEntry::Header,
        theme,
        supports_color,
    )?;
    writeln!(writer)?;
    writeln!(writer, "HTML files scanned: {}", report.files_scanned)?;
    writeln!(writer, "Total references found: {}", report.total_references)?;

    let count_entry = |n: usize| if n == 0 { ThemeEntry::SummaryCount } else { ThemeEntry::Warn };

    write!(writer, "Windows absolute path refs: ")?;
    let absolute = report.absolute_references.len();
    write_styled(writer, &absolute.to_string(), count_entry(absolute), theme, supports_color)?;
    writeln!(writer)?;
    for hazard in report.absolute_references.iter().take(ABSOLUTE_SAMPLE_LIMIT) {
        writeln!(writer, "- {}: {}", hazard.source.display(), hazard.reference)?;
    }

    write!(writer, "Missing file references (sample up to {}): ", MISSING_SAMPLE_LIMIT)?;
    let missing = report.missing_references.len();
    write_styled(writer, &missing.to_string(), count_entry(missing), theme, supports_color)?;
    writeln!(writer)?;
    for hazard in report.missing_references.iter().take(MISSING_SAMPLE_LIMIT) {
        writeln!(
            writer,
            "- {} references {} -> {}",
            hazard.source.display(),
            hazard.reference,
            hazard.expected.display()
        )?;
    }

    match &report.access_control {
        Some(access) => {
            writeln!(writer, ".htaccess present: yes")?;
            if access.denies_all {
                write_styled(
                    writer,
                    ".htaccess contains a deny-all directive; the site may be unreachable.",
                    ThemeEntry::Warn,
                    theme,
                    supports_color,
                )?;
                writeln!(writer)?;
            }
        }
        None => writeln!(writer, ".htaccess present: no")?,
    }

    if !report.skipped.is_empty() {
        writeln!(writer, "Unreadable files skipped: {}", report.skipped.len())?;
    }

    writeln!(writer)?;
    if report.is_clean() {
        write_styled(writer, CLEAN_VERDICT, ThemeEntry::Success, theme, supports_color)?;
    } else {
        write_styled(writer, HAZARD_VERDICT, ThemeEntry::Warn, theme, supports_color)?;
    }
    writeln!(writer)
}
