//! The `check` subcommand: hostsafety report for the corpus.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::{self, Write};

use sitefix_core::{check, HostsafetyReport};

use crate::cli::CheckCommand;
use crate::commands::rewrite::locate_root;
use crate::commands::warn_msg;
use crate::ui::summary;
use crate::ui::theme::ThemeMap;

/// Scans the corpus and prints the report. Hazards never fail the run.
pub fn run_check(cmd: &CheckCommand, theme: &ThemeMap) -> Result<HostsafetyReport> {
    let root = locate_root(&cmd.corpus)?;
    let report = check(&root);

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();
    if cmd.json {
        serde_json::to_writer_pretty(&mut writer, &report).context("Failed to serialize report")?;
        writeln!(writer)?;
    } else {
        summary::print_hostsafety_report(&report, &mut writer, theme, supports_color)
            .context("Failed to write report")?;
    }
    writer.flush()?;

    for skipped in &report.skipped {
        warn_msg(format!("Skipped unreadable file {}", skipped.display()), theme);
    }
    Ok(report)
}
