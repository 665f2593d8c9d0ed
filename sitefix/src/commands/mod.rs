//! Subcommand runners and the dispatcher that selects one.

pub mod check;
pub mod rewrite;
pub mod rules;
pub mod validate_env;

use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;

use crate::cli::Commands;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

use rewrite::RewriteKind;

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Runs the selected subcommand to completion.
pub fn dispatch(command: Commands, theme: &ThemeMap) -> Result<()> {
    match command {
        Commands::FixPaths(args) => rewrite::run_rewrite(RewriteKind::FixPaths, &args, theme).map(drop),
        Commands::StripSections(args) => rewrite::run_rewrite(RewriteKind::StripSections, &args, theme).map(drop),
        Commands::RemoveScripts(args) => rewrite::run_rewrite(RewriteKind::RemoveScripts, &args, theme).map(drop),
        Commands::LinkRoutes(args) => rewrite::run_rewrite(RewriteKind::LinkRoutes, &args, theme).map(drop),
        Commands::Rewrite(cmd) => rewrite::run_rewrite(RewriteKind::Custom(cmd.rules), &cmd.args, theme).map(drop),
        Commands::Check(cmd) => check::run_check(&cmd, theme).map(drop),
        Commands::ValidateEnv(cmd) => validate_env::run_validate_env(&cmd, theme),
        Commands::Rules => rules::run_rules(),
    }
}
