//! The `validate-env` subcommand.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io;

use sitefix_core::{validate, REQUIRED_VARS};

use crate::cli::ValidateEnvCommand;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

pub const OK_MESSAGE: &str = "[OK] All required environment variables are present.";

/// The names to check: `--require` when given, the built-in list otherwise.
pub fn required_names(cmd: &ValidateEnvCommand) -> Vec<String> {
    let names: Vec<String> = cmd
        .require
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        REQUIRED_VARS.iter().map(|name| name.to_string()).collect()
    } else {
        names
    }
}

/// Loads the optional dotenv file, then checks every required name.
/// A `MissingConfiguration` error is returned for the caller to report.
pub fn run_validate_env(cmd: &ValidateEnvCommand, theme: &ThemeMap) -> Result<()> {
    if let Some(path) = &cmd.env_file {
        info!("Loading environment file {}", path.display());
        dotenvy::from_path(path).with_context(|| format!("Failed to load environment file {}", path.display()))?;
    }

    let required = required_names(cmd);
    debug!("Checking {} required variable(s).", required.len());
    validate(&required)?;

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    output_format::print_success_message(&mut stdout.lock(), OK_MESSAGE, theme, supports_color)?;
    Ok(())
}
