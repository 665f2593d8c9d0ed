// sitefix/src/main.rs
//! sitefix entry point.
//!
//! Parses the command line, initializes logging and the output theme, runs the
//! selected subcommand and turns its outcome into a process exit code.

use clap::Parser;
use std::process::ExitCode;

use sitefix::cli::Cli;
use sitefix::commands::{dispatch, error_msg};
use sitefix::logger;
use sitefix::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};
use sitefix_core::SitefixError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    let theme: ThemeMap = match build_theme_map(cli.theme.as_ref()) {
        Ok(theme) => theme,
        Err(e) => {
            log::warn!("{:#}; falling back to the default theme.", e);
            ThemeStyle::default_theme_map()
        }
    };

    match dispatch(cli.command, &theme) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SitefixError>() {
                Some(err @ SitefixError::CorpusNotFound { .. }) => error_msg(format!("ERROR: {}", err), &theme),
                Some(err @ SitefixError::MissingConfiguration(_)) => error_msg(format!("[ERROR] {}", err), &theme),
                _ => error_msg(format!("Error: {:#}", e), &theme),
            }
            ExitCode::FAILURE
        }
    }
}
