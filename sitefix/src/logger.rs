// sitefix/src/logger.rs
//! Logger setup for the sitefix binary and its tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` once. `RUST_LOG` is honoured with a default of
/// `warn`; an explicit `level` overrides it for every module.
/// Calling this again (e.g. from several tests) is a no-op.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).format_target(true);
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to an explicit level override.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
