// sitefix/src/lib.rs
//! # sitefix CLI Application
//!
//! This crate provides the command-line front end for `sitefix-core`: argument
//! parsing, logger setup, themed terminal output and one runner per
//! subcommand. The binary in `main.rs` only parses arguments, dispatches and
//! maps errors to exit codes.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::dispatch;
