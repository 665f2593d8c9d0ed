//! This file defines the command-line interface (CLI) for the sitefix application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sitefix_core::config::validate_backup_suffix;
use sitefix_core::DEFAULT_CORPUS_DIR;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "sitefix",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Repair and verify a static HTML export before it goes live",
    long_about = "sitefix is a set of maintenance tools for a statically exported web application. Each subcommand is a single pass over every .html file under the corpus root: fix broken asset prefixes, strip obsolete promotional sections, remove stale page-chunk scripts, turn routes into .html links, check hosting safety, or validate the deployment environment.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `sitefix` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restores /_next/ asset prefixes mangled to /-next/ and decodes &#x27; entities.
    #[command(about = "Restore /_next/ asset prefixes and decode &#x27; entities.")]
    FixPaths(RewriteArgs),

    /// Deletes sections, coupon blocks and headings advertising coupons or plans.
    #[command(about = "Delete sections, coupon blocks and headings advertising coupons or plans.")]
    StripSections(RewriteArgs),

    /// Deletes script tags loading page chunks of removed pages.
    #[command(about = "Delete script tags loading page chunks of removed pages.")]
    RemoveScripts(RewriteArgs),

    /// Rewrites quoted routes like "/servicos" to "/servicos.html" when that file exists.
    #[command(about = "Rewrite extension-less routes to existing .html files.")]
    LinkRoutes(RewriteArgs),

    /// Applies a custom YAML rule set.
    #[command(about = "Apply a custom YAML rule set to the corpus.")]
    Rewrite(CustomRewriteCommand),

    /// Reports missing references, absolute local paths and deny-all access rules.
    #[command(about = "Report hosting hazards: missing files, absolute local paths, deny-all access rules.")]
    Check(CheckCommand),

    /// Fails unless every required environment variable is set and non-empty.
    #[command(about = "Check that every required environment variable is set and non-empty.")]
    ValidateEnv(ValidateEnvCommand),

    /// Lists the built-in rule sets and their rules.
    #[command(about = "List the built-in rule sets and their rules.")]
    Rules,
}

/// Where the corpus lives.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Corpus root; relative paths are tried against the project directory, then the working directory.
    #[arg(long = "root", value_name = "DIR", default_value = DEFAULT_CORPUS_DIR, help = "Corpus root (relative to the project directory, then the working directory).")]
    pub root: PathBuf,

    /// Project directory tried first when resolving a relative root.
    #[arg(long = "project-dir", value_name = "DIR", env = "SITEFIX_PROJECT_DIR", help = "Project directory tried first when resolving a relative root.")]
    pub project_dir: Option<PathBuf>,
}

/// Arguments shared by every rewriting command.
#[derive(Args, Debug, Clone)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Compute changes without writing any file.
    #[arg(long = "dry-run", short = 'n', help = "Show what would change without writing any file.")]
    pub dry_run: bool,

    /// Print a unified diff for every changed file.
    #[arg(long = "diff", short = 'D', help = "Print a unified diff for every changed file.")]
    pub diff: bool,

    /// Do not write backup siblings.
    #[arg(long = "no-backup", conflicts_with = "backup_suffix", help = "Do not write backup copies of modified files.")]
    pub no_backup: bool,

    /// Override the backup suffix of the rule set.
    #[arg(long = "backup-suffix", value_name = "SUFFIX", value_parser = parse_backup_suffix, help = "Write backups as <file><SUFFIX> instead of the rule set's default.")]
    pub backup_suffix: Option<String>,

    /// Skip unreadable files instead of aborting the run.
    #[arg(long = "skip-unreadable", help = "Warn about and skip unreadable files instead of aborting.")]
    pub skip_unreadable: bool,
}

/// Rejects suffixes that would not produce a distinct sibling file.
fn parse_backup_suffix(suffix: &str) -> Result<String, String> {
    validate_backup_suffix(suffix)?;
    Ok(suffix.to_string())
}

/// Arguments for the `rewrite` command.
#[derive(Args, Debug)]
pub struct CustomRewriteCommand {
    /// Path to the YAML rule set.
    #[arg(long = "rules", value_name = "FILE", help = "Path to a YAML rule set.")]
    pub rules: PathBuf,

    #[command(flatten)]
    pub args: RewriteArgs,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Print the report as JSON to stdout.
    #[arg(long = "json", help = "Print the report as JSON to stdout.")]
    pub json: bool,
}

/// Arguments for the `validate-env` command.
#[derive(Args, Debug)]
pub struct ValidateEnvCommand {
    /// Replace the default list of required variables (comma-separated).
    #[arg(long = "require", value_name = "NAMES", value_delimiter = ',', help = "Replace the default list of required variables (comma-separated).")]
    pub require: Vec<String>,

    /// Load a dotenv file before checking; variables already set win.
    #[arg(long = "env-file", value_name = "FILE", help = "Load a dotenv file before checking (already-set variables are kept).")]
    pub env_file: Option<PathBuf>,
}
