//! errors.rs - Custom error types for the sitefix-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that callers can match on to decide
//! how a run should end (e.g. which exit code the CLI returns).
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// This enum represents all possible error types in the `sitefix-core` library.
///
/// New variants may be added in future versions, hence `#[non_exhaustive]`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SitefixError {
    /// Neither the primary nor the fallback corpus root exists.
    #[error("corpus root not found at {}", .attempted.last().map(|p| p.display().to_string()).unwrap_or_default())]
    CorpusNotFound { attempted: Vec<PathBuf> },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more required environment variables are unset or empty.
    /// Names are kept in their declared order.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingConfiguration(Vec<String>),

    #[error("Failed to compile rewrite rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
