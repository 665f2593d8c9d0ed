// sitefix-core/src/lib.rs
//! # sitefix Core Library
//!
//! `sitefix-core` holds the platform-independent logic behind the `sitefix`
//! maintenance tools for static HTML exports: declarative rewrite rules, the
//! engines that apply them, a batch runner that walks the corpus and writes
//! changed files back, a hosting-safety checker and an environment validator.
//!
//! The library does no terminal output. Callers receive summaries and reports
//! and decide how to present them.
//!
//! ## Modules
//!
//! * `config`: `RewriteRule` and `RuleSet`, YAML loading, built-in rule sets and validation.
//! * `rules`: compilation of rule sets into matchers, with a process-wide cache.
//! * `engine`: the `RewriteEngine` trait.
//! * `engines`: `RuleEngine` (declarative rule sets) and `RouteEngine` (route to `.html` links).
//! * `corpus`: corpus root resolution, HTML file enumeration, lenient decoding.
//! * `batch`: the shared read / rewrite / backup / overwrite loop.
//! * `hostsafety`: reference extraction, classification and the hazard report.
//! * `environment`: required environment variable checks.
//! * `errors`: the `SitefixError` enum.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sitefix_core::{run_batch, BatchOptions, CorpusLocator, RuleEngine, DEFAULT_CORPUS_DIR};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let root = CorpusLocator::from_current_dir(DEFAULT_CORPUS_DIR, None)?.locate()?;
//!     let engine = RuleEngine::builtin("next-paths")?;
//!     let summary = run_batch(&root, &engine, &BatchOptions::default())?;
//!     println!("Files modified: {}", summary.changes.len());
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod batch;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod engines;
pub mod environment;
pub mod errors;
pub mod hostsafety;
pub mod rules;

/// Re-exports the configuration types for rewrite rules and rule sets.
pub use config::{PatternType, RewriteRule, RuleAction, RuleSet, MAX_PATTERN_LENGTH};

pub use errors::SitefixError;

pub use engine::{Rewrite, RewriteEngine, RuleHit};
pub use engines::route_engine::RouteEngine;
pub use engines::rule_engine::RuleEngine;

pub use corpus::{html_files, served_html_files, CorpusLocator, DEFAULT_CORPUS_DIR, HTML_EXTENSION};

pub use batch::{run_batch, rewrite_files, BatchOptions, BatchSummary, FileChange, ReadPolicy, SkippedFile};

pub use hostsafety::{check, check_files, HostsafetyReport, ReferenceKind, ABSOLUTE_SAMPLE_LIMIT, MISSING_SAMPLE_LIMIT};

pub use environment::{validate, validate_with, REQUIRED_VARS};

pub use rules::compiler::{compile_rules, CompiledRule, CompiledRules};
