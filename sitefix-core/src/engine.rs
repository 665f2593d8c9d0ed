// sitefix-core/src/engine.rs
//! Defines the core RewriteEngine trait and related data structures.
//!
//! The `RewriteEngine` trait is the seam between the batch runner, which owns
//! all file I/O, and the individual text transformations. An engine sees one
//! file's decoded text at a time and never touches the filesystem for writing.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Number of regions a single rule rewrote in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub rule_name: String,
    pub occurrences: usize,
}

/// The candidate text produced for one file, plus what produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub hits: Vec<RuleHit>,
}

impl Rewrite {
    /// A rewrite that leaves `content` as it was.
    pub fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            hits: Vec::new(),
        }
    }

    pub fn total_hits(&self) -> usize {
        self.hits.iter().map(|h| h.occurrences).sum()
    }
}

/// A trait that defines the core functionality of a rewrite engine.
pub trait RewriteEngine: Send + Sync {
    /// Identifier used in logs and summaries.
    fn name(&self) -> &str;

    /// Produces the candidate text for one file.
    ///
    /// # Arguments
    /// * `content` - The decoded text of the file.
    /// * `source` - The file's path relative to the corpus root.
    fn rewrite(&self, content: &str, source: &Path) -> Result<Rewrite>;

    /// Suffix for backup siblings this engine asks for by default.
    fn backup_suffix(&self) -> Option<&str> {
        None
    }
}
