// sitefix-core/src/batch.rs
//! The batch runner shared by every rewriting tool.
//!
//! `run_batch` walks the corpus, hands each file's text to a `RewriteEngine`
//! and writes back only the files whose text changed, optionally saving the
//! original bytes to a backup sibling first. Files are never renamed, moved or
//! deleted, and nothing is written outside the corpus root.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::{html_files, read_lossy, relative_to};
use crate::engine::{RewriteEngine, RuleHit};
use crate::errors::SitefixError;

/// What to do when a file in the corpus cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Stop the run at the first unreadable file.
    #[default]
    Abort,
    /// Log a warning, record the file as skipped and continue.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Suffix for backup siblings; `None` disables backups.
    pub backup_suffix: Option<String>,
    pub read_policy: ReadPolicy,
    /// Compute changes without writing anything.
    pub dry_run: bool,
}

/// A file whose text the engine changed.
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    /// Path relative to the corpus root.
    pub path: PathBuf,
    pub hits: Vec<RuleHit>,
    /// Backup sibling written before the overwrite.
    pub backup: Option<PathBuf>,
    #[serde(skip)]
    pub original: String,
    #[serde(skip)]
    pub rewritten: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregated outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub root: PathBuf,
    pub engine: String,
    pub files_scanned: usize,
    pub changes: Vec<FileChange>,
    pub skipped: Vec<SkippedFile>,
    pub dry_run: bool,
}

impl BatchSummary {
    pub fn modified_paths(&self) -> Vec<&Path> {
        self.changes.iter().map(|c| c.path.as_path()).collect()
    }
}

/// Appends `suffix` to the file name of `path`: `a/index.html` + `.bak` -> `a/index.html.bak`.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Rewrites every HTML file under `root` with `engine`.
pub fn run_batch(root: &Path, engine: &dyn RewriteEngine, options: &BatchOptions) -> Result<BatchSummary> {
    let files = html_files(root);
    rewrite_files(root, &files, engine, options)
}

/// Rewrites the given files, which are expected to lie under `root`.
pub fn rewrite_files(
    root: &Path,
    files: &[PathBuf],
    engine: &dyn RewriteEngine,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    info!("Running '{}' over {} file(s) in {}", engine.name(), files.len(), root.display());

    let mut summary = BatchSummary {
        root: root.to_path_buf(),
        engine: engine.name().to_string(),
        files_scanned: 0,
        changes: Vec::new(),
        skipped: Vec::new(),
        dry_run: options.dry_run,
    };

    for path in files {
        let relative = relative_to(root, path);
        let (bytes, text) = match read_lossy(path) {
            Ok(read) => read,
            Err(e) => match options.read_policy {
                ReadPolicy::Abort => return Err(e.into()),
                ReadPolicy::Skip => {
                    warn!("{}", e);
                    summary.skipped.push(SkippedFile {
                        path: relative,
                        reason: e.to_string(),
                    });
                    continue;
                }
            },
        };
        summary.files_scanned += 1;

        let rewrite = engine
            .rewrite(&text, &relative)
            .with_context(|| format!("Engine '{}' failed on {}", engine.name(), relative.display()))?;
        if rewrite.content == text {
            debug!("{}: unchanged", relative.display());
            continue;
        }

        let mut backup = None;
        if !options.dry_run {
            if let Some(suffix) = &options.backup_suffix {
                let backup_file = backup_path(path, suffix);
                fs::write(&backup_file, &bytes).map_err(|source| SitefixError::Write {
                    path: backup_file.clone(),
                    source,
                })?;
                info!("Backed up {} to {}", relative.display(), backup_file.display());
                backup = Some(relative_to(root, &backup_file));
            }
            fs::write(path, rewrite.content.as_bytes()).map_err(|source| SitefixError::Write {
                path: path.clone(),
                source,
            })?;
            info!("Rewrote {} ({} change(s))", relative.display(), rewrite.total_hits());
        } else {
            info!("Would rewrite {} ({} change(s))", relative.display(), rewrite.total_hits());
        }

        summary.changes.push(FileChange {
            path: relative,
            hits: rewrite.hits,
            backup,
            original: text,
            rewritten: rewrite.content,
        });
    }

    info!(
        "'{}' finished: {} scanned, {} modified, {} skipped.",
        summary.engine,
        summary.files_scanned,
        summary.changes.len(),
        summary.skipped.len()
    );
    Ok(summary)
}
