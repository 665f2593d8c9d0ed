// sitefix-core/src/corpus.rs
//! Locating the corpus root and enumerating the files inside it.
//!
//! The corpus is the static-site output directory. Its location is resolved
//! from a relative path tried first against the project directory and then
//! against the current working directory, so the tools behave the same when
//! run from the repository or from a CI shell.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::SitefixError;

/// Conventional location of the static export, relative to the project.
pub const DEFAULT_CORPUS_DIR: &str = "frontend/public_html";

/// Extension of the files every tool operates on.
pub const HTML_EXTENSION: &str = "html";

/// Resolves the corpus root from a primary and a fallback base directory.
#[derive(Debug, Clone)]
pub struct CorpusLocator {
    relative: PathBuf,
    project_dir: Option<PathBuf>,
    working_dir: PathBuf,
}

impl CorpusLocator {
    pub fn new(relative: impl Into<PathBuf>, project_dir: Option<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            project_dir,
            working_dir: working_dir.into(),
        }
    }

    /// Locator using the process's current working directory as fallback.
    pub fn from_current_dir(relative: impl Into<PathBuf>, project_dir: Option<PathBuf>) -> Result<Self, SitefixError> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(relative, project_dir, cwd))
    }

    /// Candidate roots in the order they are tried, without duplicates.
    /// An absolute `relative` path yields a single candidate.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::with_capacity(2);
        let bases = self.project_dir.iter().chain(std::iter::once(&self.working_dir));
        for base in bases {
            let candidate = base.join(&self.relative);
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }

    /// Returns the first candidate that is an existing directory.
    pub fn locate(&self) -> Result<PathBuf, SitefixError> {
        let candidates = self.candidates();
        for candidate in &candidates {
            if candidate.is_dir() {
                debug!("Corpus root resolved to {}", candidate.display());
                return Ok(candidate.clone());
            }
            debug!("No corpus root at {}", candidate.display());
        }
        Err(SitefixError::CorpusNotFound { attempted: candidates })
    }
}

/// Every `.html` file under `root`, sorted by path. Symlinks are not followed,
/// so the walk never leaves the corpus. Unreadable directory entries are
/// logged and skipped.
pub fn html_files(root: &Path) -> Vec<PathBuf> {
    walk_html(root, false)
}

/// Like `html_files`, but also lists symlinked `.html` files that point at a
/// regular file. Only for read-only scans: the link target may lie outside
/// the corpus. Symlinked directories are still not descended into.
pub fn served_html_files(root: &Path) -> Vec<PathBuf> {
    walk_html(root, true)
}

fn walk_html(root: &Path, include_symlinked: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        let is_html = entry.path().extension().is_some_and(|ext| ext == HTML_EXTENSION);
        if !is_html {
            continue;
        }
        let file_type = entry.file_type();
        if file_type.is_file() {
            files.push(entry.into_path());
        } else if file_type.is_symlink() {
            if include_symlinked && entry.path().is_file() {
                debug!("Including symlinked page {}", entry.path().display());
                files.push(entry.into_path());
            } else {
                debug!("Ignoring symlink {}", entry.path().display());
            }
        }
    }
    debug!("Found {} HTML files under {}", files.len(), root.display());
    files
}

/// Reads a file and decodes it as UTF-8, replacing invalid sequences.
/// Returns the raw bytes as well so backups can preserve them exactly.
pub fn read_lossy(path: &Path) -> Result<(Vec<u8>, String), SitefixError> {
    let bytes = fs::read(path).map_err(|source| SitefixError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    Ok((bytes, text))
}

/// `path` relative to `root`, or `path` itself when it lies elsewhere.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}
