// sitefix-core/src/hostsafety.rs
//! Hosting-safety checks for a static export.
//!
//! Every `src=`, `href=` and CSS `url(...)` reference in the corpus is
//! extracted and classified. Filesystem-absolute references (drive letters,
//! `file://`, UNC paths) are reported as portability hazards; site-local
//! references are resolved on disk and reported when the target is missing.
//! The root `.htaccess` is inspected for deny-all directives.
//!
//! The checker is informational: hazards never turn into errors, and an
//! unreadable file is skipped with a warning instead of aborting the scan.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use crate::corpus::{read_lossy, relative_to, served_html_files};

/// How many absolute-path hazards a report prints.
pub const ABSOLUTE_SAMPLE_LIMIT: usize = 10;
/// How many missing references a report prints.
pub const MISSING_SAMPLE_LIMIT: usize = 20;

pub const ACCESS_CONTROL_FILE: &str = ".htaccess";

static ATTRIBUTE_REF: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r#"(?:src|href)=["']([^"']+)["']"#)
        .case_insensitive(true)
        .build()
        .expect("attribute reference pattern is valid")
});

static CSS_URL_REF: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"url\(([^)]+)\)")
        .case_insensitive(true)
        .build()
        .expect("css url pattern is valid")
});

static FILESYSTEM_ABSOLUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]:\\|file://|\\\\").expect("absolute path pattern is valid"));

/// A scheme of two or more characters keeps `C:/x` out of this class.
static EXTERNAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]+:|//|#)").expect("external pattern is valid"));

static DENY_ALL: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"deny from all|require all denied|deny all")
        .case_insensitive(true)
        .build()
        .expect("deny pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Scheme-qualified, protocol-relative or fragment-only; never checked.
    External,
    /// Points into a local filesystem; breaks once hosted.
    FilesystemAbsolute,
    /// Resolved against the corpus.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsoluteReference {
    pub source: PathBuf,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReference {
    pub source: PathBuf,
    pub reference: String,
    pub expected: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessControl {
    pub path: PathBuf,
    pub denies_all: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostsafetyReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub total_references: usize,
    pub absolute_references: Vec<AbsoluteReference>,
    pub missing_references: Vec<MissingReference>,
    /// `None` when the root has no access-control file.
    pub access_control: Option<AccessControl>,
    pub skipped: Vec<PathBuf>,
}

impl HostsafetyReport {
    /// True only when no hazard of any category was found.
    pub fn is_clean(&self) -> bool {
        self.absolute_references.is_empty()
            && self.missing_references.is_empty()
            && !self.access_control.as_ref().is_some_and(|a| a.denies_all)
    }
}

/// Every raw reference in `text`: attribute values first, then CSS urls with
/// surrounding spaces and quotes stripped.
pub fn extract_references(text: &str) -> Vec<String> {
    let attributes = ATTRIBUTE_REF.captures_iter(text).map(|c| c[1].to_string());
    let urls = CSS_URL_REF
        .captures_iter(text)
        .map(|c| c[1].trim_matches(|ch| ch == ' ' || ch == '"' || ch == '\'').to_string());
    attributes.chain(urls).collect()
}

pub fn classify(reference: &str) -> ReferenceKind {
    if FILESYSTEM_ABSOLUTE.is_match(reference) {
        ReferenceKind::FilesystemAbsolute
    } else if EXTERNAL.is_match(reference) {
        ReferenceKind::External
    } else {
        ReferenceKind::Local
    }
}

/// Where a local reference points on disk. Query and fragment are dropped;
/// a leading `/` anchors at the corpus root, anything else at the directory
/// of the referencing file (`source`, relative to the root).
pub fn resolve(root: &Path, source: &Path, reference: &str) -> PathBuf {
    let clean = reference.split('?').next().unwrap_or_default();
    let clean = clean.split('#').next().unwrap_or_default();
    let joined = match clean.strip_prefix('/') {
        Some(site_path) => root.join(site_path.trim_start_matches('/')),
        None => {
            let dir = root.join(source).parent().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            dir.join(clean)
        }
    };
    normalize(&joined)
}

/// Lexically folds `.` and `..` components; the target may not exist.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Scans the corpus under `root` and builds a report. Symlinked pages are
/// scanned too, since a host serves them like any other file.
pub fn check(root: &Path) -> HostsafetyReport {
    let files = served_html_files(root);
    check_files(root, &files)
}

/// Scans the given files, which are expected to lie under `root`. A file that
/// cannot be read is recorded in `skipped` and the scan goes on.
pub fn check_files(root: &Path, files: &[PathBuf]) -> HostsafetyReport {
    let mut report = HostsafetyReport {
        root: root.to_path_buf(),
        files_scanned: 0,
        total_references: 0,
        absolute_references: Vec::new(),
        missing_references: Vec::new(),
        access_control: None,
        skipped: Vec::new(),
    };

    for path in files {
        let source = relative_to(root, path);
        let text = match read_lossy(path) {
            Ok((_, text)) => text,
            Err(e) => {
                warn!("{}", e);
                report.skipped.push(source);
                continue;
            }
        };
        report.files_scanned += 1;

        for reference in extract_references(&text) {
            report.total_references += 1;
            match classify(&reference) {
                ReferenceKind::FilesystemAbsolute => {
                    report.absolute_references.push(AbsoluteReference {
                        source: source.clone(),
                        reference,
                    });
                }
                ReferenceKind::External => {}
                ReferenceKind::Local => {
                    let expected = resolve(root, &source, &reference);
                    if !expected.exists() {
                        debug!("{}: missing {} -> {}", source.display(), reference, expected.display());
                        report.missing_references.push(MissingReference {
                            source: source.clone(),
                            reference,
                            expected,
                        });
                    }
                }
            }
        }
    }

    report.access_control = inspect_access_control(root);
    report
}

fn inspect_access_control(root: &Path) -> Option<AccessControl> {
    let path = root.join(ACCESS_CONTROL_FILE);
    if !path.exists() {
        return None;
    }
    let denies_all = match read_lossy(&path) {
        Ok((_, content)) => DENY_ALL.is_match(&content),
        Err(e) => {
            warn!("{}", e);
            false
        }
    };
    Some(AccessControl { path, denies_all })
}
