// sitefix-core/src/engines/route_engine.rs
//! A `RewriteEngine` that turns extension-less, site-absolute routes into
//! literal `.html` file references.
//!
//! Static hosting has no router, so `href="/servicos#precos"` only works once
//! it reads `href="/servicos.html#precos"`. A route is rewritten only when the
//! matching `<root>/<route>.html` file exists; everything else is left alone.
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

use crate::engine::{Rewrite, RewriteEngine, RuleHit};

/// Quoted absolute path made of word characters, dashes and slashes, with an
/// optional fragment. Anything containing a dot never matches.
static QUOTED_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(["'])/([A-Za-z0-9_/-]+)(#[^"']*)?(["'])"#).expect("route pattern is valid"));

const RULE_NAME: &str = "route_to_html";

#[derive(Debug, Clone)]
pub struct RouteEngine {
    root: PathBuf,
}

impl RouteEngine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `.html` file a route would point at, if the route is eligible at all.
    fn candidate(&self, route: &str) -> Option<PathBuf> {
        // "//host/x" is protocol-relative, and joining an absolute path would leave the root.
        if route.starts_with('/') || route.ends_with('/') {
            return None;
        }
        Some(self.root.join(format!("{}.html", route)))
    }
}

impl RewriteEngine for RouteEngine {
    fn name(&self) -> &str {
        "routes"
    }

    fn rewrite(&self, content: &str, source: &Path) -> Result<Rewrite> {
        let mut occurrences = 0usize;
        let rewritten = QUOTED_ROUTE.replace_all(content, |caps: &Captures| {
            let route = &caps[2];
            let fragment = caps.get(3).map_or("", |m| m.as_str());
            match self.candidate(route) {
                Some(file) if file.is_file() => {
                    debug!("{}: /{} -> /{}.html", source.display(), route, route);
                    occurrences += 1;
                    format!("{}/{}.html{}{}", &caps[1], route, fragment, &caps[4])
                }
                _ => caps[0].to_string(),
            }
        });

        let hits = if occurrences > 0 {
            vec![RuleHit {
                rule_name: RULE_NAME.to_string(),
                occurrences,
            }]
        } else {
            Vec::new()
        };
        Ok(Rewrite {
            content: rewritten.into_owned(),
            hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn corpus() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("servicos.html"), "").unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/post-1.html"), "").unwrap();
        dir
    }

    #[test]
    fn rewrites_existing_routes_and_keeps_fragments() {
        let dir = corpus();
        let engine = RouteEngine::new(dir.path());
        let input = r#"<a href="/servicos">S</a><a href='/servicos#precos'>P</a><a href="/blog/post-1">B</a>"#;
        let out = engine.rewrite(input, Path::new("index.html")).unwrap();
        assert_eq!(
            out.content,
            r#"<a href="/servicos.html">S</a><a href='/servicos.html#precos'>P</a><a href="/blog/post-1.html">B</a>"#
        );
        assert_eq!(out.total_hits(), 3);
    }

    #[test]
    fn leaves_unknown_routes_files_and_root_alone() {
        let dir = corpus();
        let engine = RouteEngine::new(dir.path());
        let input = r#"<a href="/">H</a><a href="/contato">C</a><img src="/logo.png"><a href="/servicos.html">S</a><a href="//servicos">X</a>"#;
        let out = engine.rewrite(input, Path::new("index.html")).unwrap();
        assert_eq!(out.content, input);
        assert!(out.hits.is_empty());
    }

    #[test]
    fn second_pass_changes_nothing() {
        let dir = corpus();
        let engine = RouteEngine::new(dir.path());
        let once = engine.rewrite(r#"<a href="/servicos#x">S</a>"#, Path::new("a.html")).unwrap();
        let twice = engine.rewrite(&once.content, Path::new("a.html")).unwrap();
        assert_eq!(once.content, twice.content);
        assert!(twice.hits.is_empty());
    }
}
