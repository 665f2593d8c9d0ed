// sitefix-core/tests/batch_integration_tests.rs
//! End-to-end tests for the batch runner over temporary corpora.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_log::test;

use sitefix_core::{
    rewrite_files, run_batch, BatchOptions, ReadPolicy, RewriteEngine, RouteEngine, RuleEngine, SitefixError,
};

/// Creates a corpus from `(relative path, content)` pairs.
fn corpus(files: &[(&str, &str)]) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
    }
    Ok(dir)
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn options_for(engine: &dyn RewriteEngine) -> BatchOptions {
    BatchOptions {
        backup_suffix: engine.backup_suffix().map(str::to_string),
        ..Default::default()
    }
}

#[test]
fn fix_paths_rewrites_only_broken_files_and_is_idempotent() -> Result<()> {
    let dir = corpus(&[
        ("index.html", r#"<script src="/-next/static/chunks/main.js"></script>"#),
        ("about/index.html", "<p>clean</p>"),
    ])?;
    let engine = RuleEngine::builtin("next-paths")?;

    let first = run_batch(dir.path(), &engine, &options_for(&engine))?;
    assert_eq!(first.files_scanned, 2);
    assert_eq!(first.modified_paths(), vec![Path::new("index.html")]);
    assert_eq!(read(dir.path(), "index.html"), r#"<script src="/_next/static/chunks/main.js"></script>"#);
    assert!(!dir.path().join("index.html.bak").exists(), "next-paths writes no backup");

    let second = run_batch(dir.path(), &engine, &options_for(&engine))?;
    assert!(second.changes.is_empty());
    Ok(())
}

#[test]
fn section_stripper_backs_up_and_leaves_keyword_free_files_identical() -> Result<()> {
    let promo = "<main><section><h2>Meus Cupons</h2><p>10% off</p></section><p>Bem-vindo</p></main>";
    let plain = "<main><div class=\"promo\">promo</div><p>Bem-vindo</p></main>";
    let dir = corpus(&[("promo.html", promo), ("plain.html", plain)])?;
    let engine = RuleEngine::builtin("obsolete-sections")?;

    let summary = run_batch(dir.path(), &engine, &options_for(&engine))?;

    assert_eq!(summary.modified_paths(), vec![Path::new("promo.html")]);
    assert_eq!(read(dir.path(), "promo.html"), "<main><p>Bem-vindo</p></main>");
    assert_eq!(read(dir.path(), "promo.html.bak"), promo);
    assert_eq!(summary.changes[0].backup, Some(PathBuf::from("promo.html.bak")));
    assert_eq!(read(dir.path(), "plain.html"), plain);
    assert!(!dir.path().join("plain.html.bak").exists());
    Ok(())
}

#[test]
fn script_remover_targets_only_listed_pages() -> Result<()> {
    let page = concat!(
        "<head>",
        "<script src=\"/_next/static/chunks/pages/contato-leidy-9f8e.js\" defer=\"\"></script>",
        "<script src=\"/-next/static/chunks/pages/sobre-leidy.js\"></script>",
        "<script src=\"/_next/static/chunks/pages/index-1a2b.js\" defer=\"\"></script>",
        "</head>"
    );
    let dir = corpus(&[("index.html", page)])?;
    let engine = RuleEngine::builtin("page-chunk-scripts")?;

    let summary = run_batch(dir.path(), &engine, &options_for(&engine))?;

    assert_eq!(summary.changes.len(), 1);
    assert_eq!(
        read(dir.path(), "index.html"),
        "<head><script src=\"/_next/static/chunks/pages/index-1a2b.js\" defer=\"\"></script></head>"
    );
    assert_eq!(read(dir.path(), "index.html.bak2"), page);
    Ok(())
}

#[test]
fn route_rewriter_links_existing_pages() -> Result<()> {
    let dir = corpus(&[
        ("index.html", r#"<a href="/servicos#precos">S</a><a href="/contato">C</a>"#),
        ("servicos.html", "<h1>Servicos</h1>"),
    ])?;
    let engine = RouteEngine::new(dir.path());

    let summary = run_batch(dir.path(), &engine, &BatchOptions::default())?;

    assert_eq!(summary.modified_paths(), vec![Path::new("index.html")]);
    assert_eq!(
        read(dir.path(), "index.html"),
        r#"<a href="/servicos.html#precos">S</a><a href="/contato">C</a>"#
    );
    Ok(())
}

#[test]
fn dry_run_writes_nothing() -> Result<()> {
    let original = "<a href=\"/-next/x\">x</a>";
    let dir = corpus(&[("index.html", original)])?;
    let engine = RuleEngine::builtin("next-paths")?;
    let options = BatchOptions {
        backup_suffix: Some(".orig".into()),
        dry_run: true,
        ..Default::default()
    };

    let summary = run_batch(dir.path(), &engine, &options)?;

    assert_eq!(summary.changes.len(), 1);
    assert_eq!(summary.changes[0].rewritten, "<a href=\"/_next/x\">x</a>");
    assert_eq!(read(dir.path(), "index.html"), original);
    assert!(!dir.path().join("index.html.orig").exists());
    Ok(())
}

#[test]
fn backup_keeps_original_bytes_of_non_utf8_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw: &[u8] = b"<p>caf\xe9</p><img src=\"/-next/static/a.png\">";
    fs::write(dir.path().join("latin1.html"), raw)?;
    let engine = RuleEngine::builtin("next-paths")?;
    let options = BatchOptions {
        backup_suffix: Some(".bak".into()),
        ..Default::default()
    };

    run_batch(dir.path(), &engine, &options)?;

    assert_eq!(fs::read(dir.path().join("latin1.html.bak"))?, raw);
    assert_eq!(
        read(dir.path(), "latin1.html"),
        "<p>caf\u{FFFD}</p><img src=\"/_next/static/a.png\">"
    );
    Ok(())
}

#[test]
fn unreadable_file_aborts_by_default() -> Result<()> {
    let dir = corpus(&[("index.html", "<p>x</p>")])?;
    let engine = RuleEngine::builtin("next-paths")?;
    let files = vec![dir.path().join("gone.html"), dir.path().join("index.html")];

    let err = rewrite_files(dir.path(), &files, &engine, &BatchOptions::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<SitefixError>(), Some(SitefixError::Read { .. })));
    Ok(())
}

#[test]
fn unreadable_file_is_skipped_when_tolerated() -> Result<()> {
    let dir = corpus(&[("index.html", "<a href=\"/-next/x\">x</a>")])?;
    let engine = RuleEngine::builtin("next-paths")?;
    let files = vec![dir.path().join("gone.html"), dir.path().join("index.html")];
    let options = BatchOptions {
        read_policy: ReadPolicy::Skip,
        ..Default::default()
    };

    let summary = rewrite_files(dir.path(), &files, &engine, &options)?;

    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, PathBuf::from("gone.html"));
    assert_eq!(summary.files_scanned, 1);
    assert_eq!(summary.changes.len(), 1);
    Ok(())
}
