// sitefix-core/tests/hostsafety_tests.rs
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use sitefix_core::{check, check_files};

fn site() -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("blog"))?;
    fs::create_dir_all(root.join("img"))?;
    fs::write(root.join("img/logo.png"), b"png")?;
    fs::write(
        root.join("index.html"),
        concat!(
            "<img src=\"/img/logo.png\">",
            "<a href=\"https://example.com\">x</a>",
            "<a href=\"mailto:oi@example.com\">m</a>",
            "<a href=\"tel:+5511999999999\">t</a>",
            "<a href=\"#topo\">top</a>",
            "<script src=\"//cdn.example.com/lib.js\"></script>",
            "<a href=\"/blog/post.html?ref=home#c\">post</a>",
        ),
    )?;
    fs::write(
        root.join("blog/post.html"),
        concat!(
            "<img src=\"../img/logo.png\">",
            "<img src=\"../img/missing.png\">",
            "<link href=\"C:\\Users\\dev\\site\\style.css\">",
            "<div style=\"background:url('/img/hero.jpg')\"></div>",
        ),
    )?;
    Ok(dir)
}

#[test]
fn reports_missing_and_absolute_references() -> Result<()> {
    let dir = site()?;
    let report = check(dir.path());

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.total_references, 11);

    assert_eq!(report.absolute_references.len(), 1);
    assert_eq!(report.absolute_references[0].source, PathBuf::from("blog/post.html"));

    let missing: Vec<&str> = report.missing_references.iter().map(|m| m.reference.as_str()).collect();
    assert_eq!(missing, vec!["../img/missing.png", "/img/hero.jpg"]);
    assert_eq!(report.missing_references[0].expected, dir.path().join("img/missing.png"));

    assert!(report.access_control.is_none());
    assert!(!report.is_clean());
    Ok(())
}

#[test]
fn external_references_are_never_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("index.html"),
        r##"<a href="https://nowhere.invalid/a">a</a><a href="mailto:x@y.z">b</a><a href="tel:1">c</a><a href="//nowhere/x.js">d</a><a href="#missing-anchor">e</a>"##,
    )?;
    let report = check(dir.path());
    assert_eq!(report.total_references, 5);
    assert!(report.missing_references.is_empty());
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn detects_deny_all_access_control() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("index.html"), "<p>ok</p>")?;
    fs::write(dir.path().join(".htaccess"), "Options -Indexes\nRequire all denied\n")?;
    let report = check(dir.path());
    let access = report.access_control.as_ref().expect("htaccess should be reported");
    assert!(access.denies_all);
    assert!(!report.is_clean());

    fs::write(dir.path().join(".htaccess"), "Options -Indexes\n")?;
    let report = check(dir.path());
    assert!(report.access_control.as_ref().is_some_and(|a| !a.denies_all));
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn report_serializes_with_snake_case_fields() -> Result<()> {
    let dir = site()?;
    let report = check(dir.path());
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["total_references"], 11);
    assert_eq!(json["absolute_references"][0]["source"], "blog/post.html");
    assert_eq!(json["missing_references"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn unreadable_file_is_skipped_and_scan_continues() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("index.html"), r#"<img src="/img/none.png">"#)?;
    let files = vec![dir.path().join("gone.html"), dir.path().join("index.html")];

    let report = check_files(dir.path(), &files);

    assert_eq!(report.skipped, vec![PathBuf::from("gone.html")]);
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.total_references, 1);
    assert_eq!(report.missing_references.len(), 1);
    assert_eq!(report.missing_references[0].source, PathBuf::from("index.html"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_page_outside_root_is_scanned() -> Result<()> {
    let outside = tempfile::tempdir()?;
    fs::write(outside.path().join("page.html"), r#"<img src="/gone.png">"#)?;
    let dir = tempfile::tempdir()?;
    std::os::unix::fs::symlink(outside.path().join("page.html"), dir.path().join("page.html"))?;

    let report = check(dir.path());

    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.missing_references.len(), 1);
    assert_eq!(report.missing_references[0].source, PathBuf::from("page.html"));
    assert_eq!(report.missing_references[0].expected, dir.path().join("gone.png"));
    assert!(!report.is_clean());
    Ok(())
}
