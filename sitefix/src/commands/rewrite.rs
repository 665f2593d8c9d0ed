//! Runner shared by every rewriting subcommand.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;

use sitefix_core::{
    run_batch, BatchOptions, BatchSummary, CorpusLocator, ReadPolicy, RewriteEngine, RouteEngine, RuleEngine,
    RuleSet,
};

use crate::cli::{CorpusArgs, RewriteArgs};
use crate::commands::warn_msg;
use crate::ui::diff_viewer;
use crate::ui::summary;
use crate::ui::theme::ThemeMap;

/// Which engine a rewriting subcommand runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteKind {
    FixPaths,
    StripSections,
    RemoveScripts,
    LinkRoutes,
    /// A rule set loaded from a YAML file.
    Custom(PathBuf),
}

impl RewriteKind {
    /// The built-in rule set behind this kind, if it has one.
    pub fn builtin_rule_set(&self) -> Option<&'static str> {
        match self {
            RewriteKind::FixPaths => Some("next-paths"),
            RewriteKind::StripSections => Some("obsolete-sections"),
            RewriteKind::RemoveScripts => Some("page-chunk-scripts"),
            RewriteKind::LinkRoutes | RewriteKind::Custom(_) => None,
        }
    }

    fn engine(&self, root: &std::path::Path) -> Result<Box<dyn RewriteEngine>> {
        let engine: Box<dyn RewriteEngine> = match self {
            RewriteKind::LinkRoutes => Box::new(RouteEngine::new(root)),
            RewriteKind::Custom(path) => {
                let rule_set = RuleSet::load_from_file(path)?;
                Box::new(RuleEngine::new(rule_set)?)
            }
            builtin => {
                let name = builtin
                    .builtin_rule_set()
                    .context("rewrite kind has no built-in rule set")?;
                Box::new(RuleEngine::builtin(name)?)
            }
        };
        Ok(engine)
    }
}

/// Resolves the corpus root from the CLI arguments.
pub fn locate_root(corpus: &CorpusArgs) -> Result<PathBuf> {
    let locator = CorpusLocator::from_current_dir(&corpus.root, corpus.project_dir.clone())?;
    Ok(locator.locate()?)
}

/// Backup, read-failure and dry-run settings for one run.
pub fn batch_options(args: &RewriteArgs, engine: &dyn RewriteEngine) -> BatchOptions {
    let backup_suffix = if args.no_backup {
        None
    } else {
        args.backup_suffix
            .clone()
            .or_else(|| engine.backup_suffix().map(str::to_string))
    };
    BatchOptions {
        backup_suffix,
        read_policy: if args.skip_unreadable { ReadPolicy::Skip } else { ReadPolicy::Abort },
        dry_run: args.dry_run,
    }
}

/// Locates the corpus, rewrites it and prints the summary (and diffs) to stdout.
pub fn run_rewrite(kind: RewriteKind, args: &RewriteArgs, theme: &ThemeMap) -> Result<BatchSummary> {
    let root = locate_root(&args.corpus)?;
    info!("Corpus root: {}", root.display());

    let engine = kind.engine(&root)?;
    let options = batch_options(args, engine.as_ref());
    debug!("Batch options: {:?}", options);

    let summary = run_batch(&root, engine.as_ref(), &options)?;

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();

    if args.diff {
        for change in &summary.changes {
            diff_viewer::print_diff(&change.path, &change.original, &change.rewritten, &mut writer, theme, supports_color)
                .context("Failed to write diff")?;
        }
    }
    summary::print_batch_summary(&summary, &mut writer, theme, supports_color)
        .context("Failed to write summary")?;
    writer.flush()?;

    if !summary.skipped.is_empty() {
        warn_msg(format!("{} unreadable file(s) were skipped.", summary.skipped.len()), theme);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitefix_core::DEFAULT_CORPUS_DIR;
    use test_log::test;

    fn args() -> RewriteArgs {
        RewriteArgs {
            corpus: CorpusArgs {
                root: PathBuf::from(DEFAULT_CORPUS_DIR),
                project_dir: None,
            },
            dry_run: false,
            diff: false,
            no_backup: false,
            backup_suffix: None,
            skip_unreadable: false,
        }
    }

    #[test]
    fn builtin_kinds_map_to_rule_sets() {
        for kind in [RewriteKind::FixPaths, RewriteKind::StripSections, RewriteKind::RemoveScripts] {
            let name = kind.builtin_rule_set().unwrap();
            assert!(RuleSet::builtin_names().contains(&name));
        }
        assert_eq!(RewriteKind::LinkRoutes.builtin_rule_set(), None);
    }

    #[test]
    fn backup_suffix_precedence() {
        let engine = RuleEngine::builtin("obsolete-sections").unwrap();
        assert_eq!(batch_options(&args(), &engine).backup_suffix.as_deref(), Some(".bak"));

        let mut overridden = args();
        overridden.backup_suffix = Some(".orig".into());
        assert_eq!(batch_options(&overridden, &engine).backup_suffix.as_deref(), Some(".orig"));

        let mut disabled = args();
        disabled.no_backup = true;
        assert_eq!(batch_options(&disabled, &engine).backup_suffix, None);
    }

    #[test]
    fn skip_unreadable_selects_skip_policy() {
        let engine = RuleEngine::builtin("next-paths").unwrap();
        assert_eq!(batch_options(&args(), &engine).read_policy, ReadPolicy::Abort);
        let mut tolerant = args();
        tolerant.skip_unreadable = true;
        assert_eq!(batch_options(&tolerant, &engine).read_policy, ReadPolicy::Skip);
    }
}
