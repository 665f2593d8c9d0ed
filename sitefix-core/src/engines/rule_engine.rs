// sitefix-core/src/engines/rule_engine.rs
//! A `RewriteEngine` implementation that applies a declarative `RuleSet`.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::debug;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use crate::config::RuleSet;
use crate::engine::{Rewrite, RewriteEngine, RuleHit};
use crate::rules::compiler::{get_or_compile_rules, CompiledRules};

#[derive(Debug)]
pub struct RuleEngine {
    compiled_rules: Arc<CompiledRules>,
    rule_set: RuleSet,
}

impl RuleEngine {
    pub fn new(rule_set: RuleSet) -> Result<Self> {
        let compiled_rules = get_or_compile_rules(&rule_set)
            .with_context(|| format!("Failed to compile rule set '{}'", rule_set.name))?;
        Ok(Self { compiled_rules, rule_set })
    }

    /// Convenience constructor for one of the embedded rule sets.
    pub fn builtin(name: &str) -> Result<Self> {
        Self::new(RuleSet::builtin(name)?)
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }
}

impl RewriteEngine for RuleEngine {
    fn name(&self) -> &str {
        &self.rule_set.name
    }

    fn rewrite(&self, content: &str, source: &Path) -> Result<Rewrite> {
        if !self.rule_set.guard_allows(content) {
            debug!("{}: no guard keyword present, skipping.", source.display());
            return Ok(Rewrite::unchanged(content));
        }

        let mut text = Cow::Borrowed(content);
        let mut hits = Vec::new();
        for rule in &self.compiled_rules.rules {
            let (rewritten, occurrences) = rule.apply(&text);
            if occurrences == 0 {
                continue;
            }
            debug!("{}: rule '{}' matched {} time(s).", source.display(), rule.name, occurrences);
            let rewritten = rewritten.into_owned();
            text = Cow::Owned(rewritten);
            hits.push(RuleHit {
                rule_name: rule.name.clone(),
                occurrences,
            });
        }

        Ok(Rewrite {
            content: text.into_owned(),
            hits,
        })
    }

    fn backup_suffix(&self) -> Option<&str> {
        self.rule_set.backup_suffix.as_deref()
    }
}
