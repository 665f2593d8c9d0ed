//! compiler.rs - Manages the compilation and caching of rewrite rules.
//!
//! This module converts a `RuleSet` into `CompiledRules`, expanding target and
//! keyword placeholders and building one matcher per concrete rule. A global,
//! shared cache avoids recompiling the same rule set twice in one process.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{PatternType, RewriteRule, RuleAction, RuleSet, MAX_PATTERN_LENGTH};
use crate::errors::SitefixError;

/// How a compiled rule finds its matches.
#[derive(Debug)]
pub enum Matcher {
    Literal(String),
    Regex(Regex),
}

/// Represents a single compiled rewrite rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// Rule name; expanded rules carry their target, e.g. `next_page_chunk[sobre-leidy]`.
    pub name: String,
    pub matcher: Matcher,
    pub action: RuleAction,
    pub replace_with: String,
}

impl CompiledRule {
    /// Applies this rule to `text`, returning the new text and how many
    /// regions were rewritten. Borrows `text` when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        match &self.matcher {
            Matcher::Literal(needle) => {
                let occurrences = text.matches(needle.as_str()).count();
                if occurrences == 0 {
                    return (Cow::Borrowed(text), 0);
                }
                let replacement = match self.action {
                    RuleAction::Replace => self.replace_with.as_str(),
                    RuleAction::Delete => "",
                };
                (Cow::Owned(text.replace(needle.as_str(), replacement)), occurrences)
            }
            Matcher::Regex(regex) => {
                let occurrences = regex.find_iter(text).count();
                if occurrences == 0 {
                    return (Cow::Borrowed(text), 0);
                }
                let rewritten = match self.action {
                    RuleAction::Replace => regex.replace_all(text, self.replace_with.as_str()),
                    RuleAction::Delete => regex.replace_all(text, NoExpand("")),
                };
                (rewritten, occurrences)
            }
        }
    }
}

/// The compiled form of a `RuleSet`, in application order.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled rule sets.
    /// The key is a hash of the `RuleSet`.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> = RwLock::new(HashMap::new());
}

fn hash_rule_set(rule_set: &RuleSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    rule_set.hash(&mut hasher);
    hasher.finish()
}

fn build_regex(name: &str, pattern: &str, rule: &RewriteRule) -> Result<Regex, SitefixError> {
    RegexBuilder::new(pattern)
        .case_insensitive(rule.case_insensitive)
        .multi_line(rule.multiline)
        .dot_matches_new_line(rule.dot_matches_new_line)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| SitefixError::RuleCompilation(name.to_string(), e))
}

/// Compiles the enabled rules of a rule set, preserving their order.
/// Disabled rules are skipped; every compilation failure is reported at once.
pub fn compile_rules(rules_to_compile: &[RewriteRule]) -> Result<CompiledRules, SitefixError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if !rule.is_enabled() {
            debug!("Skipping disabled rule '{}'.", rule.name);
            continue;
        }

        for (name, pattern) in rule.expanded_patterns() {
            if pattern.len() > MAX_PATTERN_LENGTH {
                compilation_errors.push(SitefixError::PatternLengthExceeded(name, pattern.len(), MAX_PATTERN_LENGTH));
                continue;
            }

            let matcher = match rule.pattern_type {
                PatternType::Literal => Matcher::Literal(pattern),
                PatternType::Regex => match build_regex(&name, &pattern, rule) {
                    Ok(regex) => Matcher::Regex(regex),
                    Err(e) => {
                        compilation_errors.push(e);
                        continue;
                    }
                },
            };

            log::debug!(
                target: "sitefix_core::rules",
                "Rule '{}' compiled successfully.",
                &name
            );
            compiled_rules.push(CompiledRule {
                name,
                matcher,
                action: rule.action,
                replace_with: rule.replace_with.clone(),
            });
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(SitefixError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
        Ok(CompiledRules { rules: compiled_rules })
    }
}

/// Gets a `CompiledRules` instance from the cache or compiles it if not found.
pub fn get_or_compile_rules(rule_set: &RuleSet) -> Result<Arc<CompiledRules>> {
    let cache_key = hash_rule_set(rule_set);

    {
        let cache = COMPILED_RULES_CACHE
            .read()
            .map_err(|_| anyhow!("compiled rule cache lock poisoned"))?;
        if let Some(rules) = cache.get(&cache_key) {
            debug!("Serving compiled rules for '{}' from cache.", rule_set.name);
            return Ok(Arc::clone(rules));
        }
    }

    debug!("Compiled rules for '{}' not found in cache. Compiling now.", rule_set.name);
    let compiled = Arc::new(compile_rules(&rule_set.rules)?);

    COMPILED_RULES_CACHE
        .write()
        .map_err(|_| anyhow!("compiled rule cache lock poisoned"))?
        .insert(cache_key, Arc::clone(&compiled));

    Ok(compiled)
}
