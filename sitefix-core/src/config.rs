//! Configuration management for `sitefix-core`.
//!
//! This module defines the core data structures for rewrite rules and rule sets.
//! It handles deserialization of YAML rule sets, provides the embedded built-in
//! rule sets, and validates rule integrity before anything is compiled.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::SitefixError;

/// Maximum allowed length for a pattern string, measured after placeholder expansion.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Placeholder replaced by each entry of a rule's `targets` list.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Placeholder replaced by an escaped alternation of a rule's `keywords` list.
pub const KEYWORDS_PLACEHOLDER: &str = "{keywords}";

const BUILTIN_RULE_SETS: &[(&str, &str)] = &[
    ("next-paths", include_str!("../rulesets/next-paths.yaml")),
    ("obsolete-sections", include_str!("../rulesets/obsolete-sections.yaml")),
    ("page-chunk-scripts", include_str!("../rulesets/page-chunk-scripts.yaml")),
];

/// How a rule's `pattern` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Plain substring, matched case-sensitively.
    Literal,
    #[default]
    Regex,
}

/// What happens to the text a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Substitute `replace_with`. Regex rules may reference capture groups as `$1`.
    #[default]
    Replace,
    /// Remove the matched region entirely.
    Delete,
}

/// A single pattern/action pair applied to the text of one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteRule {
    /// Unique identifier for the rule within its set (e.g. "next_static_prefix").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    pub pattern: String,
    pub pattern_type: PatternType,
    pub action: RuleAction,
    pub replace_with: String,
    pub case_insensitive: bool,
    /// If true, `^` and `$` match at line boundaries.
    pub multiline: bool,
    /// If true, `.` also matches newlines.
    pub dot_matches_new_line: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    /// When set, the rule is expanded once per entry with `{target}` substituted.
    pub targets: Option<Vec<String>>,
    /// When set, `{keywords}` is substituted with an escaped alternation of these words.
    pub keywords: Option<Vec<String>>,
}

impl RewriteRule {
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }

    /// Expands `{target}` and `{keywords}` placeholders into concrete
    /// `(name, pattern)` pairs. Literal rules are never expanded.
    pub fn expanded_patterns(&self) -> Vec<(String, String)> {
        if self.pattern_type == PatternType::Literal {
            return vec![(self.name.clone(), self.pattern.clone())];
        }

        let mut pattern = self.pattern.clone();
        if let Some(keywords) = &self.keywords {
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            pattern = pattern.replace(KEYWORDS_PLACEHOLDER, &format!("(?:{})", alternation));
        }

        match &self.targets {
            Some(targets) => targets
                .iter()
                .map(|t| {
                    (
                        format!("{}[{}]", self.name, t),
                        pattern.replace(TARGET_PLACEHOLDER, &regex::escape(t)),
                    )
                })
                .collect(),
            None => vec![(self.name.clone(), pattern)],
        }
    }
}

/// An ordered, named collection of rewrite rules plus the settings that
/// govern how a batch run writes its results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleSet {
    pub name: String,
    pub description: Option<String>,
    /// Suffix appended to a file name for the pre-modification copy.
    pub backup_suffix: Option<String>,
    /// Guard keywords. When non-empty, a file whose lower-cased text contains
    /// none of them is left untouched.
    pub require_any: Vec<String>,
    pub rules: Vec<RewriteRule>,
}

impl RuleSet {
    /// Loads a rule set from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading rule set from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule set file {}", path.display()))?;
        let rule_set = Self::from_yaml(&text)
            .with_context(|| format!("Failed to load rule set file {}", path.display()))?;
        info!("Loaded {} rules from file {}.", rule_set.rules.len(), path.display());
        Ok(rule_set)
    }

    /// Parses and validates a rule set from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let rule_set: RuleSet = serde_yml::from_str(text).context("Failed to parse rule set")?;
        validate_rule_set(&rule_set)?;
        Ok(rule_set)
    }

    /// Loads one of the rule sets embedded in the library.
    pub fn builtin(name: &str) -> Result<Self> {
        debug!("Loading built-in rule set '{}'.", name);
        let (_, yaml) = BUILTIN_RULE_SETS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| {
                SitefixError::InvalidRuleSet(format!(
                    "no built-in rule set named '{}' (available: {})",
                    name,
                    Self::builtin_names().join(", ")
                ))
            })?;
        Self::from_yaml(yaml).with_context(|| format!("Failed to parse built-in rule set '{}'", name))
    }

    pub fn builtin_names() -> Vec<&'static str> {
        BUILTIN_RULE_SETS.iter().map(|(name, _)| *name).collect()
    }

    /// Returns true when the guard is empty or `text` mentions one of its keywords.
    pub fn guard_allows(&self, text: &str) -> bool {
        if self.require_any.is_empty() {
            return true;
        }
        let lower = text.to_lowercase();
        self.require_any.iter().any(|k| lower.contains(&k.to_lowercase()))
    }
}

/// A backup is written as `<file><suffix>`, so the suffix must be non-empty
/// and contain no path separators for the backup to be a distinct sibling.
pub fn validate_backup_suffix(suffix: &str) -> std::result::Result<(), String> {
    if suffix.is_empty() || suffix.contains('/') || suffix.contains('\\') {
        Err(format!(
            "Backup suffix '{}' must be non-empty and contain no path separators",
            suffix
        ))
    } else {
        Ok(())
    }
}

/// Validates rule integrity (names, placeholders, regex compilation, capture groups).
fn validate_rule_set(rule_set: &RuleSet) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();
    let capture_group_regex = Regex::new(r"\$(?:\$|\{([^}]*)\}|([0-9A-Za-z_]+))")?;

    if rule_set.name.is_empty() {
        errors.push("The rule set has an empty `name` field.".to_string());
    }
    if let Some(suffix) = &rule_set.backup_suffix {
        if let Err(e) = validate_backup_suffix(suffix) {
            errors.push(format!("{}.", e));
        }
    }

    for rule in &rule_set.rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if rule.pattern_type == PatternType::Literal {
            if rule.targets.is_some() || rule.keywords.is_some() {
                errors.push(format!("Rule '{}': literal rules cannot use `targets` or `keywords`.", rule.name));
            }
            continue;
        }

        let has_target = rule.pattern.contains(TARGET_PLACEHOLDER);
        if has_target != rule.targets.is_some() {
            errors.push(format!(
                "Rule '{}': `{}` placeholder and `targets` list must be used together.",
                rule.name, TARGET_PLACEHOLDER
            ));
        }
        let has_keywords = rule.pattern.contains(KEYWORDS_PLACEHOLDER);
        if has_keywords != rule.keywords.is_some() {
            errors.push(format!(
                "Rule '{}': `{}` placeholder and `keywords` list must be used together.",
                rule.name, KEYWORDS_PLACEHOLDER
            ));
        }
        if matches!(&rule.keywords, Some(k) if k.is_empty()) || matches!(&rule.targets, Some(t) if t.is_empty()) {
            errors.push(format!("Rule '{}': `targets` and `keywords` lists cannot be empty.", rule.name));
        }

        for (name, pattern) in rule.expanded_patterns() {
            if let Err(e) = Regex::new(&pattern) {
                errors.push(format!("Rule '{}' has an invalid regex pattern: {}", name, e));
                continue;
            }

            if rule.action == RuleAction::Replace {
                let mut group_count = 0;
                let mut is_escaped = false;
                for c in pattern.chars() {
                    match c {
                        '\\' => is_escaped = !is_escaped,
                        '(' if !is_escaped => group_count += 1,
                        _ => is_escaped = false,
                    }
                }

                for cap in capture_group_regex.captures_iter(&rule.replace_with) {
                    // `$$` is a literal dollar sign.
                    let reference = match (cap.get(1), cap.get(2)) {
                        (Some(braced), _) => braced.as_str(),
                        (None, Some(bare)) => bare.as_str(),
                        (None, None) => continue,
                    };
                    let digits = reference.len() - reference.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                    if digits == 0 {
                        continue;
                    }
                    if digits < reference.len() {
                        if cap.get(2).is_some() {
                            errors.push(format!(
                                "Rule '{}': replacement '${}' is read as the named group '{}'; write '${{{}}}' to reference group {}.",
                                name,
                                reference,
                                reference,
                                &reference[..digits],
                                &reference[..digits]
                            ));
                        }
                        continue;
                    }
                    if let Ok(group_num) = reference.parse::<usize>() {
                        if group_num > group_count {
                            errors.push(format!(
                                "Rule '{}': replacement references non-existent capture group '${}'.",
                                name, group_num
                            ));
                        }
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(SitefixError::InvalidRuleSet(format!(
            "validation of '{}' failed:\n{}",
            rule_set.name,
            errors.join("\n")
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rule_sets_parse() {
        for name in RuleSet::builtin_names() {
            let rule_set = RuleSet::builtin(name).unwrap();
            assert_eq!(rule_set.name, name);
            assert!(!rule_set.rules.is_empty());
        }
    }

    #[test]
    fn unknown_builtin_is_rejected() {
        let err = RuleSet::builtin("nope").unwrap_err();
        assert!(err.to_string().contains("next-paths"));
    }

    #[test]
    fn targets_expand_with_escaping() {
        let rule = RewriteRule {
            name: "chunk".into(),
            pattern: "pages/{target}\\.js".into(),
            targets: Some(vec!["a.b".into(), "c".into()]),
            ..Default::default()
        };
        let expanded = rule.expanded_patterns();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0], ("chunk[a.b]".to_string(), "pages/a\\.b\\.js".to_string()));
        assert_eq!(expanded[1].1, "pages/c\\.js");
    }

    #[test]
    fn keywords_expand_to_alternation() {
        let rule = RewriteRule {
            name: "kw".into(),
            pattern: "<h1>{keywords}</h1>".into(),
            keywords: Some(vec!["meus cupons".into(), "plano".into()]),
            ..Default::default()
        };
        assert_eq!(rule.expanded_patterns()[0].1, "<h1>(?:meus cupons|plano)</h1>");
    }

    #[test]
    fn placeholder_without_list_fails_validation() {
        let yaml = r#"
name: broken
rules:
  - name: chunk
    pattern: "pages/{target}"
"#;
        let err = RuleSet::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("`targets` list must be used together"));
    }

    #[test]
    fn bad_capture_group_reference_fails_validation() {
        let yaml = r#"
name: broken
rules:
  - name: swap
    pattern: "(a)"
    replace_with: "$2"
"#;
        let err = RuleSet::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("non-existent capture group '$2'"));
    }

    #[test]
    fn digits_followed_by_word_chars_fail_validation() {
        let yaml = r#"
name: broken
rules:
  - name: suffixed
    pattern: "(a)"
    replace_with: "$1x"
"#;
        let err = RuleSet::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("read as the named group '1x'; write '${1}'"));
    }

    #[test]
    fn braced_and_escaped_references_pass_validation() {
        let yaml = r#"
name: fine
rules:
  - name: braced
    pattern: "(a)(b)"
    replace_with: "${1}x$$2 ${2}"
"#;
        assert!(RuleSet::from_yaml(yaml).is_ok());

        let yaml = r#"
name: broken
rules:
  - name: braced
    pattern: "(a)"
    replace_with: "${3}"
"#;
        let err = RuleSet::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("non-existent capture group '$3'"));
    }

    #[test]
    fn backup_suffix_must_name_a_sibling() {
        assert!(validate_backup_suffix(".bak").is_ok());
        assert!(validate_backup_suffix("").is_err());
        assert!(validate_backup_suffix("/x").is_err());
        assert!(validate_backup_suffix("\\x").is_err());
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let yaml = r#"
name: dupes
rules:
  - name: a
    pattern_type: literal
    pattern: x
  - name: a
    pattern_type: literal
    pattern: y
"#;
        let err = RuleSet::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate rule name found: 'a'"));
    }

    #[test]
    fn guard_is_case_insensitive() {
        let rule_set = RuleSet {
            require_any: vec!["cupom".into()],
            ..Default::default()
        };
        assert!(rule_set.guard_allows("Use o CUPOM hoje"));
        assert!(!rule_set.guard_allows("nothing to see"));
        assert!(RuleSet::default().guard_allows("anything"));
    }
}
