//! The `rules` subcommand: lists the built-in rule sets.

use anyhow::Result;
use std::io::{self, Write};

use sitefix_core::{PatternType, RuleAction, RuleSet};

/// Writes every built-in rule set with its rules, one rule per line.
pub fn write_rules<W: Write + ?Sized>(writer: &mut W) -> Result<()> {
    for name in RuleSet::builtin_names() {
        let rule_set = RuleSet::builtin(name)?;
        match &rule_set.description {
            Some(description) => writeln!(writer, "{}: {}", name, description)?,
            None => writeln!(writer, "{}", name)?,
        }
        if let Some(suffix) = &rule_set.backup_suffix {
            writeln!(writer, "  backup suffix: {}", suffix)?;
        }
        for rule in &rule_set.rules {
            let kind = match rule.pattern_type {
                PatternType::Literal => "literal",
                PatternType::Regex => "regex",
            };
            let action = match rule.action {
                RuleAction::Replace => "replace",
                RuleAction::Delete => "delete",
            };
            let state = if rule.is_enabled() { "" } else { " (disabled)" };
            writeln!(writer, "  - {} [{} {}]{}", rule.name, kind, action, state)?;
        }
    }
    Ok(())
}

pub fn run_rules() -> Result<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_rules(&mut writer)?;
    writer.flush()?;
    Ok(())
}
