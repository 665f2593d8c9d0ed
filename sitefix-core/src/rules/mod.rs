//! Rule compilation for the rewrite engines.
//!
//! `compiler` turns a validated `RuleSet` into matchers that can be applied
//! repeatedly to file contents, and caches the result per rule set.

pub mod compiler;
