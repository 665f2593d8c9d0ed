// sitefix-core/src/engines/mod.rs
//! Concrete implementations of the `RewriteEngine` trait.
//!
//! * `rule_engine`: applies a declarative `RuleSet` (literal and regex rules).
//! * `route_engine`: rewrites extension-less routes to `.html` files that exist in the corpus.

pub mod route_engine;
pub mod rule_engine;
