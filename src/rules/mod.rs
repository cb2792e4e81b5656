//! Substitution rules and the replacement engine for regen.
//!
//! This module handles:
//! - Compiling declared string/regex entries into rules
//! - Applying rules in order to file content, then formatting it

pub mod rewriter;
pub mod rule;

pub use rewriter::rewrite;
pub use rule::{RegexRule, Rule, RuleSet, StringRule};
