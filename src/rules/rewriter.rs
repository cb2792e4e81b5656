use crate::error::Result;
use crate::format::Formatter;
use crate::rules::rule::RuleSet;
use std::borrow::Cow;

/// Apply a rule set to file content, then run the formatter if one is given.
///
/// Each rule sees the output of the previous one. A formatter failure fails
/// the whole rewrite; the substituted content is discarded.
pub fn rewrite(content: &[u8], rules: &RuleSet, formatter: Option<&dyn Formatter>) -> Result<Vec<u8>> {
	let mut current = content.to_vec();

	for rule in rules.iter() {
		let next = match rule.apply(&current) {
			Cow::Owned(next) => Some(next),
			Cow::Borrowed(_) => None,
		};

		match next {
			Some(next) => {
				tracing::debug!(%rule, "rule matched");
				current = next;
			}
			None => tracing::debug!(%rule, "rule did not match"),
		}
	}

	match formatter {
		Some(formatter) => formatter.format(&current),
		None => Ok(current),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RegenError;
	use crate::rules::rule::{RegexRule, StringRule};
	use proptest::prelude::*;

	#[derive(Debug)]
	struct Bracket;

	impl Formatter for Bracket {
		fn format(&self, input: &[u8]) -> Result<Vec<u8>> {
			let mut out = b"<".to_vec();
			out.extend_from_slice(input);
			out.push(b'>');
			Ok(out)
		}
	}

	#[derive(Debug)]
	struct Broken;

	impl Formatter for Broken {
		fn format(&self, _input: &[u8]) -> Result<Vec<u8>> {
			Err(RegenError::FormatterFailed {
				program: "broken".to_string(),
				exit_code: 2,
				stderr: "expected declaration".to_string(),
			})
		}
	}

	fn strings(pairs: &[(&str, &str)]) -> Vec<StringRule> {
		pairs
			.iter()
			.map(|(m, r)| StringRule::new(m, r))
			.collect()
	}

	fn regexps(pairs: &[(&str, &str)]) -> Vec<RegexRule> {
		pairs
			.iter()
			.map(|(m, r)| RegexRule::new(m, r).unwrap())
			.collect()
	}

	#[test]
	fn test_empty_rule_set_is_identity() {
		let content = b"package db\n\nfunc f() {}\n";
		assert_eq!(rewrite(content, &RuleSet::default(), None).unwrap(), content);
	}

	#[test]
	fn test_string_rule_absent_match_is_identity() {
		let rules = RuleSet {
			strings: strings(&[("nowhere", "x")]),
			regexps: vec![],
		};
		assert_eq!(rewrite(b"content", &rules, None).unwrap(), b"content");
	}

	#[test]
	fn test_string_rule_replaces_every_occurrence() {
		let rules = RuleSet {
			strings: strings(&[("A", "B")]),
			regexps: vec![],
		};
		assert_eq!(rewrite(b"AAA", &rules, None).unwrap(), b"BBB");
	}

	#[test]
	fn test_regex_rule_with_captures() {
		let rules = RuleSet {
			strings: vec![],
			regexps: regexps(&[(r"(\d+)", "[$1]")]),
		};
		assert_eq!(rewrite(b"x12y34", &rules, None).unwrap(), b"x[12]y[34]");
	}

	#[test]
	fn test_strings_run_before_regexps() {
		let rules = RuleSet {
			strings: strings(&[("a", "b")]),
			regexps: regexps(&[("b", "c")]),
		};
		assert_eq!(rewrite(b"a", &rules, None).unwrap(), b"c");
	}

	#[test]
	fn test_regex_then_string_when_applied_separately() {
		let regex_first = RuleSet {
			strings: vec![],
			regexps: regexps(&[("b", "c")]),
		};
		let string_second = RuleSet {
			strings: strings(&[("a", "b")]),
			regexps: vec![],
		};

		let after_regex = rewrite(b"a", &regex_first, None).unwrap();
		assert_eq!(after_regex, b"a");
		assert_eq!(rewrite(&after_regex, &string_second, None).unwrap(), b"b");
	}

	#[test]
	fn test_rules_apply_sequentially() {
		let rules = RuleSet {
			strings: strings(&[("one", "two"), ("two", "three")]),
			regexps: regexps(&[("three", "four"), ("fo(u)r", "f${1}n")]),
		};
		assert_eq!(rewrite(b"one", &rules, None).unwrap(), b"fun");
	}

	#[test]
	fn test_single_pass_not_fixed_point() {
		let rules = RuleSet {
			strings: strings(&[("x", "xx")]),
			regexps: vec![],
		};
		assert_eq!(rewrite(b"x", &rules, None).unwrap(), b"xx");
	}

	#[test]
	fn test_non_utf8_content() {
		let rules = RuleSet {
			strings: strings(&[("old", "new")]),
			regexps: vec![],
		};
		let content = b"\xff\xfe old \x80";
		assert_eq!(rewrite(content, &rules, None).unwrap(), b"\xff\xfe new \x80");
	}

	#[test]
	fn test_formatter_runs_last() {
		let rules = RuleSet {
			strings: strings(&[("a", "b")]),
			regexps: vec![],
		};
		assert_eq!(rewrite(b"a", &rules, Some(&Bracket)).unwrap(), b"<b>");
	}

	#[test]
	fn test_formatter_failure_fails_rewrite() {
		let rules = RuleSet {
			strings: strings(&[("a", "b")]),
			regexps: vec![],
		};
		assert!(matches!(
			rewrite(b"a", &rules, Some(&Broken)),
			Err(RegenError::FormatterFailed { exit_code: 2, .. })
		));
	}

	proptest! {
		#[test]
		fn prop_empty_rule_set_is_identity(content in proptest::collection::vec(any::<u8>(), 0..512)) {
			prop_assert_eq!(rewrite(&content, &RuleSet::default(), None).unwrap(), content);
		}

		#[test]
		fn prop_absent_literal_is_identity(content in "[a-y ]{0,200}") {
			let rules = RuleSet {
				strings: strings(&[("z", "replaced")]),
				regexps: vec![],
			};
			prop_assert_eq!(rewrite(content.as_bytes(), &rules, None).unwrap(), content.as_bytes());
		}

		#[test]
		fn prop_rewrite_is_deterministic(content in "[a-d0-9 ]{0,200}") {
			let rules = RuleSet {
				strings: strings(&[("ab", "ba")]),
				regexps: regexps(&[(r"(\d)c", "c$1")]),
			};
			let first = rewrite(content.as_bytes(), &rules, None).unwrap();
			let second = rewrite(content.as_bytes(), &rules, None).unwrap();
			prop_assert_eq!(first, second);
		}
	}
}
