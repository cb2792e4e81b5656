use crate::config::types::Replace;
use crate::error::{RegenError, Result};
use memchr::memmem::Finder;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Literal substitution. Every non-overlapping occurrence of the match text
/// is replaced, scanning left to right; the replacement is inserted verbatim.
///
/// An empty match text inserts the replacement before every character and
/// at the end. Invalid UTF-8 bytes count as one character each.
#[derive(Debug, Clone)]
pub struct StringRule {
	literal: String,
	finder: Finder<'static>,
	replacement: String,
}

/// Regex substitution. The replacement template may reference capture
/// groups (`$1`, `${name}`).
#[derive(Debug, Clone)]
pub struct RegexRule {
	pattern: Regex,
	replacement: String,
}

/// A single substitution instruction.
#[derive(Debug, Clone)]
pub enum Rule {
	String(StringRule),
	Regex(RegexRule),
}

/// The compiled rules for one file.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	pub strings: Vec<StringRule>,
	pub regexps: Vec<RegexRule>,
}

impl StringRule {
	pub fn new(literal: &str, replacement: &str) -> Self {
		StringRule {
			literal: literal.to_string(),
			finder: Finder::new(literal.as_bytes()).into_owned(),
			replacement: replacement.to_string(),
		}
	}

	pub fn literal(&self) -> &str {
		&self.literal
	}

	pub fn replacement(&self) -> &str {
		&self.replacement
	}

	/// Apply this rule, borrowing the input back when nothing matched.
	pub fn apply<'a>(&self, content: &'a [u8]) -> Cow<'a, [u8]> {
		let replacement = self.replacement.as_bytes();

		if self.literal.is_empty() {
			return Cow::Owned(insert_at_char_boundaries(content, replacement));
		}

		let mut matches = self.finder.find_iter(content).peekable();
		if matches.peek().is_none() {
			return Cow::Borrowed(content);
		}

		let mut out = Vec::with_capacity(content.len());
		let mut last = 0;
		for start in matches {
			out.extend_from_slice(&content[last..start]);
			out.extend_from_slice(replacement);
			last = start + self.literal.len();
		}
		out.extend_from_slice(&content[last..]);

		Cow::Owned(out)
	}
}

/// Insert `insert` before every character of `content` and once at the end.
fn insert_at_char_boundaries(content: &[u8], insert: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len() + insert.len() * (content.len() + 1));
	out.extend_from_slice(insert);

	for chunk in content.utf8_chunks() {
		let mut buf = [0u8; 4];
		for ch in chunk.valid().chars() {
			out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
			out.extend_from_slice(insert);
		}
		for byte in chunk.invalid() {
			out.push(*byte);
			out.extend_from_slice(insert);
		}
	}

	out
}

impl RegexRule {
	pub fn new(pattern: &str, replacement: &str) -> std::result::Result<Self, regex::Error> {
		Ok(RegexRule {
			pattern: Regex::new(pattern)?,
			replacement: replacement.to_string(),
		})
	}

	pub fn pattern(&self) -> &str {
		self.pattern.as_str()
	}

	pub fn replacement(&self) -> &str {
		&self.replacement
	}

	/// Apply this rule, borrowing the input back when nothing matched.
	pub fn apply<'a>(&self, content: &'a [u8]) -> Cow<'a, [u8]> {
		self.pattern
			.replace_all(content, self.replacement.as_bytes())
	}
}

impl Rule {
	pub fn apply<'a>(&self, content: &'a [u8]) -> Cow<'a, [u8]> {
		match self {
			Rule::String(rule) => rule.apply(content),
			Rule::Regex(rule) => rule.apply(content),
		}
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Rule::String(rule) => {
				write!(f, "string {:?} -> {:?}", rule.literal(), rule.replacement())
			}
			Rule::Regex(rule) => {
				write!(f, "regexp {:?} -> {:?}", rule.pattern(), rule.replacement())
			}
		}
	}
}

impl RuleSet {
	/// Compile the declared rules of a regenerate entry.
	///
	/// Fails on the first regex that does not compile; `file` is only used
	/// to label the error.
	pub fn compile(replace: &Replace, file: &Path) -> Result<Self> {
		let strings = replace
			.strings
			.iter()
			.map(|entry| StringRule::new(&entry.pattern, &entry.replacement))
			.collect();

		let regexps = replace
			.regexps
			.iter()
			.map(|entry| {
				RegexRule::new(&entry.pattern, &entry.replacement).map_err(|source| {
					RegenError::InvalidRegex {
						file: file.to_path_buf(),
						pattern: entry.pattern.clone(),
						source,
					}
				})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(RuleSet { strings, regexps })
	}

	/// Rules in application order: every string rule, then every regex rule.
	pub fn iter(&self) -> impl Iterator<Item = Rule> + '_ {
		self.strings
			.iter()
			.cloned()
			.map(Rule::String)
			.chain(self.regexps.iter().cloned().map(Rule::Regex))
	}

	pub fn len(&self) -> usize {
		self.strings.len() + self.regexps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
