use crate::format::Formatter;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Top-level configuration from a `regen.yaml` document.
///
/// The base directory and formatter are never read from the document; they
/// are attached afterwards through [`ConfigOption`](crate::config::ConfigOption)s.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Configuration {
	/// Packages in declaration order.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub packages: Vec<Package>,

	#[serde(skip)]
	pub(crate) directory: Option<PathBuf>,

	#[serde(skip)]
	pub(crate) formatter: Option<Arc<dyn Formatter>>,
}

/// A group of regenerate entries. Grouping carries no semantics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Package {
	#[serde(default, deserialize_with = "null_as_empty")]
	pub regenerates: Vec<Replace>,
}

/// One target file and the rules to apply to it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Replace {
	/// Path of the file, relative to the base directory.
	pub file: PathBuf,

	/// Literal substitutions, applied first.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub strings: Vec<StringEntry>,

	/// Regex substitutions, applied after all literal ones.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub regexps: Vec<RegexEntry>,
}

/// A declared literal substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StringEntry {
	#[serde(rename = "match")]
	pub pattern: String,

	#[serde(default)]
	pub replacement: String,
}

/// A declared regex substitution. `replacement` may reference capture
/// groups as `$1` or `${name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegexEntry {
	#[serde(rename = "match")]
	pub pattern: String,

	#[serde(default)]
	pub replacement: String,
}

impl Configuration {
	/// Base directory prepended to every file path, if any.
	pub fn directory(&self) -> Option<&Path> {
		self.directory.as_deref()
	}

	/// Formatter run after substitutions, if any.
	pub fn formatter(&self) -> Option<&dyn Formatter> {
		self.formatter.as_deref()
	}

	/// Resolve a declared file path against the base directory.
	pub fn resolve(&self, file: &Path) -> PathBuf {
		match &self.directory {
			Some(dir) => dir.join(file),
			None => file.to_path_buf(),
		}
	}

	/// All regenerate entries across packages, in declaration order.
	pub fn replaces(&self) -> impl Iterator<Item = &Replace> {
		self.packages.iter().flat_map(|pkg| pkg.regenerates.iter())
	}
}

/// A YAML key present with no value (`strings:`) deserializes as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
