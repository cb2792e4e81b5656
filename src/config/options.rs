use crate::config::types::Configuration;
use crate::format::Formatter;
use std::path::PathBuf;
use std::sync::Arc;

/// A post-parse override applied to a [`Configuration`].
#[derive(Debug, Clone)]
pub enum ConfigOption {
	/// Base directory prepended to every declared file path.
	Directory(PathBuf),

	/// Formatter run over each file after its substitutions.
	Formatter(Arc<dyn Formatter>),
}

/// Set the base directory used to resolve every file path.
pub fn with_directory(dir: impl Into<PathBuf>) -> ConfigOption {
	ConfigOption::Directory(dir.into())
}

/// Attach a formatter to run after substitutions.
pub fn with_formatter(formatter: impl Formatter + 'static) -> ConfigOption {
	ConfigOption::Formatter(Arc::new(formatter))
}

impl Configuration {
	/// Apply options in the order given. Nothing is validated here; a bad
	/// directory only shows up when files are opened.
	pub fn apply<I>(&mut self, options: I)
	where
		I: IntoIterator<Item = ConfigOption>,
	{
		for option in options {
			match option {
				ConfigOption::Directory(dir) => self.directory = Some(dir),
				ConfigOption::Formatter(formatter) => self.formatter = Some(formatter),
			}
		}
	}

	/// Builder-style variant of [`Configuration::apply`].
	pub fn with_options<I>(mut self, options: I) -> Self
	where
		I: IntoIterator<Item = ConfigOption>,
	{
		self.apply(options);
		self
	}
}
