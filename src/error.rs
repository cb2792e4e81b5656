use std::path::PathBuf;

/// Library-level structured errors for regen.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RegenError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: serde_yaml_ng::Error,
	},

	#[error("Invalid regex pattern for {file}: {pattern}")]
	InvalidRegex {
		file: PathBuf,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to open file: {path}")]
	FileOpenError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read file: {path}")]
	FileReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write file: {path}")]
	FileWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to run formatter: {program}")]
	FormatterSpawn {
		program: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write input to formatter: {program}")]
	FormatterInput {
		program: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Formatter exited with non-zero code: {program} (exit code: {exit_code}): {stderr}")]
	FormatterFailed {
		program: String,
		exit_code: i32,
		stderr: String,
	},

	#[error("Failed to regenerate {file}")]
	Regenerate {
		file: PathBuf,
		#[source]
		source: Box<RegenError>,
	},
}

/// Result type alias using RegenError.
pub type Result<T> = std::result::Result<T, RegenError>;
