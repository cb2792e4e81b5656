use crate::config::types::Configuration;
use crate::error::{RegenError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Configuration> {
	let content = std::fs::read(path).map_err(|source| RegenError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_bytes(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Configuration> {
	parse_config_bytes(content.as_bytes(), path)
}

/// Parse a config from raw document bytes.
///
/// `path` is only used to label errors.
pub fn parse_config_bytes(content: &[u8], path: &Path) -> Result<Configuration> {
	// serde_yaml_ng rejects a document without any node
	if is_blank(content) {
		return Ok(Configuration::default());
	}

	serde_yaml_ng::from_slice(content).map_err(|source| RegenError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

/// True when the document holds only whitespace and comments.
fn is_blank(content: &[u8]) -> bool {
	content.split(|b| *b == b'\n').all(|line| {
		let line = line.trim_ascii();
		line.is_empty() || line.starts_with(b"#")
	})
}
