//! Configuration loading and parsing for regen.
//!
//! This module handles:
//! - YAML config document parsing
//! - Post-parse options (base directory, formatter)

pub mod options;
pub mod parser;
pub mod types;

pub use options::{ConfigOption, with_directory, with_formatter};
pub use parser::{parse_config_bytes, parse_config_file, parse_config_str};
pub use types::{Configuration, Package, RegexEntry, Replace, StringEntry};
