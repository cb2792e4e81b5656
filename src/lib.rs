//! Regen - CLI tool for patching generated source files with declarative
//! find/replace rules.
//!
//! This library provides the core functionality for regen, including:
//! - YAML configuration parsing and post-parse options
//! - Literal and regex substitution rules
//! - The replacement engine with an optional formatter step
//! - Rewriting every configured file in place
//!
//! # Example
//!
//! ```no_run
//! use regen_cli::config::with_directory;
//! use regen_cli::regenerate::run;
//!
//! let document = std::fs::read("regen.yaml").unwrap();
//! let summary = run(&document, [with_directory("internal/db")]).unwrap();
//!
//! for file in &summary.rewritten {
//!     println!("rewrote {}", file.display());
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod regenerate;
pub mod rules;

pub use error::{RegenError, Result};
