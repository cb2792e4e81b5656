//! Post-substitution formatting for regen.
//!
//! This module handles:
//! - The [`Formatter`] capability the engine calls after all rules ran
//! - Piping content through an external formatter process

use crate::error::{RegenError, Result};
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// A byte-to-byte reformatting step run after all substitutions.
pub trait Formatter: fmt::Debug {
	/// Reformat `input`, returning the new content.
	fn format(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// How to invoke an external formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOptions {
	/// Program to run, resolved through PATH.
	pub program: String,

	/// Arguments passed to the program.
	pub args: Vec<String>,
}

impl FormatterOptions {
	pub fn new(program: impl Into<String>) -> Self {
		FormatterOptions {
			program: program.into(),
			args: Vec::new(),
		}
	}

	pub fn arg(mut self, arg: impl Into<String>) -> Self {
		self.args.push(arg.into());
		self
	}
}

/// Formatter that feeds content to a program's stdin and takes its stdout.
///
/// Works with any filter-style formatter such as `gofmt`, `goimports` or
/// `rustfmt --emit stdout`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
	options: FormatterOptions,
}

impl CommandFormatter {
	pub fn new(options: FormatterOptions) -> Self {
		CommandFormatter { options }
	}
}

impl Formatter for CommandFormatter {
	fn format(&self, input: &[u8]) -> Result<Vec<u8>> {
		let program = &self.options.program;
		let spawn_error = |source: std::io::Error| RegenError::FormatterSpawn {
			program: program.clone(),
			source,
		};

		let mut child = Command::new(program)
			.args(&self.options.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(spawn_error)?;

		// stdin is written from a second thread so a formatter that streams
		// output before reading all input cannot fill the stdout pipe and stall
		let stdin = child.stdin.take();
		let (output, written) = thread::scope(|scope| {
			let writer = stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(input)));
			let output = child.wait_with_output();
			let written = match writer {
				Some(handle) => handle
					.join()
					.unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked"))),
				None => Ok(()),
			};
			(output, written)
		});

		let output = output.map_err(spawn_error)?;

		if !output.status.success() {
			return Err(RegenError::FormatterFailed {
				program: program.clone(),
				exit_code: output.status.code().unwrap_or(-1),
				stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
			});
		}

		written.map_err(|source| RegenError::FormatterInput {
			program: program.clone(),
			source,
		})?;

		tracing::debug!(
			program = %program,
			input_bytes = input.len(),
			output_bytes = output.stdout.len(),
			"formatter finished"
		);

		Ok(output.stdout)
	}
}
