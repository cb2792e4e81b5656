//! Running a configuration against the files it names.
//!
//! Entries whose file is missing are skipped. Every other rule set is
//! compiled up front, so an invalid pattern aborts the run before the first
//! file is touched. Files are then processed one at a time in declaration
//! order.

use crate::config::{ConfigOption, Configuration, parse_config_bytes};
use crate::error::{RegenError, Result};
use crate::format::Formatter;
use crate::rules::{RuleSet, rewrite};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A regenerate entry with its path resolved and its rules compiled.
#[derive(Debug)]
pub struct PlannedFile {
	/// Path as declared in the configuration.
	pub declared: PathBuf,

	/// Path after joining the base directory.
	pub path: PathBuf,

	pub rules: RuleSet,
}

/// What happened to each file during a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
	/// Files whose content changed.
	pub rewritten: Vec<PathBuf>,

	/// Files written back with identical content.
	pub unchanged: Vec<PathBuf>,

	/// Files that did not exist and were skipped.
	pub skipped: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
	Rewritten,
	Unchanged,
	Missing,
}

/// Parse a configuration document, apply options in order, and run it.
pub fn run<I>(document: &[u8], options: I) -> Result<RunSummary>
where
	I: IntoIterator<Item = ConfigOption>,
{
	let mut config = parse_config_bytes(document, Path::new("<input>"))?;
	config.apply(options);
	run_config(&config)
}

/// Run an already-built configuration.
pub fn run_config(config: &Configuration) -> Result<RunSummary> {
	let steps = plan_run(config)?;
	let formatter = config.formatter();
	let mut summary = RunSummary::default();

	for step in &steps {
		let planned = match step {
			Step::Skip { declared, path } => {
				warn_missing(declared);
				summary.skipped.push(path.clone());
				continue;
			}
			Step::Rewrite(planned) => planned,
		};

		match regenerate_file(planned, formatter)? {
			FileOutcome::Rewritten => summary.rewritten.push(planned.path.clone()),
			FileOutcome::Unchanged => summary.unchanged.push(planned.path.clone()),
			FileOutcome::Missing => summary.skipped.push(planned.path.clone()),
		}
	}

	tracing::info!(
		rewritten = summary.rewritten.len(),
		unchanged = summary.unchanged.len(),
		skipped = summary.skipped.len(),
		"regeneration finished"
	);

	Ok(summary)
}

/// Resolve every file path and compile every rule set without touching the
/// filesystem.
pub fn plan(config: &Configuration) -> Result<Vec<PlannedFile>> {
	config
		.replaces()
		.map(|replace| {
			let path = config.resolve(&replace.file);
			let rules = RuleSet::compile(replace, &path)?;
			Ok(PlannedFile {
				declared: replace.file.clone(),
				path,
				rules,
			})
		})
		.collect()
}

#[derive(Debug)]
enum Step {
	Skip { declared: PathBuf, path: PathBuf },
	Rewrite(PlannedFile),
}

/// Like [`plan`], but entries whose file does not exist are marked for
/// skipping and their rules are never compiled.
fn plan_run(config: &Configuration) -> Result<Vec<Step>> {
	config
		.replaces()
		.map(|replace| {
			let path = config.resolve(&replace.file);
			// an unreadable path is left to the open in regenerate_file
			if let Ok(false) = path.try_exists() {
				return Ok(Step::Skip {
					declared: replace.file.clone(),
					path,
				});
			}

			let rules = RuleSet::compile(replace, &path)?;
			Ok(Step::Rewrite(PlannedFile {
				declared: replace.file.clone(),
				path,
				rules,
			}))
		})
		.collect()
}

fn warn_missing(declared: &Path) {
	tracing::warn!("File {:?} does not exist, skipping", declared);
}

fn regenerate_file(planned: &PlannedFile, formatter: Option<&dyn Formatter>) -> Result<FileOutcome> {
	let path = &planned.path;

	let mut file = match OpenOptions::new().read(true).write(true).open(path) {
		Ok(file) => file,
		Err(err) if err.kind() == ErrorKind::NotFound => {
			warn_missing(&planned.declared);
			return Ok(FileOutcome::Missing);
		}
		Err(source) => {
			return Err(RegenError::FileOpenError {
				path: path.clone(),
				source,
			});
		}
	};

	let mut content = Vec::new();
	file.read_to_end(&mut content)
		.map_err(|source| RegenError::FileReadError {
			path: path.clone(),
			source,
		})?;

	let output = rewrite(&content, &planned.rules, formatter).map_err(|source| {
		RegenError::Regenerate {
			file: path.clone(),
			source: Box::new(source),
		}
	})?;

	write_in_place(&mut file, &output).map_err(|source| RegenError::FileWriteError {
		path: path.clone(),
		source,
	})?;

	if output == content {
		tracing::debug!(file = %path.display(), "content unchanged");
		Ok(FileOutcome::Unchanged)
	} else {
		tracing::info!(file = %path.display(), rules = planned.rules.len(), "rewrote file");
		Ok(FileOutcome::Rewritten)
	}
}

/// Replace the whole content of an open file.
fn write_in_place(file: &mut File, content: &[u8]) -> std::io::Result<()> {
	file.seek(SeekFrom::Start(0))?;
	file.write_all(content)?;
	file.set_len(content.len() as u64)?;
	file.flush()
}
