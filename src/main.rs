use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use regen_cli::config::{Configuration, parse_config_file, with_directory, with_formatter};
use regen_cli::format::{CommandFormatter, FormatterOptions};
use regen_cli::regenerate::{plan, run_config};

mod logging;

const DEFAULT_CONFIG: &str = "regen.yaml";

#[derive(Parser)]
#[command(name = "regen")]
#[command(
	author,
	version,
	about = "CLI tool for patching generated source files with declarative find/replace rules"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Configuration file listing files and their rules
	#[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG, global = true)]
	config: PathBuf,

	/// Base directory for file paths (defaults to the config file's directory)
	#[arg(short = 'C', long, value_name = "DIR", global = true)]
	dir: Option<PathBuf>,

	/// Formatter program to pipe each rewritten file through (e.g. gofmt)
	#[arg(long, value_name = "PROGRAM")]
	format_cmd: Option<String>,

	/// Argument passed to the formatter program (repeatable)
	#[arg(
		long,
		value_name = "ARG",
		requires = "format_cmd",
		allow_hyphen_values = true
	)]
	format_arg: Vec<String>,

	/// Create a template regen.yaml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing regen.yaml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the parsed configuration
	Show,
	/// Check the configuration and compile every pattern without touching files
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	logging::init_logging(cli.verbose).context("Failed to initialize logging")?;

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(command) = &cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&cli),
				ConfigAction::Validate => handle_config_validate(&cli),
			},
		};
	}

	handle_regenerate(&cli)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(DEFAULT_CONFIG);

	if config_path.exists() && !force {
		anyhow::bail!("{DEFAULT_CONFIG} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {DEFAULT_CONFIG}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(cli: &Cli) -> Result<ExitCode> {
	let config = load_config(cli)?;

	println!("# Source: {}", cli.config.display());
	if let Some(dir) = config.directory() {
		println!("# directory: {}", dir.display());
	}
	println!("# packages: {}", config.packages.len());
	println!();

	for (i, package) in config.packages.iter().enumerate() {
		println!("Package {}:", i + 1);
		for replace in &package.regenerates {
			println!("  file: {}", replace.file.display());
			for entry in &replace.strings {
				println!("    string: {:?} -> {:?}", entry.pattern, entry.replacement);
			}
			for entry in &replace.regexps {
				println!("    regexp: {:?} -> {:?}", entry.pattern, entry.replacement);
			}
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(cli: &Cli) -> Result<ExitCode> {
	let checked = load_config(cli).and_then(|config| {
		let planned = plan(&config).context("Invalid rule")?;
		Ok((config.packages.len(), planned.len()))
	});

	match checked {
		Ok((packages, files)) => {
			println!(
				"Configuration is valid: {} ({} packages, {} files)",
				cli.config.display(),
				packages,
				files
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e:#}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_regenerate(cli: &Cli) -> Result<ExitCode> {
	let mut config = load_config(cli)?;

	if let Some(ref program) = cli.format_cmd {
		let options = FormatterOptions {
			program: program.clone(),
			args: cli.format_arg.clone(),
		};
		config.apply([with_formatter(CommandFormatter::new(options))]);
	}

	let summary = run_config(&config).context("Failed to regenerate files")?;

	for file in &summary.rewritten {
		println!("rewrote {}", file.display());
	}
	for file in &summary.unchanged {
		println!("unchanged {}", file.display());
	}

	Ok(ExitCode::SUCCESS)
}

/// Parse the config file and attach the base directory.
fn load_config(cli: &Cli) -> Result<Configuration> {
	let mut config = parse_config_file(&cli.config)
		.with_context(|| format!("Failed to load configuration: {}", cli.config.display()))?;

	if let Some(dir) = base_directory(cli) {
		config.apply([with_directory(dir)]);
	}

	Ok(config)
}

/// `--dir` if given, otherwise the directory holding the config file.
fn base_directory(cli: &Cli) -> Option<PathBuf> {
	if let Some(ref dir) = cli.dir {
		return Some(dir.clone());
	}

	cli.config
		.parent()
		.filter(|parent| *parent != Path::new(""))
		.map(Path::to_path_buf)
}

fn init_template() -> &'static str {
	r#"# regen configuration
#
# Each regenerate entry names a file (relative to this file's directory, or
# to --dir) and the rules applied to it. All `strings` rules run first, in
# order, then all `regexps` rules. Regex replacements may use $1 or ${name}.
packages:
  - regenerates:
      - file: internal/db/query.sql.go
        strings:
          - match: "// TODO"
            replacement: "// DONE"
        regexps:
          - match: 'func \(q \*Queries\) (\w+)\('
            replacement: 'func (q *Queries) Do$1('
"#
}
