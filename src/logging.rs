use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise verbosity picks the level:
/// warnings only by default, `-v` for info, `-vv` for debug.
pub fn init_logging(verbosity: u8) -> Result<()> {
	let default_level = match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.without_time()
		.try_init()
		.map_err(|e| anyhow::anyhow!(e))?;

	Ok(())
}
