//! Main entry point for the freezePIX checkout.
//!
//! This binary loads a storefront configuration, opens a checkout session
//! and drives it from a line-oriented command script read from a file or
//! standard input, printing the rendered wizard after every command.

use clap::Parser;
use print_config::Config;
use print_core::CheckoutBuilder;
use std::path::PathBuf;
use tokio::io::BufReader;

mod commands;
mod render;
mod runner;

use runner::ScriptRunner;

/// Command-line arguments for the checkout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file; the reference storefront is used if omitted
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Command script to run; read from stdin if omitted
	#[arg(short, long)]
	script: Option<PathBuf>,
}

/// Main entry point for the checkout.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the checkout session and submission backend
/// 5. Runs the command script to the end
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// Views go to stdout, logs to stderr.
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = match &args.config {
		Some(path) => {
			let path = path
				.to_str()
				.ok_or_else(|| format!("Configuration path is not valid UTF-8: {}", path.display()))?;
			Config::from_file(path).await?
		},
		None => {
			tracing::info!("No configuration given, using the reference storefront");
			Config::reference()?
		},
	};

	let checkout = CheckoutBuilder::new(config).build()?;
	let mut runner = ScriptRunner::new(checkout);
	let mut stdout = tokio::io::stdout();

	let failures = match &args.script {
		Some(path) => {
			let file = tokio::fs::File::open(path).await?;
			runner.run(BufReader::new(file), &mut stdout).await?
		},
		None => runner.run(BufReader::new(tokio::io::stdin()), &mut stdout).await?,
	};

	if failures > 0 {
		tracing::warn!(failures, "Some commands were rejected");
	}
	tracing::info!(
		placed = runner.checkout().session.receipt().is_some(),
		"Checkout finished"
	);
	Ok(())
}
