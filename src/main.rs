use std::io::{self, Write};

use clap::Parser;
use color_eyre::eyre;

mod config;
mod logging;
mod monitoring;
mod provision;

const CONSOLE_URL: &str = "https://console.cloud.google.com/monitoring/services";

fn report_success(mut out: impl Write) -> io::Result<()> {
	writeln!(out, "Succeeded!")?;
	writeln!(
		out,
		"Please visit and check the created service and SLO at {CONSOLE_URL}"
	)?;
	writeln!(out, "They will appear in a few minutes")
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
	color_eyre::install()?;
	logging::init();

	let cli = config::Cli::parse_from(config::normalize_flags(std::env::args()));
	let config = config::new(cli, &config::SystemDefaults)?;
	let client = monitoring::new(&config, monitoring::API_BASE_URL)?;

	provision::run(&config, &client).await?;
	report_success(io::stdout().lock())?;
	Ok(())
}
