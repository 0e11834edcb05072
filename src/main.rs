mod agents;
mod cli;
mod config;
mod error;
mod package;
mod pip;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::Settings;
use pip::SystemRunner;
use std::process;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("PIPUP_LOG", default_level)
            .write_style("PIPUP_LOG_STYLE"),
    )
    .init();

    let result = Settings::from_cli(&cli)
        .and_then(|settings| workflow::execute_update(&settings, &SystemRunner));

    match result {
        Ok(outcome) => log::debug!("Run finished: {}", outcome.summary()),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
