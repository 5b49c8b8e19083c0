//! Playlog CLI - loads song catalogs and listening logs into DuckDB

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::common::ExitCode;
use commands::{counts, load, reset};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "info" } else { "warn" };
    if let Err(err) = logging::init_tracing(default_filter) {
        eprintln!("Error: {err:#}");
        return std::process::ExitCode::FAILURE;
    }

    match dispatch(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Load(args) => load::execute(args, &cli.global),
        cli::Commands::Reset(args) => reset::execute(args, &cli.global),
        cli::Commands::Counts(args) => counts::execute(args, &cli.global),
    }
}
