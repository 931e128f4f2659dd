// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, run one command.
// - Every failure ends up here and exits with status 1.

use clap::Parser;
use crossterm::style::Stylize;
use hostgo::cli::{self, Cli};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warnings only, or debug with -v.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cli.verbose {
                EnvFilter::new("warn,hostgo=debug")
            } else {
                EnvFilter::new("warn")
            }
        }))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
