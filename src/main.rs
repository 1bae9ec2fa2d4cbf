mod cli;
mod config;
mod docker;
mod error;
mod supervisor;
mod utils;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = utils::logger::init(cli.verbose) {
        eprintln!("failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    supervisor::run(|token| cli.execute(token)).await
}
