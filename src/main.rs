//! Harvest storefront CLI

use std::{io, process::ExitCode};

use clap::Parser;
use harvest::{cli::Cli, observability};

#[expect(clippy::print_stderr, reason = "Errors are reported to the terminal")]
fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.run(&mut handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
