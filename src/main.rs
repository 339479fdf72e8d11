//! Niftifix CLI - T1w NIfTI repair tool
//!
//! Command-line interface for niftifix.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use niftifix::cli::commands::{self, EXIT_FAILURE};
use niftifix::cli::prompt::TerminalConfirm;
use niftifix::cli::Cli;
use niftifix::NiftiFixError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_filter())).init();

    info!("Niftifix v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(err) = err.downcast_ref::<NiftiFixError>() {
                for suggestion in err.recovery_suggestions() {
                    eprintln!("  - {}", suggestion);
                }
                if err.may_leave_partial_output() {
                    eprintln!("Some run files may already have been written.");
                }
            }
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let copy_dir = std::env::current_dir().context("cannot determine the current directory")?;
    let options = cli.split_options(copy_dir);
    let mut confirm = TerminalConfirm::stdio();

    match commands::fix_path(&cli.path, &options, &mut confirm) {
        Ok(run) => Ok(run.exit_code()),
        Err(err @ NiftiFixError::InvalidPath { .. }) => {
            println!("{}", err);
            Ok(EXIT_FAILURE)
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to fix {}", cli.path.display()))
        }
    }
}
