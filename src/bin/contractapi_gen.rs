use std::process::ExitCode;

use clap::Parser;
use contractapi::cli::{exit_code_for, run_cli, Cli};
use contractapi::logging::{init_logging, LogConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LogConfig::from_env()) {
        eprintln!("Warning: {err:#}");
    }

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
