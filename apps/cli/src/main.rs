//! Ledger navigator entry point.

use std::process::ExitCode;

use ledger_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ledger: {}", e);
            ExitCode::FAILURE
        }
    }
}
