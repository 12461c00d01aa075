//! # ledger-cli: Book Navigator
//!
//! Thin orchestration layer over `ledger-book`.
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Application Startup                             │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                             │
//! │  2. Load configuration                                                 │
//! │     • defaults → ledger.toml → LEDGER_* environment → validate         │
//! │  3. Initialize logging                                                 │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │  4. Create the book (--book overrides book.name)                       │
//! │  5. Run commands                                                       │
//! │     • each -c COMMAND in order, or                                     │
//! │     • lines from stdin until EOF or `quit`                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod amount;
pub mod args;
pub mod config;
pub mod error;
pub mod session;

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use ledger_book::Book;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub use args::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use session::{Outcome, Session};

/// Runs the navigator for parsed arguments.
pub fn run(cli: Cli) -> CliResult<ExitCode> {
    if cli.init_config {
        return init_config(cli);
    }

    let config_path = cli.config.clone().or_else(CliConfig::default_config_path);
    let mut config = CliConfig::load(config_path.clone())?;
    if let Some(name) = cli.book {
        config.book.name = name;
        config.validate()?;
    }

    init_tracing(&config.logging.filter);
    info!(book = %config.book.name, "Starting ledger navigator");
    debug!(path = ?config_path, ?config, "Configuration loaded");

    let mut book = Book::new();
    book.set_name(Some(&config.book.name));
    let mut session = Session::new(book, config.display.clone());

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let all_ok = if cli.commands.is_empty() {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        run_lines(
            &mut session,
            &config,
            stdin.lock().lines(),
            interactive,
            &mut out,
            &mut err,
        )?
    } else {
        run_lines(
            &mut session,
            &config,
            cli.commands.into_iter().map(Ok),
            false,
            &mut out,
            &mut err,
        )?
    };

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Feeds `lines` to the session until they run out or a `quit`.
///
/// Returns whether every command succeeded.
pub fn run_lines<I, W, E>(
    session: &mut Session,
    config: &CliConfig,
    lines: I,
    interactive: bool,
    out: &mut W,
    err: &mut E,
) -> CliResult<bool>
where
    I: IntoIterator<Item = io::Result<String>>,
    W: Write,
    E: Write,
{
    let mut all_ok = true;
    let mut lines = lines.into_iter();
    loop {
        if interactive {
            write!(out, "{} {}> ", config.shell.prompt, session.current_path())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if config.shell.echo {
            writeln!(out, "{}", line)?;
        }

        let outcome = session.execute(&line, out, err)?;
        if !outcome.is_success() {
            debug!(
                command = %line.trim(),
                at = %session.current(),
                ?outcome,
                "Command did not complete"
            );
            all_ok = false;
        }
        if outcome == Outcome::Quit {
            break;
        }
    }
    if interactive {
        writeln!(out)?;
    }
    Ok(all_ok)
}

fn init_config(cli: Cli) -> CliResult<ExitCode> {
    let path = cli
        .config
        .or_else(CliConfig::default_config_path)
        .ok_or_else(|| CliError::ConfigSaveFailed("No config path available".into()))?;
    if path.exists() {
        return Err(CliError::ConfigExists(path));
    }

    let mut config = CliConfig::default();
    if let Some(name) = cli.book {
        config.book.name = name;
    }
    let path = config.save(Some(path))?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over the configured filter. Output goes to
/// stderr so command output on stdout stays clean.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
