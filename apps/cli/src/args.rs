//! CLI argument definitions using clap
//!
//! Usage:
//! - ledger                                  (interactive, reads stdin)
//! - ledger -c "new ledger Main" -c "list"   (runs commands and exits)
//! - ledger --init-config                    (writes a default ledger.toml)

use clap::Parser;
use std::path::PathBuf;

/// Navigator for ledger books: ledgers, accounts, journals and entries
#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to the platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Name of the book to start with (overrides book.name)
    #[arg(long)]
    pub book: Option<String>,

    /// Run a navigator command; repeat for several, in order
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Write a default config file and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_commands_keep_order() {
        let cli = Cli::try_parse_from([
            "ledger",
            "--book",
            "household",
            "-c",
            "new ledger Main",
            "--command",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.book.as_deref(), Some("household"));
        assert_eq!(cli.commands, vec!["new ledger Main", "list"]);
        assert!(!cli.init_config);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_init_config_flag() {
        let cli = Cli::try_parse_from(["ledger", "--init-config", "--config", "/tmp/l.toml"]).unwrap();
        assert!(cli.init_config);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/l.toml")));
    }
}
