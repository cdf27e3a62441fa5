//! CLI argument parsing for the findajob-admin binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "findajob-admin", about = "FindAJob Nigeria admin backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Import job centres from a local CSV file
    Import {
        /// Path to the CSV file
        path: PathBuf,
        /// Skip rows whose (name, state) already exists
        #[arg(long)]
        skip_duplicates: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_migrate_command_parses() {
        let cli = Cli::parse_from(["findajob-admin", "migrate"]);
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["findajob-admin"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_import_command_parses() {
        let cli = Cli::parse_from(["findajob-admin", "import", "centres.csv", "--skip-duplicates"]);
        match cli.command {
            Some(Command::Import { path, skip_duplicates }) => {
                assert_eq!(path, PathBuf::from("centres.csv"));
                assert!(skip_duplicates);
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_cli_import_requires_path() {
        assert!(Cli::try_parse_from(["findajob-admin", "import"]).is_err());
    }
}
