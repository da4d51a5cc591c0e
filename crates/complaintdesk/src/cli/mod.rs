//! Command-line interface for complaintdesk.
//!
//! This module provides the CLI structure for the `complaints` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, ExportCommand, ImportCommand, ListCommand,
    OutputFormat, ShowCommand, StatsCommand, StatusArg, StatusCommand,
};

/// complaints - Track complaints from submission to resolution
///
/// Stores every complaint as one JSON collection in a local database and
/// lets you list, filter, update, export, and import them.
#[derive(Debug, Parser)]
#[command(name = "complaints")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new complaint
    Add(AddCommand),

    /// List complaints, optionally filtered
    List(ListCommand),

    /// Show one complaint
    Show(ShowCommand),

    /// Change the status of a complaint
    Status(StatusCommand),

    /// Delete a complaint
    Delete(DeleteCommand),

    /// Export all complaints to a JSON file
    Export(ExportCommand),

    /// Replace all complaints with the contents of a JSON file
    Import(ImportCommand),

    /// Delete every complaint
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show complaint statistics
    Stats(StatsCommand),

    /// Check that the stored collection can be decoded
    Check,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "complaints");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["complaints", "-q", "check"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["complaints", "check"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["complaints", "-v", "check"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["complaints", "-vv", "check"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "complaints",
            "add",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--phone",
            "555",
            "--type",
            "billing",
            "--subject",
            "Overcharged",
            "--description",
            "Charged twice",
        ]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.kind, "billing");
        assert_eq!(add.subject, "Overcharged");
    }

    #[test]
    fn test_parse_add_requires_type() {
        let result = Cli::try_parse_from(["complaints", "add", "--name", "Ada"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = parse(&[
            "complaints", "list", "--search", "ab", "--type", "billing", "--status", "progress",
        ]);
        let Command::List(list) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(list.search.as_deref(), Some("ab"));
        assert_eq!(list.status, Some(StatusArg::Progress));
    }

    #[test]
    fn test_parse_status_aliases() {
        let cli = parse(&["complaints", "status", "CABC123", "in-progress"]);
        let Command::Status(cmd) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(cmd.status, StatusArg::Progress);
    }

    #[test]
    fn test_parse_clear() {
        let cli = parse(&["complaints", "clear", "--yes"]);
        assert!(matches!(cli.command, Command::Clear { yes: true }));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["complaints", "-c", "/custom/config.toml", "stats"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_unknown_status_fails() {
        assert!(Cli::try_parse_from(["complaints", "status", "CABC123", "closed"]).is_err());
    }
}
