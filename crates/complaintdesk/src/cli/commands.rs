//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::complaint::{ComplaintFilter, ComplaintStatus, NewComplaint};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Submitter name
    #[arg(long)]
    pub name: String,

    /// Submitter email
    #[arg(long)]
    pub email: String,

    /// Submitter phone
    #[arg(long)]
    pub phone: String,

    /// Complaint category, e.g. billing or technical
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: String,

    /// One-line summary
    #[arg(long)]
    pub subject: String,

    /// Full description
    #[arg(long)]
    pub description: String,
}

impl From<AddCommand> for NewComplaint {
    fn from(cmd: AddCommand) -> Self {
        Self {
            name: cmd.name,
            email: cmd.email,
            phone: cmd.phone,
            kind: cmd.kind,
            subject: cmd.subject,
            description: cmd.description,
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only ids containing this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this complaint type
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Only this status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// The store filter these arguments describe.
    #[must_use]
    pub fn filter(&self) -> ComplaintFilter {
        ComplaintFilter {
            id_contains: self.search.clone(),
            kind: self.kind.clone(),
            status: self.status.map(Into::into),
        }
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Complaint id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Complaint id
    pub id: String,

    /// New status
    #[arg(value_enum)]
    pub status: StatusArg,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Complaint id
    pub id: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Directory to write the export file to (overrides configuration)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file holding an array of complaints
    pub file: PathBuf,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Complaint status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Submitted, not yet picked up
    Registered,
    /// Being worked on
    #[value(aliases = ["in-progress", "in_progress"])]
    Progress,
    /// Closed out
    Resolved,
}

impl From<StatusArg> for ComplaintStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Registered => Self::Registered,
            StatusArg::Progress => Self::Progress,
            StatusArg::Resolved => Self::Resolved,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per complaint
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_arg_conversion() {
        assert_eq!(
            ComplaintStatus::from(StatusArg::Registered),
            ComplaintStatus::Registered
        );
        assert_eq!(
            ComplaintStatus::from(StatusArg::Progress),
            ComplaintStatus::Progress
        );
        assert_eq!(
            ComplaintStatus::from(StatusArg::Resolved),
            ComplaintStatus::Resolved
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_add_command_into_submission() {
        let cmd = AddCommand {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            kind: "billing".to_string(),
            subject: "Overcharged".to_string(),
            description: "Charged twice".to_string(),
        };
        let submission = NewComplaint::from(cmd);
        assert_eq!(submission.kind, "billing");
        assert_eq!(submission.email, "ada@example.com");
    }

    #[test]
    fn test_list_command_filter() {
        let cmd = ListCommand {
            search: Some("ab".to_string()),
            kind: None,
            status: Some(StatusArg::Resolved),
            format: OutputFormat::Json,
        };
        let filter = cmd.filter();
        assert_eq!(filter.id_contains.as_deref(), Some("ab"));
        assert!(filter.kind.is_none());
        assert_eq!(filter.status, Some(ComplaintStatus::Resolved));
    }

    #[test]
    fn test_list_command_no_filter() {
        let cmd = ListCommand {
            search: None,
            kind: None,
            status: None,
            format: OutputFormat::Plain,
        };
        assert!(cmd.filter().is_empty());
    }
}
