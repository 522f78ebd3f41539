//! CLI argument parsing for the al binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "al")]
#[command(author, version, about = "Inspect and edit the attempt ledger", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show aggregate stats for a handle
    Stats {
        /// Handle whose attempts to summarize
        #[arg(required = true)]
        handle: String,

        /// Trailing window in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// List recent attempts, newest first
    Recent {
        /// Handle whose attempts to list
        #[arg(required = true)]
        handle: String,

        /// Trailing window in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Record one attempt
    Append {
        /// Handle the attempt belongs to
        #[arg(required = true)]
        handle: String,

        /// Duration in seconds
        #[arg(required = true)]
        seconds: i64,

        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short = 'D', long)]
        date: Option<String>,
    },

    /// Delete an attempt by id
    Delete {
        /// Row id to remove
        #[arg(required = true)]
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats_defaults() {
        let cli = Cli::parse_from(["al", "stats", "alice"]);
        match cli.command {
            Command::Stats { handle, days } => {
                assert_eq!(handle, "alice");
                assert_eq!(days, None);
            }
            _ => panic!("Expected Stats command"),
        }
    }

    #[test]
    fn test_parse_recent_with_days() {
        let cli = Cli::parse_from(["al", "recent", "bob", "--days", "14"]);
        match cli.command {
            Command::Recent { handle, days } => {
                assert_eq!(handle, "bob");
                assert_eq!(days, Some(14));
            }
            _ => panic!("Expected Recent command"),
        }
    }

    #[test]
    fn test_parse_append_with_date() {
        let cli = Cli::parse_from(["al", "append", "alice", "90", "--date", "2025-10-15"]);
        match cli.command {
            Command::Append { handle, seconds, date } => {
                assert_eq!(handle, "alice");
                assert_eq!(seconds, 90);
                assert_eq!(date.as_deref(), Some("2025-10-15"));
            }
            _ => panic!("Expected Append command"),
        }
    }

    #[test]
    fn test_parse_delete() {
        let cli = Cli::parse_from(["al", "delete", "42"]);
        match cli.command {
            Command::Delete { id } => assert_eq!(id, 42),
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_parse_config_flag() {
        let cli = Cli::parse_from(["al", "--config", "/tmp/ledger.yml", "stats", "alice"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ledger.yml")));
    }
}
