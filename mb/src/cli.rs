use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mb")]
#[command(about = "Group coordination bot for sessions and timed challenges", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the bot and poll for updates
    Run,

    /// Print the effective configuration
    Config,

    /// Preview upcoming days and slot times for a roster member
    Slots {
        /// Roster handle to localize for
        handle: Option<String>,
    },
}

/// Returns the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("muster")
        .join("logs")
        .join("muster.log")
}
