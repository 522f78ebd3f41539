//! al - command line interface to the attempt ledger

use chrono::{NaiveDate, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;

use attemptledger::cli::{Cli, Command};
use attemptledger::{Config, DEFAULT_RECENT_DAYS, DEFAULT_STATS_DAYS, Ledger};

fn setup_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let today = Utc::now().date_naive();

    match cli.command {
        Command::Stats { handle, days } => {
            let days = days.unwrap_or(DEFAULT_STATS_DAYS);
            let ledger = Ledger::open(&config.db_path)?;
            let stats = ledger.window_stats(&handle, days, today)?;
            info!("Queried stats for {} over {} days", handle, days);
            println!("{} (last {} days)", handle.cyan().bold(), days);
            println!("  Attempts: {}", stats.count);
            println!("  Total:    {}s", stats.total);
            println!("  Average:  {}s", stats.average);
            println!("  Best:     {}s", stats.max);
        }
        Command::Recent { handle, days } => {
            let days = days.unwrap_or(DEFAULT_RECENT_DAYS);
            let ledger = Ledger::open(&config.db_path)?;
            let rows = ledger.recent(&handle, days, today)?;
            if rows.is_empty() {
                println!("No attempts in the last {} days", days);
            } else {
                for row in rows {
                    println!(
                        "{}  {}  {}s",
                        row.date.to_string().dimmed(),
                        format!("#{}", row.id).yellow(),
                        row.seconds
                    );
                }
            }
        }
        Command::Append { handle, seconds, date } => {
            if seconds < 0 {
                bail!("Seconds must be non-negative");
            }
            let date = match date {
                Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date: {}", text))?,
                None => today,
            };
            let ledger = Ledger::open(&config.db_path)?;
            let id = ledger.append(&handle, seconds, date)?;
            println!(
                "{} Appended attempt {} for {}",
                "✓".green(),
                id.to_string().cyan(),
                handle
            );
        }
        Command::Delete { id } => {
            let ledger = Ledger::open(&config.db_path)?;
            if ledger.delete(id)? {
                println!("{} Deleted attempt {}", "✓".green(), id);
            } else {
                println!("{} No attempt with id {}", "✗".red(), id);
            }
        }
    }

    Ok(())
}
