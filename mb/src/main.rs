//! Muster - group session scheduling and result tracking over chat
//!
//! CLI entry point for running the bot and inspecting its setup.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use tracing::{info, warn};

use muster::attempt::{EntryFlow, StatsView};
use muster::chat::{ChatApi, TelegramApi};
use muster::cli::{Cli, Command};
use muster::config::Config;
use muster::dispatch::{AccessGate, Router};
use muster::ledger::LedgerManager;
use muster::localtime;
use muster::remark::RemarkPicker;
use muster::roster::Roster;
use muster::session::{SessionPlanner, SlotCatalog};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("muster")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("muster.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Muster loaded config: roster={} members, slots={}",
        config.roster.len(),
        config.session.slots_utc.len()
    );

    match cli.command {
        Some(Command::Run) => cmd_run(&config).await,
        Some(Command::Config) => cmd_config(&config),
        Some(Command::Slots { handle }) => cmd_slots(&config, handle.as_deref()),
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}

/// Preview the day window and localized slot times
fn cmd_slots(config: &Config, handle: Option<&str>) -> Result<()> {
    let catalog = SlotCatalog::from_config(&config.session)?;
    let roster = Roster::new(config.roster.clone());

    let offset = handle.map(|h| roster.offset(h)).unwrap_or(0.0);
    let label = handle.unwrap_or("UTC");
    let today = localtime::local_today(offset);

    println!("Upcoming days for {} (offset {:+.1}h):", label, offset);
    for day in catalog.day_window(today) {
        let slots = catalog.slot_labels(day, offset);
        println!("  {}  {}", day.format("%a %d.%m"), slots.join("  "));
    }

    Ok(())
}

/// Run the bot until a signal or /shutdown arrives
async fn cmd_run(config: &Config) -> Result<()> {
    // ============================================================
    // EARLY VALIDATION - Fail fast with clear error messages
    // ============================================================

    config.validate().context("Invalid configuration")?;
    info!("Startup validation passed");

    // ============================================================
    // INITIALIZATION
    // ============================================================

    let chat: Arc<dyn ChatApi> =
        Arc::new(TelegramApi::from_config(&config.telegram).context("Failed to create chat client")?);
    info!("Chat client initialized");

    if let Some(parent) = config.ledger.path.parent() {
        fs::create_dir_all(parent).context("Failed to create ledger directory")?;
    }
    let ledger = LedgerManager::spawn(&config.ledger.path)?;

    let roster = Roster::new(config.roster.clone());
    let catalog = SlotCatalog::from_config(&config.session)?;
    info!("Roster loaded ({} members)", roster.len());

    let planner = SessionPlanner::new(
        chat.clone(),
        roster.clone(),
        catalog,
        config.session.min_participants,
        config.remarks.celebration.clone(),
        RemarkPicker::new(),
    );
    let entry = EntryFlow::new(
        chat.clone(),
        roster.clone(),
        ledger.clone(),
        &config.attempt,
        config.remarks.motivation.clone(),
        RemarkPicker::new(),
    );
    let stats = StatsView::new(chat.clone(), roster.clone(), ledger.clone());
    let gate = AccessGate::new(roster);

    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    let router = Router::new(
        chat,
        gate,
        planner,
        entry,
        stats,
        config.admin.clone(),
        config.telegram.poll_timeout_secs,
        shutdown_tx.clone(),
    );

    router
        .register_commands()
        .await
        .context("Failed to register command menu")?;

    let mut router_handle = tokio::spawn(async move {
        if let Err(e) = router.run(shutdown_rx).await {
            tracing::error!(error = %e, "Router error");
        }
    });

    info!("Bot running. Press Ctrl+C to stop.");

    // Set up signal handlers
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                warn!("SIGINT received");
                let _ = shutdown_tx.send(()).await;
            }
            _ = sigterm.recv() => {
                warn!("SIGTERM received");
                let _ = shutdown_tx.send(()).await;
            }
            _ = &mut router_handle => {
                info!("Router stopped");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                warn!("Ctrl+C received");
                let _ = shutdown_tx.send(()).await;
            }
            _ = &mut router_handle => {
                info!("Router stopped");
            }
        }
    }

    info!("Bot shutting down...");

    // Wait for the router to drain its current update batch
    if !router_handle.is_finished() {
        let _ = router_handle.await;
    }

    let _ = ledger.shutdown().await;

    Ok(())
}
