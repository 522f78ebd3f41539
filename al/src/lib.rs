//! attemptledger - SQLite-backed ledger of timed exercise attempts
//!
//! Each row records one confirmed attempt: who did it, how many seconds
//! it lasted, and the calendar date it belongs to. Aggregates are
//! computed over trailing day windows so callers can show weekly and
//! monthly progress.

pub mod cli;
pub mod config;
pub mod store;

pub use config::Config;
pub use store::{AttemptRow, Ledger, WindowStats};

/// Default lookback window for aggregate stats (days)
pub const DEFAULT_STATS_DAYS: u32 = 7;

/// Default lookback window for attempt listings (days)
pub const DEFAULT_RECENT_DAYS: u32 = 30;
