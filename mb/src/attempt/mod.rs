//! Timed-attempt features: entry slider, result cards, statistics

pub mod adjuster;
pub mod entry;
pub mod stats;

pub use adjuster::{AdjustOutcome, EntryBoard, EntryKey};
pub use entry::EntryFlow;
pub use stats::StatsView;
