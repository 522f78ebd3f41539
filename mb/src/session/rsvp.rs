//! Attendance tracking for proposed sessions
//!
//! Votes are keyed by the planning message they belong to, so several
//! proposals can run in parallel without mixing rosters.

use std::collections::{BTreeSet, HashMap};

use crate::chat::types::SurfaceKey;

/// Attendance vote carried by a button tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpChoice {
    Attending,
    Declined,
}

/// Result of recording a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpOutcome {
    Recorded,
    /// Same handle, same side: nothing changed
    AlreadyRecorded,
}

/// Both vote sets for one planning message
///
/// BTreeSet keeps the rendered lists in stable sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpSnapshot {
    pub attending: BTreeSet<String>,
    pub declined: BTreeSet<String>,
}

/// Votes across all live planning surfaces
#[derive(Debug, Default)]
pub struct RsvpBoard {
    entries: HashMap<SurfaceKey, RsvpSnapshot>,
}

impl RsvpBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote; casting the opposite vote moves the handle over
    pub fn record(&mut self, key: SurfaceKey, handle: &str, choice: RsvpChoice) -> RsvpOutcome {
        let entry = self.entries.entry(key).or_default();
        match choice {
            RsvpChoice::Attending => {
                if entry.attending.contains(handle) {
                    return RsvpOutcome::AlreadyRecorded;
                }
                entry.declined.remove(handle);
                entry.attending.insert(handle.to_string());
            }
            RsvpChoice::Declined => {
                if entry.declined.contains(handle) {
                    return RsvpOutcome::AlreadyRecorded;
                }
                entry.attending.remove(handle);
                entry.declined.insert(handle.to_string());
            }
        }
        RsvpOutcome::Recorded
    }

    /// Current votes for one surface (empty snapshot if none yet)
    pub fn snapshot(&self, key: SurfaceKey) -> RsvpSnapshot {
        self.entries.get(&key).cloned().unwrap_or_default()
    }

    /// Drop all votes for a surface
    pub fn discard(&mut self, key: SurfaceKey) {
        self.entries.remove(&key);
    }
}
