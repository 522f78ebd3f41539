//! Participant roster with per-handle time zone offsets
//!
//! Handles are Telegram usernames normalized to lowercase. The roster
//! doubles as the access list: anyone not on it is turned away.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    offsets: BTreeMap<String, f64>,
}

impl Roster {
    /// Build a roster from configured handle-to-offset pairs
    ///
    /// Keys are lowercased so lookups are case-insensitive.
    pub fn new(offsets: BTreeMap<String, f64>) -> Self {
        let offsets = offsets
            .into_iter()
            .map(|(handle, offset)| (handle.to_lowercase(), offset))
            .collect();
        Self { offsets }
    }

    /// UTC offset in hours for a handle, 0.0 when unknown
    pub fn offset(&self, handle: &str) -> f64 {
        self.offsets
            .get(&handle.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.offsets.contains_key(&handle.to_lowercase())
    }

    /// All handles in sorted order
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.offsets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
