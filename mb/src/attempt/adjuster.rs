//! Slider state for result entry
//!
//! One pending value per (chat, user) pair: a user re-running /record
//! in the same chat resumes with a fresh slider, and taps on an old
//! slider message still drive the same pending value.

use std::collections::HashMap;

/// Identifies one user's pending entry in one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl EntryKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    Changed(i64),
    /// Clamped at the floor; the surface does not need a re-render
    Unchanged(i64),
}

/// Pending slider values, clamped to a floor
#[derive(Debug)]
pub struct EntryBoard {
    entries: HashMap<EntryKey, i64>,
    floor: i64,
    initial: i64,
}

impl EntryBoard {
    pub fn new(floor: i64, initial: i64) -> Self {
        Self {
            entries: HashMap::new(),
            floor,
            initial,
        }
    }

    /// Opens (or resets) the entry for a key, returning the start value
    pub fn start(&mut self, key: EntryKey) -> i64 {
        self.entries.insert(key, self.initial);
        self.initial
    }

    /// Applies a delta; `None` means no entry is open for this key
    pub fn adjust(&mut self, key: EntryKey, delta: i64) -> Option<AdjustOutcome> {
        let current = self.entries.get_mut(&key)?;
        let next = (*current + delta).max(self.floor);
        if next == *current {
            return Some(AdjustOutcome::Unchanged(next));
        }
        *current = next;
        Some(AdjustOutcome::Changed(next))
    }

    pub fn current(&self, key: EntryKey) -> Option<i64> {
        self.entries.get(&key).copied()
    }

    /// Removes and returns the pending value
    pub fn take(&mut self, key: EntryKey) -> Option<i64> {
        self.entries.remove(&key)
    }

    pub fn initial(&self) -> i64 {
        self.initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> EntryKey {
        EntryKey::new(-100, 42)
    }

    #[test]
    fn test_start_returns_initial() {
        let mut board = EntryBoard::new(10, 60);
        assert_eq!(board.start(key()), 60);
        assert_eq!(board.current(key()), Some(60));
    }

    #[test]
    fn test_adjust_applies_delta() {
        let mut board = EntryBoard::new(10, 60);
        board.start(key());
        assert_eq!(board.adjust(key(), -5), Some(AdjustOutcome::Changed(55)));
        assert_eq!(board.adjust(key(), 10), Some(AdjustOutcome::Changed(65)));
        assert_eq!(board.current(key()), Some(65));
    }

    #[test]
    fn test_adjust_clamps_at_floor() {
        let mut board = EntryBoard::new(10, 12);
        board.start(key());
        assert_eq!(board.adjust(key(), -5), Some(AdjustOutcome::Changed(10)));
    }

    #[test]
    fn test_adjust_at_floor_is_unchanged() {
        let mut board = EntryBoard::new(10, 10);
        board.start(key());
        assert_eq!(board.adjust(key(), -5), Some(AdjustOutcome::Unchanged(10)));
        assert_eq!(board.current(key()), Some(10));
    }

    #[test]
    fn test_adjust_without_entry_is_stale() {
        let mut board = EntryBoard::new(10, 60);
        assert_eq!(board.adjust(key(), -5), None);
    }

    #[test]
    fn test_take_removes_entry() {
        let mut board = EntryBoard::new(10, 60);
        board.start(key());
        assert_eq!(board.take(key()), Some(60));
        assert_eq!(board.current(key()), None);
        assert_eq!(board.take(key()), None);
    }

    #[test]
    fn test_restart_resets_value() {
        let mut board = EntryBoard::new(10, 60);
        board.start(key());
        board.adjust(key(), 30);
        assert_eq!(board.start(key()), 60);
        assert_eq!(board.current(key()), Some(60));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut board = EntryBoard::new(10, 60);
        let other = EntryKey::new(-100, 43);
        board.start(key());
        board.start(other);
        board.adjust(key(), 15);
        assert_eq!(board.current(key()), Some(75));
        assert_eq!(board.current(other), Some(60));
    }
}
