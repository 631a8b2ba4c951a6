#![forbid(unsafe_code)]

//! Past/future snapshot stacks.
//!
//! [`SnapshotStore`] holds the snapshots that undo and redo move between.
//! It never holds the live state: the caller swaps its current value in and
//! out on every step, so each snapshot is an owned value that nothing else
//! can reach.
//!
//! # Architecture
//!
//! ```text
//! commit(s0), commit(s1), commit(s2)      current = s3
//! ┌──────────────────────────────────────────────────┐
//! │ Past:    [s0, s1, s2]                             │
//! │ Future:  []                                       │
//! └──────────────────────────────────────────────────┘
//!
//! undo(s3) x2                             current = s1
//! ┌──────────────────────────────────────────────────┐
//! │ Past:    [s0]                                     │
//! │ Future:  [s2, s3]   (front = next redo)           │
//! └──────────────────────────────────────────────────┘
//!
//! commit(s1)  — new branch, clears future  current = s4
//! ┌──────────────────────────────────────────────────┐
//! │ Past:    [s0, s1]                                 │
//! │ Future:  []                                       │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `past.len() <= max_depth` after any operation.
//! 2. Future is cleared on every `commit`.
//! 3. `undo` and `redo` each move exactly one snapshot between the stacks
//!    and hand the displaced current state to the opposite stack.

use std::collections::VecDeque;
use std::fmt;

/// Snapshot stacks for linear undo/redo.
pub struct SnapshotStore<T> {
    /// Snapshots available for undo (most recent at back).
    past: VecDeque<T>,
    /// Snapshots available for redo (next redo at front).
    future: VecDeque<T>,
    max_depth: usize,
}

impl<T> fmt::Debug for SnapshotStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("undo_depth", &self.past.len())
            .field("redo_depth", &self.future.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<T> SnapshotStore<T> {
    /// Create an empty store keeping at most `max_depth` undo snapshots.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_depth,
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record `before` as the state preceding a committed change.
    ///
    /// Clears the future (new branch) and evicts the oldest snapshots past
    /// the depth limit.
    pub fn commit(&mut self, before: T) {
        self.future.clear();
        self.past.push_back(before);
        self.enforce_depth();
    }

    /// Step back. `current` goes to the front of the future and the most
    /// recent past snapshot is returned as the new current state.
    ///
    /// When there is nothing to undo, `current` is handed back in `Err`.
    pub fn undo(&mut self, current: T) -> Result<T, T> {
        match self.past.pop_back() {
            Some(previous) => {
                self.future.push_front(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    /// Step forward. `current` goes back onto the past and the front of the
    /// future is returned as the new current state.
    ///
    /// When there is nothing to redo, `current` is handed back in `Err`.
    pub fn redo(&mut self, current: T) -> Result<T, T> {
        match self.future.pop_front() {
            Some(next) => {
                self.past.push_back(current);
                self.enforce_depth();
                Ok(next)
            }
            None => Err(current),
        }
    }

    // ====================================================================
    // Query
    // ====================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Undo snapshots, oldest first.
    pub fn past(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.past.iter()
    }

    /// Redo snapshots, next redo first.
    pub fn future(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.future.iter()
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn enforce_depth(&mut self) {
        while self.past.len() > self.max_depth {
            self.past.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_empty() {
        let store = SnapshotStore::<i32>::new(10);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.undo_depth(), 0);
        assert_eq!(store.redo_depth(), 0);
    }

    #[test]
    fn undo_on_empty_hands_current_back() {
        let mut store = SnapshotStore::new(10);
        assert_eq!(store.undo(7), Err(7));
        assert_eq!(store.redo(7), Err(7));
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut store = SnapshotStore::new(10);
        store.commit(1);
        store.commit(2);
        // current is 3
        let cur = store.undo(3).unwrap();
        assert_eq!(cur, 2);
        let cur = store.undo(cur).unwrap();
        assert_eq!(cur, 1);
        assert_eq!(store.future().copied().collect::<Vec<_>>(), [2, 3]);

        let cur = store.redo(cur).unwrap();
        assert_eq!(cur, 2);
        let cur = store.redo(cur).unwrap();
        assert_eq!(cur, 3);
        assert_eq!(store.past().copied().collect::<Vec<_>>(), [1, 2]);
        assert!(!store.can_redo());
    }

    #[test]
    fn commit_clears_future() {
        let mut store = SnapshotStore::new(10);
        store.commit(1);
        let cur = store.undo(2).unwrap();
        assert!(store.can_redo());
        store.commit(cur);
        assert!(!store.can_redo());
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn depth_limit_evicts_oldest() {
        let mut store = SnapshotStore::new(3);
        for i in 0..5 {
            store.commit(i);
        }
        assert_eq!(store.undo_depth(), 3);
        assert_eq!(store.past().copied().collect::<Vec<_>>(), [2, 3, 4]);
    }

    #[test]
    fn redo_respects_depth_limit() {
        let mut store = SnapshotStore::new(2);
        store.commit(1);
        store.commit(2);
        let cur = store.undo(3).unwrap();
        let cur = store.undo(cur).unwrap();
        assert_eq!(cur, 1);
        let cur = store.redo(cur).unwrap();
        let _ = store.redo(cur).unwrap();
        assert!(store.undo_depth() <= 2);
    }

    #[test]
    fn clear_removes_all() {
        let mut store = SnapshotStore::new(10);
        store.commit(1);
        let _ = store.undo(2);
        store.clear();
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn debug_reports_depths() {
        let mut store = SnapshotStore::new(4);
        store.commit(1);
        let s = format!("{store:?}");
        assert!(s.contains("SnapshotStore"));
        assert!(s.contains("undo_depth: 1"));
    }
}
