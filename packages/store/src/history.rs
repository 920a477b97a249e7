//! # Snapshot History
//!
//! Undo/redo over whole snapshots instead of inverse operations.
//!
//! ## Design
//!
//! - Before an undoable operation commits, the previous value is recorded
//! - Undo hands back the most recent recorded value and keeps the current
//!   one for redo
//! - Recording a new value clears the redo side
//! - Depth is bounded; the oldest entries are evicted first
//!
//! Values are expected to be cheap to clone (the node map is a persistent
//! map), so keeping a hundred of them costs little more than one.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SnapshotHistory<T> {
    /// Values available for undo (most recent last)
    undo_stack: VecDeque<T>,

    /// Values available for redo (most recent last)
    redo_stack: VecDeque<T>,

    /// Maximum number of undo levels (0 = history disabled)
    max_depth: usize,
}

impl<T> SnapshotHistory<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Record the value that is about to be replaced
    pub fn record(&mut self, previous: T) {
        if self.max_depth == 0 {
            return;
        }

        self.undo_stack.push_back(previous);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }

        self.redo_stack.clear();
    }

    /// Step back: returns the value to restore, keeping `current` for redo
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Some(previous)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }
}

impl<T> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::new(100)
    }
}
