//! # History Manager
//!
//! Undo/redo over full-state snapshots.
//!
//! ## Design
//!
//! - `commit` pushes the current state onto the past and clears the
//!   future; identical states are a no-op so empty edits never create
//!   undo steps
//! - `set_present` replaces the present in place without touching
//!   past/future; continuous gestures (live drag deltas, text buffering)
//!   use it so one logical gesture produces exactly one undo step at
//!   gesture end
//! - Snapshots, not reverse-operation logs: undo/redo are trivially
//!   correct because they just swap whole states
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(doc);
//! history.commit(edited_doc);
//! history.undo();
//! history.redo();
//! ```

/// Snapshot-based undo/redo stack
#[derive(Debug)]
pub struct History<S> {
    /// Older states, oldest first
    past: Vec<S>,

    /// The authoritative current state
    present: S,

    /// Undone states, next-redo last
    future: Vec<S>,

    /// Maximum number of past entries (0 = unlimited)
    max_depth: usize,
}

impl<S: Clone + PartialEq> History<S> {
    /// Create a history with the default depth cap (100)
    pub fn new(initial: S) -> Self {
        Self::with_max_depth(initial, 100)
    }

    pub fn with_max_depth(initial: S, max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            max_depth,
        }
    }

    pub fn present(&self) -> &S {
        &self.present
    }

    /// Record one undo step. No-op if `next` equals the present state.
    pub fn commit(&mut self, next: S) {
        if next == self.present {
            return;
        }

        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);

        // Trim from the oldest end; redo linearity is untouched.
        if self.max_depth > 0 && self.past.len() > self.max_depth {
            self.past.remove(0);
        }

        self.future.clear();
    }

    /// Replace the present without creating an undo step.
    pub fn set_present(&mut self, next: S) {
        self.present = next;
    }

    /// Step back one committed state. Returns false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.past.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.present, previous);
                self.future.push(current);
                true
            }
            None => false,
        }
    }

    /// Step forward one undone state. Returns false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.future.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.present, next);
                self.past.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_undo_restores_exact_state() {
        let mut history = History::new(1);
        history.commit(2);

        assert!(history.undo());
        assert_eq!(*history.present(), 1);

        assert!(history.redo());
        assert_eq!(*history.present(), 2);
    }

    #[test]
    fn test_identical_commit_is_a_no_op() {
        let mut history = History::new(5);
        history.commit(5);

        assert!(!history.can_undo());
    }

    #[test]
    fn test_transient_updates_produce_one_undo_step() {
        let mut history = History::new(0);
        history.commit(1);

        for i in 2..50 {
            history.set_present(i);
        }
        // Restore the pre-gesture state before committing the final one,
        // the way a gesture boundary does it.
        history.set_present(1);
        history.commit(49);

        assert_eq!(history.undo_depth(), 2);
        history.undo();
        assert_eq!(*history.present(), 1);
    }

    #[test]
    fn test_new_commit_clears_future() {
        let mut history = History::new(1);
        history.commit(2);
        history.undo();
        assert!(history.can_redo());

        history.commit(3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_cap_drops_oldest_without_breaking_redo() {
        let mut history = History::with_max_depth(0, 2);
        for i in 1..=5 {
            history.commit(i);
        }

        assert_eq!(history.undo_depth(), 2);
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(*history.present(), 3);

        assert!(history.redo());
        assert!(history.redo());
        assert_eq!(*history.present(), 5);
    }
}
