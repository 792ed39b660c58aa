//! Bounded undo/redo over whole-editor snapshots.

use std::collections::VecDeque;

/// One undoable change: the state before and after it.
#[derive(Clone, Debug)]
pub struct HistoryEntry<S> {
    /// Human-readable name of the change.
    pub description: String,
    before: S,
    after: S,
}

/// Undo and redo stacks holding at most `max_depth` entries each.
#[derive(Clone, Debug)]
pub struct EditHistory<S> {
    undo: VecDeque<HistoryEntry<S>>,
    redo: Vec<HistoryEntry<S>>,
    max_depth: usize,
}

impl<S: Clone> EditHistory<S> {
    /// Empty history. A depth of zero disables recording.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record a change. Clears the redo stack and drops the oldest entry
    /// when full.
    pub fn push(&mut self, description: impl Into<String>, before: S, after: S) {
        self.redo.clear();
        if self.max_depth == 0 {
            return;
        }
        if self.undo.len() == self.max_depth {
            self.undo.pop_front();
        }
        self.undo.push_back(HistoryEntry {
            description: description.into(),
            before,
            after,
        });
    }

    /// Step back: returns the change's description and the state to restore.
    pub fn undo(&mut self) -> Option<(String, S)> {
        let entry = self.undo.pop_back()?;
        let out = (entry.description.clone(), entry.before.clone());
        self.redo.push(entry);
        Some(out)
    }

    /// Step forward again after [`Self::undo`].
    pub fn redo(&mut self) -> Option<(String, S)> {
        let entry = self.redo.pop()?;
        let out = (entry.description.clone(), entry.after.clone());
        self.undo.push_back(entry);
        Some(out)
    }

    /// Whether [`Self::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`Self::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Description of the change [`Self::undo`] would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo.back().map(|e| e.description.as_str())
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
#[path = "../tests/unit/history.rs"]
mod tests;
