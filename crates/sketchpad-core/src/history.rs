//! Undo/redo log of path insertions.

use crate::error::{SketchError, SketchResult};
use crate::store::{Collection, PathId, PathStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One recorded insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The inserted path.
    pub path: PathId,
    /// The collection it was inserted into.
    pub target: Collection,
}

/// Linear undo/redo history.
///
/// Entries hold path ids, never the records themselves; the [`PathStore`]
/// keeps records alive while an entry still names them.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new insertion. Invalidates everything on the redo stack.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
    }

    /// Undo the newest insertion by detaching its path.
    ///
    /// A path that is already gone from its collection is tolerated: the entry
    /// still moves to the redo stack.
    pub fn undo(&mut self, store: &mut PathStore) -> SketchResult<HistoryEntry> {
        let entry = self
            .undo_stack
            .pop()
            .ok_or(SketchError::EmptyHistory("undo"))?;
        if !store.detach(entry.path, entry.target) {
            log::debug!("Undo of {} found nothing in {}", entry.path, entry.target);
        }
        self.redo_stack.push(entry);
        Ok(entry)
    }

    /// Redo the newest undone insertion by re-attaching its path.
    ///
    /// If the record no longer exists the entry is dropped.
    pub fn redo(&mut self, store: &mut PathStore) -> SketchResult<HistoryEntry> {
        let entry = self
            .redo_stack
            .pop()
            .ok_or(SketchError::EmptyHistory("redo"))?;
        if !store.attach(entry.path, entry.target) {
            return Err(SketchError::StalePathReference {
                id: entry.path,
                target: entry.target,
            });
        }
        self.undo_stack.push(entry);
        Ok(entry)
    }

    /// Forget everything.
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

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Every path id named by either stack.
    pub fn referenced(&self) -> HashSet<PathId> {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(|entry| entry.path)
            .collect()
    }
}
