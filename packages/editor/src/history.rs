//! # Edit History
//!
//! Linear history of block-sequence snapshots.
//!
//! ## Design
//!
//! - Every entry is a complete, immutable snapshot of the block sequence
//! - Entry 0 is the initial state; the history is never empty
//! - Committing truncates everything after the current index, then appends
//! - Undo/redo only move the index
//!
//! Because the current blocks are always read from `entries[index]`, the
//! store can never drift from its history.

use serde::{Deserialize, Serialize};
use std::fmt;
use storefront_layout::Block;

/// Edit that produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Load,
    Add,
    Insert,
    Move,
    Update,
    Remove,
    Set,
}

impl EditAction {
    /// Label for "Undo …" / "Redo …" menu items
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::Load => "load layout",
            EditAction::Add => "add block",
            EditAction::Insert => "insert block",
            EditAction::Move => "move block",
            EditAction::Update => "edit block",
            EditAction::Remove => "remove block",
            EditAction::Set => "replace layout",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub action: EditAction,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,

    /// Maximum number of entries kept (0 = unlimited)
    max_entries: usize,
}

impl History {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self::with_max_entries(blocks, 0)
    }

    pub fn with_max_entries(blocks: Vec<Block>, max_entries: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                action: EditAction::Load,
                blocks,
            }],
            index: 0,
            max_entries,
        }
    }

    pub fn current(&self) -> &[Block] {
        &self.entries[self.index].blocks
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Truncate the redo future and append `blocks` as the new current entry
    pub fn commit(&mut self, action: EditAction, blocks: Vec<Block>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry { action, blocks });

        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(..overflow);
        }
        self.index = self.entries.len() - 1;
    }

    /// Replace the whole history with a single entry
    pub fn reset(&mut self, action: EditAction, blocks: Vec<Block>) {
        self.entries = vec![HistoryEntry { action, blocks }];
        self.index = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Action an `undo` would revert
    pub fn undo_action(&self) -> Option<EditAction> {
        self.can_undo().then(|| self.entries[self.index].action)
    }

    /// Action a `redo` would reapply
    pub fn redo_action(&self) -> Option<EditAction> {
        self.entries.get(self.index + 1).map(|entry| entry.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_layout::Props;

    fn blocks(ids: &[&str]) -> Vec<Block> {
        ids.iter().map(|id| Block::new(*id, "Hero", Props::new())).collect()
    }

    #[test]
    fn test_commit_truncates_future() {
        let mut history = History::new(blocks(&[]));
        history.commit(EditAction::Add, blocks(&["a"]));
        history.commit(EditAction::Add, blocks(&["a", "b"]));
        assert!(history.undo());
        assert!(history.undo());
        assert_eq!(history.redo_action(), Some(EditAction::Add));

        history.commit(EditAction::Add, blocks(&["c"]));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current(), blocks(&["c"]).as_slice());
    }

    #[test]
    fn test_bounds_are_no_ops() {
        let mut history = History::new(blocks(&["a"]));
        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(history.undo_action(), None);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_max_entries_drops_oldest() {
        let mut history = History::with_max_entries(blocks(&[]), 3);
        for id in ["a", "b", "c", "d"] {
            history.commit(EditAction::Add, blocks(&[id]));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.entry(0).unwrap().blocks, blocks(&["b"]));
    }
}
