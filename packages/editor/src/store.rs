//! # Editor Store
//!
//! Block sequence, selection and undo/redo for one page being edited.
//!
//! Every mutation follows the same transaction:
//!
//! ```text
//! current blocks ──op──▶ new sequence ──History::commit──▶ entries[index]
//! ```
//!
//! Operations on ids that do not exist are silent no-ops (except where
//! noted) so a stale UI event can never corrupt the layout.

use crate::errors::EditorResult;
use crate::history::{EditAction, History};
use serde::{Deserialize, Serialize};
use std::fmt;
use storefront_layout::{parse_layout, to_layout_json, Block, IdGenerator, Props, UuidIds};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

pub struct EditorStore {
    history: History,
    selected_block_id: Option<String>,
    version: u64,
    ids: Box<dyn IdGenerator>,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorStore")
            .field("blocks", &self.blocks().len())
            .field("history_index", &self.history.index())
            .field("history_len", &self.history.len())
            .field("selected_block_id", &self.selected_block_id)
            .field("version", &self.version)
            .finish()
    }
}

impl EditorStore {
    /// Store seeded with `blocks`, generating random UUIDs for new blocks
    pub fn new(blocks: Vec<Block>) -> Self {
        Self::with_id_generator(blocks, UuidIds)
    }

    pub fn with_id_generator(blocks: Vec<Block>, ids: impl IdGenerator + 'static) -> Self {
        Self {
            history: History::new(blocks),
            selected_block_id: None,
            version: 0,
            ids: Box::new(ids),
        }
    }

    /// Cap the number of history entries kept (0 = unlimited)
    pub fn with_history_limit(mut self, max_entries: usize) -> Self {
        let blocks = self.blocks().to_vec();
        self.history = History::with_max_entries(blocks, max_entries);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        self.history.current()
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks().iter().find(|b| b.id == id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    /// The selected block, if the selection still points at a live block
    pub fn selected_block(&self) -> Option<&Block> {
        self.selected_block_id
            .as_deref()
            .and_then(|id| self.block(id))
    }

    /// Bumped whenever blocks or selection change
    pub fn version(&self) -> u64 {
        self.version
    }

    fn commit(&mut self, action: EditAction, blocks: Vec<Block>) {
        self.history.commit(action, blocks);
        self.version += 1;
        debug!(
            action = %action,
            blocks = self.blocks().len(),
            history_index = self.history.index(),
            "History entry recorded"
        );
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.new_id();
            if self.block(&id).is_none() {
                return id;
            }
            debug!(id = %id, "Generated id already in use, retrying");
        }
    }

    /// Append a new block; returns its id
    pub fn add_block(&mut self, block_type: &str, default_props: Props) -> String {
        let id = self.fresh_id();
        let mut blocks = self.blocks().to_vec();
        blocks.push(Block::new(id.clone(), block_type, default_props));
        self.commit(EditAction::Add, blocks);
        id
    }

    /// Insert a new block at `index` (clamped to the sequence length); returns its id
    pub fn insert_block(&mut self, index: usize, block_type: &str, default_props: Props) -> String {
        let id = self.fresh_id();
        let mut blocks = self.blocks().to_vec();
        let index = index.min(blocks.len());
        blocks.insert(index, Block::new(id.clone(), block_type, default_props));
        self.commit(EditAction::Insert, blocks);
        id
    }

    /// Swap a block with its neighbour. A move past either end leaves the
    /// order unchanged but is still recorded.
    pub fn move_block(&mut self, id: &str, direction: Direction) {
        let mut blocks = self.blocks().to_vec();
        let Some(index) = blocks.iter().position(|b| b.id == id) else {
            return;
        };

        let block = blocks.remove(index);
        let target = match direction {
            Direction::Up => index.saturating_sub(1),
            Direction::Down => index + 1,
        }
        .min(blocks.len());
        blocks.insert(target, block);

        self.commit(EditAction::Move, blocks);
    }

    /// Shallow-merge `partial` into the matching block's props. An unknown id
    /// is a no-op.
    pub fn update_block_props(&mut self, id: &str, partial: &Props) {
        if self.block(id).is_none() {
            debug!(id, "update_block_props: no such block");
            return;
        }
        let blocks = self
            .blocks()
            .iter()
            .map(|b| {
                if b.id == id {
                    b.with_merged_props(partial)
                } else {
                    b.clone()
                }
            })
            .collect();
        self.commit(EditAction::Update, blocks);
    }

    /// Remove the matching block and clear the selection. The selection is
    /// cleared even when the id is unknown; nothing is recorded then.
    pub fn remove_block(&mut self, id: &str) {
        if self.block(id).is_none() {
            debug!(id, "remove_block: no such block");
            self.select_block(None);
            return;
        }
        let blocks = self
            .blocks()
            .iter()
            .filter(|b| b.id != id)
            .cloned()
            .collect();
        self.selected_block_id = None;
        self.commit(EditAction::Remove, blocks);
    }

    pub fn select_block(&mut self, id: Option<&str>) {
        let next = id.map(str::to_string);
        if next != self.selected_block_id {
            self.selected_block_id = next;
            self.version += 1;
        }
    }

    /// Replace the sequence. With `add_to_history` the replacement is a
    /// normal undoable edit; otherwise history restarts from `blocks`.
    pub fn set_blocks(&mut self, blocks: Vec<Block>, add_to_history: bool) {
        if add_to_history {
            self.commit(EditAction::Set, blocks);
        } else {
            self.history.reset(EditAction::Load, blocks);
            self.version += 1;
            debug!(blocks = self.blocks().len(), "History reset");
        }
    }

    /// Returns whether anything changed
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.version += 1;
        }
        moved
    }

    /// Returns whether anything changed
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.version += 1;
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_action(&self) -> Option<EditAction> {
        self.history.undo_action()
    }

    pub fn redo_action(&self) -> Option<EditAction> {
        self.history.redo_action()
    }

    /// Load a persisted layout, resetting history
    pub fn load_json(&mut self, source: &str) -> EditorResult<()> {
        let blocks = parse_layout(source)?;
        self.set_blocks(blocks, false);
        Ok(())
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(to_layout_json(self.blocks())?)
    }
}
