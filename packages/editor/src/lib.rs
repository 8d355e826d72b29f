//! # Storefront Editor
//!
//! Editing state for the page builder: an ordered block sequence with
//! linear undo/redo and a weak selection.
//!
//! ## Usage
//!
//! ```rust
//! use storefront_editor::{Direction, EditorStore};
//! use storefront_layout::{Props, SequentialIds};
//!
//! let mut store = EditorStore::with_id_generator(Vec::new(), SequentialIds::from_seed("home"));
//! let hero = store.add_block("Hero", Props::new());
//! store.add_block("Footer", Props::new());
//! store.move_block(&hero, Direction::Down);
//!
//! assert_eq!(store.blocks()[1].id, hero);
//! store.undo();
//! assert_eq!(store.blocks()[0].id, hero);
//! ```
//!
//! Stores are plain values: create one per open page, no global state.

mod errors;
mod history;
mod store;

pub use errors::{EditorError, EditorResult};
pub use history::{EditAction, History, HistoryEntry};
pub use store::{Direction, EditorStore};
