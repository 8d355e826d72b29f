//! # Storefront Preview
//!
//! Live preview of a page being edited, rendered in an isolated frame.
//!
//! ```text
//! ┌──────────────────────┐   PREVIEW_UPDATE    ┌──────────────────────┐
//! │ PreviewHost          │ ──────────────────▶ │ PreviewFrame         │
//! │  (editor, store)     │ ◀────────────────── │  (engine, packets)   │
//! └──────────────────────┘   PREVIEW_READY     └──────────┬───────────┘
//!                                                         │ watch
//!                                                  ┌──────▼───────┐
//!                                                  │ HTTP / SSE   │
//!                                                  └──────────────┘
//! ```
//!
//! The two sides share no state; everything crosses the channel as a
//! [`PreviewMessage`]. The frame falls back to a stored [`Snapshot`] until
//! the first live update arrives.

pub mod channel;
pub mod error;
pub mod frame;
pub mod host;
pub mod message;
pub mod server;
pub mod snapshot;
pub mod watcher;

pub use channel::{channel, FramePort};
pub use error::{PreviewError, PreviewResult};
pub use frame::{FrameRender, PreviewFrame};
pub use host::PreviewHost;
pub use message::{PreviewMessage, PreviewState, PreviewUpdate};
pub use server::{router, serve, PreviewEvent};
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotKey, SnapshotStore};
pub use watcher::{apply_to_store, LayoutWatcher};
