//! # Storefront Layout
//!
//! The data shapes shared by the editor, the preview frame and the
//! production renderer.
//!
//! A tenant page is stored as an ordered JSON array of blocks:
//!
//! ```json
//! [
//!   { "id": "b1", "type": "Hero", "props": { "title": "Spring sale" } },
//!   { "id": "b2", "type": "ProductGrid", "props": { "collectionId": "all" } }
//! ]
//! ```
//!
//! Block props may embed content packet references (`{"$packet": "<id>"}`)
//! which are hydrated at render time by `storefront-packets`.
//!
//! Unknown keys (on the block itself or inside `props`) are preserved, so a
//! layout written by a newer admin UI survives a round trip through an older
//! renderer.

pub mod block;
pub mod error;
pub mod ids;
pub mod packet;
pub mod product;
pub mod theme;
pub mod validate;
pub mod visitor;

pub use block::{parse_layout, to_layout_json, Block, Props};
pub use error::{LayoutError, LayoutResult};
pub use ids::{get_seed, IdGenerator, SequentialIds, UuidIds};
pub use packet::{make_packet_ref, packet_ref, ContentPacket, PacketMap, PACKET_REF_KEY};
pub use product::Product;
pub use theme::{StoreColors, ThemeTag};
pub use validate::{validate_colors, validate_layout, IssueLevel, LayoutIssue};
pub use visitor::{walk_value, walk_value_mut, PropVisitor, PropVisitorMut};
