//! # Storefront Packets
//!
//! Resolves content packet references embedded in block props.
//!
//! ```text
//! blocks ──extract_packet_ids──▶ ids ──cache.missing_ids──▶ fetch (PacketSource)
//!    │                                                         │
//!    └──────────── hydrate_blocks(cache) ◀── cache.insert_all ◀┘
//! ```
//!
//! Hydration never fails: references without a resolved packet pass through
//! unchanged so a page can render before (or without) its packets. Only the
//! fetch step reports errors, and it is up to the caller to retry or render
//! with what is cached.

pub mod cache;
pub mod error;
pub mod resolver;
pub mod source;

pub use cache::PacketCache;
pub use error::{PacketError, PacketResult};
pub use resolver::{
    extract_packet_ids, hydrate_block_with_packets, hydrate_blocks, PacketLookup, PacketResolver,
};
pub use source::{MemoryPacketSource, PacketSource};

#[cfg(feature = "fs")]
pub use source::JsonFilePacketSource;
