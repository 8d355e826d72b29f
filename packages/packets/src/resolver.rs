use crate::cache::PacketCache;
use crate::error::PacketResult;
use crate::source::PacketSource;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use storefront_layout::{
    packet_ref, walk_value_mut, Block, ContentPacket, PropVisitor, PropVisitorMut,
};
use tracing::{debug, info, instrument};

/// Anything packets can be looked up in by id
pub trait PacketLookup {
    fn lookup(&self, id: &str) -> Option<&ContentPacket>;
}

impl PacketLookup for HashMap<String, ContentPacket> {
    fn lookup(&self, id: &str) -> Option<&ContentPacket> {
        self.get(id)
    }
}

#[derive(Default)]
struct IdCollector {
    ids: BTreeSet<String>,
}

impl PropVisitor for IdCollector {
    fn visit_packet_ref(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }
}

struct Hydrator<'a, L: PacketLookup> {
    packets: &'a L,
    replaced: usize,
    /// Packets currently being inlined, innermost last
    expanding: Vec<String>,
}

impl<'a, L: PacketLookup> Hydrator<'a, L> {
    fn new(packets: &'a L) -> Self {
        Self {
            packets,
            replaced: 0,
            expanding: Vec::new(),
        }
    }
}

impl<L: PacketLookup> PropVisitorMut for Hydrator<'_, L> {
    fn visit_value_mut(&mut self, value: &mut Value) {
        let Some(id) = packet_ref(value) else {
            walk_value_mut(self, value);
            return;
        };

        // A packet referencing itself, directly or through others, keeps the marker
        if self.expanding.iter().any(|open| open.as_str() == id) {
            debug!(packet_id = id, "Skipping cyclic packet reference");
            return;
        }

        // Unresolved references stay as they are
        let Some(packet) = self.packets.lookup(id) else {
            return;
        };
        let id = id.to_string();
        *value = packet.to_value();
        self.replaced += 1;

        // Packet data may itself reference packets
        self.expanding.push(id);
        walk_value_mut(self, value);
        self.expanding.pop();
    }
}

/// Every packet id referenced anywhere in the blocks' props
pub fn extract_packet_ids(blocks: &[Block]) -> BTreeSet<String> {
    let mut collector = IdCollector::default();
    for block in blocks {
        for value in block.props.values() {
            collector.visit_value(value);
        }
    }
    collector.ids
}

/// Copy of `block` with every resolvable reference replaced inline.
///
/// References inside an inlined packet's `data` are hydrated too. A cyclic
/// reference is left as a marker at the point where it closes the cycle.
pub fn hydrate_block_with_packets(block: &Block, packets: &impl PacketLookup) -> Block {
    let mut hydrated = block.clone();
    let mut hydrator = Hydrator::new(packets);

    for value in hydrated.props.values_mut() {
        hydrator.visit_value_mut(value);
    }

    if hydrator.replaced > 0 {
        debug!(block_id = %block.id, replaced = hydrator.replaced, "Hydrated packet references");
    }
    hydrated
}

pub fn hydrate_blocks(blocks: &[Block], packets: &impl PacketLookup) -> Vec<Block> {
    blocks
        .iter()
        .map(|block| hydrate_block_with_packets(block, packets))
        .collect()
}

/// Cache + source: fetches only what is missing, then hydrates
pub struct PacketResolver<S: PacketSource> {
    cache: PacketCache,
    source: S,
}

impl<S: PacketSource> PacketResolver<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, PacketCache::new())
    }

    pub fn with_cache(source: S, cache: PacketCache) -> Self {
        Self { cache, source }
    }

    pub fn cache(&self) -> &PacketCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PacketCache {
        &mut self.cache
    }

    /// Fetch the packets the cache lacks for `blocks` and return hydrated blocks.
    ///
    /// Packets referenced from fetched packet data are fetched in follow-up
    /// rounds; each id is requested at most once per call. Fetch errors are
    /// returned to the caller; the cache keeps whatever it had, so a later
    /// call can still hydrate with the cached subset.
    #[instrument(skip(self, blocks), fields(blocks = blocks.len()))]
    pub async fn resolve(&mut self, blocks: &[Block]) -> PacketResult<Vec<Block>> {
        let mut requested = BTreeSet::new();

        loop {
            let hydrated = hydrate_blocks(blocks, &self.cache);
            let missing: Vec<String> = self
                .cache
                .missing_ids(&extract_packet_ids(&hydrated))
                .into_iter()
                .filter(|id| !requested.contains(id))
                .collect();

            if missing.is_empty() {
                return Ok(hydrated);
            }

            let fetched = self.source.fetch(&missing).await?;
            info!(requested = missing.len(), fetched = fetched.len(), "Fetched content packets");
            requested.extend(missing);
            self.cache.insert_all(fetched);
        }
    }

    /// Hydrate with cached packets only
    pub fn hydrate_cached(&self, blocks: &[Block]) -> Vec<Block> {
        hydrate_blocks(blocks, &self.cache)
    }
}
