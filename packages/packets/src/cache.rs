//! Session cache of resolved packets.
//!
//! Entries are keyed by packet id and inserts are last-write-wins, so a late
//! completion of a superseded fetch can only overwrite the same id with data
//! that was valid when fetched. Without a TTL an entry lives for the whole
//! session unless invalidated; with a TTL an expired entry is still served
//! for hydration but reported as missing so the caller refetches it.

use crate::resolver::PacketLookup;
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};
use storefront_layout::ContentPacket;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedPacket {
    packet: ContentPacket,
    fetched_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct PacketCache {
    entries: HashMap<String, CachedPacket>,
    ttl: Option<Duration>,
}

impl PacketCache {
    /// Cache without expiry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn insert(&mut self, packet: ContentPacket) {
        self.entries.insert(
            packet.id.clone(),
            CachedPacket {
                packet,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn insert_all(&mut self, packets: impl IntoIterator<Item = ContentPacket>) {
        for packet in packets {
            self.insert(packet);
        }
    }

    pub fn get(&self, id: &str) -> Option<&ContentPacket> {
        self.entries.get(id).map(|entry| &entry.packet)
    }

    fn is_fresh(&self, entry: &CachedPacket, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(entry.fetched_at) < ttl,
            None => true,
        }
    }

    /// Ids from `wanted` that are not cached or whose entry has expired
    pub fn missing_ids(&self, wanted: &BTreeSet<String>) -> Vec<String> {
        let now = Instant::now();
        let missing: Vec<String> = wanted
            .iter()
            .filter(|id| match self.entries.get(id.as_str()) {
                Some(entry) => !self.is_fresh(entry, now),
                None => true,
            })
            .cloned()
            .collect();

        debug!(
            wanted = wanted.len(),
            missing = missing.len(),
            "Checked packet cache"
        );
        missing
    }

    /// Drop one entry; the next lookup will fetch it again
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PacketLookup for PacketCache {
    fn lookup(&self, id: &str) -> Option<&ContentPacket> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn packet(id: &str, text: &str) -> ContentPacket {
        ContentPacket::new(id, "text", id, json!(text))
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_ids_excludes_cached() {
        let mut cache = PacketCache::new();
        cache.insert(packet("a", "A"));

        assert_eq!(cache.missing_ids(&ids(&["a", "b", "c"])), vec!["b", "c"]);
    }

    #[test]
    fn test_last_write_wins() {
        let mut cache = PacketCache::new();
        cache.insert(packet("a", "first"));
        cache.insert(packet("b", "other"));
        cache.insert(packet("a", "second"));

        assert_eq!(cache.get("a").unwrap().data, json!("second"));
        assert_eq!(cache.get("b").unwrap().data, json!("other"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_expired_entries_are_missing_but_still_served() {
        let mut cache = PacketCache::with_ttl(Some(Duration::ZERO));
        cache.insert(packet("a", "A"));

        assert_eq!(cache.missing_ids(&ids(&["a"])), vec!["a"]);
        assert!(cache.lookup("a").is_some());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = PacketCache::new();
        cache.insert_all([packet("a", "A"), packet("b", "B")]);

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.missing_ids(&ids(&["a", "b"])), vec!["a"]);

        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
