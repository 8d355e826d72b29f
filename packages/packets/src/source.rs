use crate::error::PacketResult;
use async_trait::async_trait;
use std::collections::HashMap;
#[cfg(feature = "fs")]
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storefront_layout::ContentPacket;

/// External store of content packets.
///
/// Ids that do not exist are simply absent from the result; only transport
/// or decoding problems are errors.
#[async_trait]
pub trait PacketSource: Send + Sync {
    async fn fetch(&self, ids: &[String]) -> PacketResult<Vec<ContentPacket>>;
}

#[async_trait]
impl<S: PacketSource + ?Sized> PacketSource for Arc<S> {
    async fn fetch(&self, ids: &[String]) -> PacketResult<Vec<ContentPacket>> {
        (**self).fetch(ids).await
    }
}

/// Map-backed source; records every request so callers can check what was fetched
#[derive(Debug, Default)]
pub struct MemoryPacketSource {
    packets: Mutex<HashMap<String, ContentPacket>>,
    requests: Mutex<Vec<Vec<String>>>,
    fetch_count: AtomicUsize,
}

impl MemoryPacketSource {
    pub fn new(packets: impl IntoIterator<Item = ContentPacket>) -> Self {
        let source = Self::default();
        for packet in packets {
            source.upsert(packet);
        }
        source
    }

    /// Add or replace a packet (e.g. after an edit in the admin UI)
    pub fn upsert(&self, packet: ContentPacket) {
        self.packets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(packet.id.clone(), packet);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Id lists of every fetch so far, in call order
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl PacketSource for MemoryPacketSource {
    async fn fetch(&self, ids: &[String]) -> PacketResult<Vec<ContentPacket>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ids.to_vec());

        let packets = self.packets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(ids.iter().filter_map(|id| packets.get(id).cloned()).collect())
    }
}

/// Reads a JSON array of packets from disk on every fetch
#[cfg(feature = "fs")]
#[derive(Debug, Clone)]
pub struct JsonFilePacketSource {
    path: PathBuf,
}

#[cfg(feature = "fs")]
impl JsonFilePacketSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load_all(&self) -> PacketResult<Vec<ContentPacket>> {
        let source = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&source)?)
    }
}

#[cfg(feature = "fs")]
#[async_trait]
impl PacketSource for JsonFilePacketSource {
    async fn fetch(&self, ids: &[String]) -> PacketResult<Vec<ContentPacket>> {
        let all = self.load_all().await?;
        Ok(all.into_iter().filter(|p| ids.contains(&p.id)).collect())
    }
}
