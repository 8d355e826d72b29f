//! Incremental fetch behaviour of the packet resolver

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use storefront_layout::{make_packet_ref, Block, ContentPacket};
use storefront_packets::{
    extract_packet_ids, MemoryPacketSource, PacketError, PacketResolver, PacketResult, PacketSource,
};

fn hero(id: &str, packet_id: &str) -> Block {
    let mut block = Block::new(id, "Hero", Default::default());
    block.props.insert("title".into(), make_packet_ref(packet_id));
    block
}

fn text_packet(id: &str, text: &str) -> ContentPacket {
    ContentPacket::new(id, "text", id, json!({ "text": text }))
}

#[tokio::test]
async fn test_resolve_fetches_each_packet_once() {
    let source = Arc::new(MemoryPacketSource::new([
        text_packet("a", "Alpha"),
        text_packet("b", "Beta"),
    ]));
    let mut resolver = PacketResolver::new(source.clone());

    let first = vec![hero("1", "a")];
    let hydrated = resolver.resolve(&first).await.unwrap();
    assert!(extract_packet_ids(&hydrated).is_empty());

    // second layout adds "b"; "a" must come from the cache
    let second = vec![hero("1", "a"), hero("2", "b")];
    resolver.resolve(&second).await.unwrap();

    assert_eq!(
        source.requests(),
        vec![vec!["a".to_string()], vec!["b".to_string()]]
    );

    // nothing missing: no fetch at all
    resolver.resolve(&second).await.unwrap();
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_invalidated_packet_is_refetched() {
    let source = Arc::new(MemoryPacketSource::new([text_packet("a", "Old")]));
    let mut resolver = PacketResolver::new(source.clone());
    let layout = vec![hero("1", "a")];

    resolver.resolve(&layout).await.unwrap();
    source.upsert(text_packet("a", "New"));

    // still cached
    let stale = resolver.resolve(&layout).await.unwrap();
    assert_eq!(stale[0].props["title"]["data"]["text"], json!("Old"));

    resolver.cache_mut().invalidate("a");
    let fresh = resolver.resolve(&layout).await.unwrap();
    assert_eq!(fresh[0].props["title"]["data"]["text"], json!("New"));
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_missing_packets_pass_through() {
    let source = MemoryPacketSource::new([]);
    let mut resolver = PacketResolver::new(source);

    let layout = vec![hero("1", "ghost")];
    let hydrated = resolver.resolve(&layout).await.unwrap();

    assert_eq!(hydrated, layout);
}

struct BrokenSource;

#[async_trait]
impl PacketSource for BrokenSource {
    async fn fetch(&self, _ids: &[String]) -> PacketResult<Vec<ContentPacket>> {
        Err(PacketError::Fetch("connection reset".into()))
    }
}

#[tokio::test]
async fn test_fetch_failure_is_surfaced() {
    let mut resolver = PacketResolver::new(BrokenSource);

    let result = resolver.resolve(&[hero("1", "a")]).await;
    assert!(matches!(result, Err(PacketError::Fetch(_))));

    // the cached path still renders, unresolved
    let cached = resolver.hydrate_cached(&[hero("1", "a")]);
    assert_eq!(cached[0].props["title"], make_packet_ref("a"));
}

#[tokio::test]
async fn test_resolve_follows_refs_in_packet_data() {
    let promo = ContentPacket::new("promo", "card", "Promo", json!({ "heading": make_packet_ref("a") }));
    let source = Arc::new(MemoryPacketSource::new([promo, text_packet("a", "Alpha")]));
    let mut resolver = PacketResolver::new(source.clone());

    let hydrated = resolver.resolve(&[hero("1", "promo")]).await.unwrap();
    assert!(extract_packet_ids(&hydrated).is_empty());
    assert_eq!(hydrated[0].props["title"]["data"]["heading"]["data"]["text"], json!("Alpha"));
    assert_eq!(
        source.requests(),
        vec![vec!["promo".to_string()], vec!["a".to_string()]]
    );
}

#[tokio::test]
async fn test_resolve_requests_absent_nested_ref_once() {
    let promo = ContentPacket::new("promo", "card", "Promo", json!({ "heading": make_packet_ref("gone") }));
    let source = Arc::new(MemoryPacketSource::new([promo]));
    let mut resolver = PacketResolver::new(source.clone());

    let hydrated = resolver.resolve(&[hero("1", "promo")]).await.unwrap();
    assert_eq!(hydrated[0].props["title"]["data"]["heading"], make_packet_ref("gone"));
    assert_eq!(source.fetch_count(), 2);
}
