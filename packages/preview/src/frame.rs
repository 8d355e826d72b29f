//! # Preview Frame
//!
//! Isolated side of the preview channel. Renders whatever state the editor
//! last sent, resolving content packets in the background.
//!
//! ```text
//! PREVIEW_UPDATE ──merge──▶ state ──render (cached packets)──▶ watch
//!                             │
//!                             └──missing ids──▶ fetch task ──▶ cache ──▶ render
//! ```
//!
//! Rendering never waits for a fetch. A completed fetch only adds packets
//! to the cache and triggers another render, so late or out-of-order
//! completions converge on the same page. Fetch errors stay inside the
//! frame: affected references render unresolved.

use crate::channel::FramePort;
use crate::error::PreviewResult;
use crate::message::{PreviewMessage, PreviewState, PreviewUpdate};
use crate::snapshot::{Snapshot, SnapshotKey, SnapshotStore};
use std::collections::HashSet;
use std::sync::Arc;
use storefront_engine::{to_html, HtmlOptions, LayoutEngine, RenderContext, RenderMode, RenderedPage};
use storefront_layout::{Block, ContentPacket};
use storefront_packets::{extract_packet_ids, hydrate_blocks, PacketCache, PacketResult, PacketSource};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// One render published by the frame
#[derive(Debug, Clone)]
pub struct FrameRender {
    /// Increases with every render of this frame instance
    pub version: u64,
    pub layout: Vec<Block>,
    pub page: RenderedPage,
    /// HTML fragment for `page`
    pub html: String,
    /// Packet references still unresolved in this render
    pub unresolved: usize,
    /// Rendered from a stored snapshot, before any live update
    pub stale: bool,
}

struct FetchOutcome {
    ids: Vec<String>,
    result: PacketResult<Vec<ContentPacket>>,
}

pub struct PreviewFrame {
    port: FramePort,
    engine: LayoutEngine,
    source: Arc<dyn PacketSource>,
    cache: PacketCache,
    state: PreviewState,
    live: bool,
    mounted: bool,
    snapshots: Option<(Arc<dyn SnapshotStore>, SnapshotKey)>,
    in_flight: HashSet<String>,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    renders: watch::Sender<Option<Arc<FrameRender>>>,
    version: u64,
}

impl PreviewFrame {
    pub fn new(port: FramePort, source: Arc<dyn PacketSource>) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (renders, _) = watch::channel(None);

        Self {
            port,
            engine: LayoutEngine::default(),
            source,
            cache: PacketCache::new(),
            state: PreviewState::default(),
            live: false,
            mounted: false,
            snapshots: None,
            in_flight: HashSet::new(),
            fetch_tx,
            fetch_rx,
            renders,
            version: 0,
        }
    }

    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_cache(mut self, cache: PacketCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_snapshots(mut self, store: Arc<dyn SnapshotStore>, key: SnapshotKey) -> Self {
        self.snapshots = Some((store, key));
        self
    }

    /// Receiver for every render this frame publishes
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<FrameRender>>> {
        self.renders.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<FrameRender>> {
        self.renders.borrow().clone()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn cache(&self) -> &PacketCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PacketCache {
        &mut self.cache
    }

    /// Packet ids currently being fetched
    pub fn pending_fetches(&self) -> usize {
        self.in_flight.len()
    }

    /// Announce the frame to the host. Only the first call per frame
    /// instance sends `PREVIEW_READY`.
    pub fn mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        info!("Preview frame mounted");
        self.port.post(PreviewMessage::Ready);
        true
    }

    /// Render the stored snapshot if no live update has arrived yet
    pub async fn restore_snapshot(&mut self) -> PreviewResult<bool> {
        if self.live {
            return Ok(false);
        }
        let Some((store, key)) = &self.snapshots else {
            return Ok(false);
        };
        let Some(snapshot) = store.load(key).await? else {
            return Ok(false);
        };

        debug!(key = %key, saved_at = %snapshot.saved_at, "Rendering stale snapshot");
        self.state = PreviewState {
            layout: snapshot.layout,
            colors: snapshot.colors,
            theme: snapshot.theme,
            products: Vec::new(),
        };
        self.render();
        self.request_missing();
        Ok(true)
    }

    pub async fn handle_message(&mut self, message: PreviewMessage) {
        match message {
            PreviewMessage::Update(update) => self.apply_update(update).await,
            PreviewMessage::Ready => debug!("Ignoring PREVIEW_READY sent to the frame"),
        }
    }

    /// Merge the fields present in `update` and re-render
    #[instrument(skip_all, fields(layout = update.layout.is_some()))]
    pub async fn apply_update(&mut self, update: PreviewUpdate) {
        let layout_changed = self.state.merge(update);
        self.live = true;

        if layout_changed {
            self.save_snapshot().await;
        }

        self.render();

        if layout_changed {
            self.request_missing();
        }
    }

    async fn save_snapshot(&self) {
        let Some((store, key)) = &self.snapshots else {
            return;
        };
        let snapshot = Snapshot::new(
            key.clone(),
            self.state.layout.clone(),
            self.state.colors.clone(),
            self.state.theme,
        );
        if let Err(e) = store.save(&snapshot).await {
            warn!(key = %key, error = %e, "Failed to save preview snapshot");
        }
    }

    fn render(&mut self) {
        let hydrated = hydrate_blocks(&self.state.layout, &self.cache);
        let ctx = RenderContext {
            colors: self.state.colors.clone(),
            theme: self.state.theme,
            products: self.state.products.clone(),
            mode: RenderMode::Preview,
        };

        let page = self.engine.render(&hydrated, &ctx);
        let html = to_html(&page, HtmlOptions::compact());
        let unresolved = extract_packet_ids(&hydrated).len();

        self.version += 1;
        debug!(version = self.version, unresolved, stale = !self.live, "Preview rendered");

        self.renders.send_replace(Some(Arc::new(FrameRender {
            version: self.version,
            layout: self.state.layout.clone(),
            page,
            html,
            unresolved,
            stale: !self.live,
        })));
    }

    /// Start a fetch for referenced packets that are neither cached nor
    /// already in flight. References inside cached packet data count too.
    fn request_missing(&mut self) {
        let wanted = extract_packet_ids(&hydrate_blocks(&self.state.layout, &self.cache));
        let ids: Vec<String> = self
            .cache
            .missing_ids(&wanted)
            .into_iter()
            .filter(|id| !self.in_flight.contains(id))
            .collect();

        if ids.is_empty() {
            return;
        }

        debug!(count = ids.len(), "Fetching missing packets");
        self.in_flight.extend(ids.iter().cloned());

        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(&ids).await;
            let _ = tx.send(FetchOutcome { ids, result });
        });
    }

    fn handle_fetch(&mut self, outcome: FetchOutcome) {
        for id in &outcome.ids {
            self.in_flight.remove(id);
        }

        match outcome.result {
            Ok(packets) if packets.is_empty() => {
                debug!(requested = outcome.ids.len(), "No packets returned");
            }
            Ok(packets) => {
                debug!(received = packets.len(), "Packets fetched");
                self.cache.insert_all(packets);
                self.render();
                self.request_missing();
            }
            Err(e) => {
                warn!(ids = ?outcome.ids, error = %e, "Packet fetch failed, leaving references unresolved");
            }
        }
    }

    /// Wait for the next fetch completion and apply it; `false` if nothing
    /// is in flight
    pub async fn process_fetch(&mut self) -> bool {
        if self.in_flight.is_empty() {
            return false;
        }
        match self.fetch_rx.recv().await {
            Some(outcome) => {
                self.handle_fetch(outcome);
                true
            }
            None => false,
        }
    }

    /// Drive the frame until the host side of the channel goes away
    pub async fn run(mut self) {
        self.mount();
        if let Err(e) = self.restore_snapshot().await {
            warn!(error = %e, "Failed to load preview snapshot");
        }

        loop {
            tokio::select! {
                message = self.port.recv() => match message {
                    Some(message) => self.handle_message(message).await,
                    None => {
                        info!("Preview host gone, frame stopping");
                        break;
                    }
                },
                Some(outcome) = self.fetch_rx.recv() => self.handle_fetch(outcome),
            }
        }
    }
}
