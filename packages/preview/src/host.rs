//! Editor side of the preview channel.

use crate::channel::FramePort;
use crate::message::{PreviewMessage, PreviewState, PreviewUpdate};
use storefront_editor::EditorStore;
use storefront_layout::{Block, Product, StoreColors, ThemeTag};
use tracing::{debug, info};

/// Owns the authoritative preview inputs and pushes them to the frame.
///
/// A frame that (re)mounts announces itself with `PREVIEW_READY` and gets
/// the full state; afterwards only changed fields are sent.
#[derive(Debug)]
pub struct PreviewHost {
    port: FramePort,
    state: PreviewState,
    synced_version: Option<u64>,
    frame_ready: bool,
}

impl PreviewHost {
    pub fn new(port: FramePort, state: PreviewState) -> Self {
        Self {
            port,
            state,
            synced_version: None,
            frame_ready: false,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Whether a frame has announced itself on this channel
    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn handle_message(&mut self, message: PreviewMessage) {
        match message {
            PreviewMessage::Ready => {
                info!(blocks = self.state.layout.len(), "Preview frame ready, sending full state");
                self.frame_ready = true;
                self.port.post(self.state.full_update());
            }
            PreviewMessage::Update(_) => {
                debug!("Ignoring PREVIEW_UPDATE sent to the host");
            }
        }
    }

    /// Wait for the next frame message and handle it; `false` once the
    /// frame side is gone
    pub async fn handle_next(&mut self) -> bool {
        match self.port.recv().await {
            Some(message) => {
                self.handle_message(message);
                true
            }
            None => false,
        }
    }

    /// Handle every message already waiting
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.port.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    fn send(&self, update: PreviewUpdate) {
        if !update.is_empty() {
            self.port.post(update);
        }
    }

    pub fn set_layout(&mut self, blocks: Vec<Block>) {
        self.state.layout = blocks.clone();
        self.send(PreviewUpdate::layout(blocks));
    }

    pub fn set_colors(&mut self, colors: StoreColors) {
        if colors == self.state.colors {
            return;
        }
        self.state.colors = colors.clone();
        self.send(PreviewUpdate::colors(colors));
    }

    pub fn set_theme(&mut self, theme: ThemeTag) {
        if theme == self.state.theme {
            return;
        }
        self.state.theme = theme;
        self.send(PreviewUpdate::theme(theme));
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.state.products = products.clone();
        self.send(PreviewUpdate::products(products));
    }

    /// Push the store's blocks if the store changed since the last sync.
    /// Returns whether an update was sent.
    pub fn sync_from_store(&mut self, store: &EditorStore) -> bool {
        if self.synced_version == Some(store.version()) {
            return false;
        }
        self.synced_version = Some(store.version());

        if store.blocks() == self.state.layout.as_slice() {
            // selection-only change
            return false;
        }
        self.set_layout(store.blocks().to_vec());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::channel;
    use storefront_layout::{Props, SequentialIds};

    #[tokio::test]
    async fn test_ready_gets_full_state() {
        let (host_port, mut frame_port) = channel();
        let mut host = PreviewHost::new(
            host_port,
            PreviewState {
                theme: ThemeTag::Playful,
                ..PreviewState::default()
            },
        );

        host.handle_message(PreviewMessage::Ready);
        let Some(PreviewMessage::Update(update)) = frame_port.recv().await else {
            panic!("expected an update");
        };
        assert_eq!(update.theme, Some(ThemeTag::Playful));
        assert!(update.layout.is_some());
        assert!(update.colors.is_some());
        assert!(update.products.is_some());
        assert!(host.frame_ready());
    }

    #[tokio::test]
    async fn test_local_changes_send_partial_updates() {
        let (host_port, mut frame_port) = channel();
        let mut host = PreviewHost::new(host_port, PreviewState::default());

        host.set_theme(ThemeTag::Bold);
        // unchanged value: nothing sent
        host.set_theme(ThemeTag::Bold);

        assert_eq!(
            frame_port.recv().await,
            Some(PreviewMessage::Update(PreviewUpdate::theme(ThemeTag::Bold)))
        );
        assert_eq!(frame_port.try_recv(), None);
    }

    #[tokio::test]
    async fn test_sync_from_store_only_on_change() {
        let (host_port, mut frame_port) = channel();
        let mut host = PreviewHost::new(host_port, PreviewState::default());
        let mut store = EditorStore::with_id_generator(Vec::new(), SequentialIds::from_seed("s"));

        let id = store.add_block("Hero", Props::new());
        assert!(host.sync_from_store(&store));
        assert!(!host.sync_from_store(&store));

        store.select_block(Some(&id));
        assert!(!host.sync_from_store(&store));

        let Some(PreviewMessage::Update(update)) = frame_port.recv().await else {
            panic!("expected an update");
        };
        assert_eq!(update.layout.map(|l| l.len()), Some(1));
        assert_eq!(frame_port.try_recv(), None);
    }
}
