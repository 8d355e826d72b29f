//! Reloads a layout file into the editor when it changes on disk.

use crate::error::PreviewResult;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront_editor::EditorStore;
use storefront_layout::{parse_layout, Block};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

const DEBOUNCE: Duration = Duration::from_millis(100);

pub struct LayoutWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
    receiver: mpsc::UnboundedReceiver<()>,
    /// Deadline of a change seen but not yet read
    pending: Option<Instant>,
}

impl LayoutWatcher {
    /// Watch `path`. The parent directory is watched so editors that save
    /// by replacing the file are still seen.
    pub fn new(path: impl Into<PathBuf>) -> PreviewResult<Self> {
        let path: PathBuf = path.into();
        let path = path.canonicalize().unwrap_or(path);
        let file_name = path.file_name().map(|n| n.to_os_string());
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                let Ok(event) = result else {
                    return;
                };
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                let touches_layout = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if touches_layout {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        info!(path = %path.display(), "Watching layout file");

        Ok(Self {
            _watcher: watcher,
            path,
            receiver: rx,
            pending: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next change and read the file. Bursts of events within
    /// the debounce window count as one change. `None` when the watcher
    /// stopped.
    ///
    /// Cancel safe: a change seen by a dropped call is kept and returned by
    /// the next one, so this can sit in a `select!` loop.
    pub async fn next_layout(&mut self) -> Option<PreviewResult<Vec<Block>>> {
        loop {
            if let Some(deadline) = self.pending {
                // let the writer finish
                tokio::time::sleep_until(deadline).await;
                while self.receiver.try_recv().is_ok() {}

                debug!(path = %self.path.display(), "Layout file changed");
                let result = self.read_layout().await;
                self.pending = None;
                return Some(result);
            }

            self.receiver.recv().await?;
            self.pending = Some(Instant::now() + DEBOUNCE);
        }
    }

    pub async fn read_layout(&self) -> PreviewResult<Vec<Block>> {
        let source = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_layout(&source)?)
    }
}

/// Apply a reloaded layout as an undoable edit; unchanged content is skipped
pub fn apply_to_store(store: &mut EditorStore, blocks: Vec<Block>) -> bool {
    if store.blocks() == blocks.as_slice() {
        return false;
    }
    store.set_blocks(blocks, true);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_layout::Props;

    #[tokio::test]
    async fn test_read_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.json");
        std::fs::write(&path, r#"[{"id":"a","type":"Hero","props":{}}]"#).unwrap();

        let watcher = LayoutWatcher::new(&path).unwrap();
        let blocks = watcher.read_layout().await.unwrap();
        assert_eq!(blocks[0].id, "a");
    }

    #[tokio::test]
    async fn test_detects_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.json");
        std::fs::write(&path, "[]").unwrap();

        let mut watcher = LayoutWatcher::new(&path).unwrap();

        let writer_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            tokio::fs::write(&writer_path, r#"[{"id":"b","type":"Footer","props":{}}]"#)
                .await
                .unwrap();
        });

        let layout = tokio::time::timeout(Duration::from_secs(5), watcher.next_layout())
            .await
            .expect("no change seen")
            .unwrap()
            .unwrap();
        assert_eq!(layout[0].id, "b");
    }

    #[tokio::test]
    async fn test_change_survives_dropped_wait() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.json");
        std::fs::write(&path, "[]").unwrap();

        let mut watcher = LayoutWatcher::new(&path).unwrap();
        tokio::fs::write(&path, r#"[{"id":"c","type":"Hero","props":{}}]"#)
            .await
            .unwrap();

        // Each wait is shorter than the debounce, so the change is first seen
        // by a call that gets dropped; a later call must still deliver it.
        let mut dropped = 0;
        let mut layout = None;
        for _ in 0..500 {
            match tokio::time::timeout(Duration::from_millis(10), watcher.next_layout()).await {
                Ok(result) => {
                    layout = result;
                    break;
                }
                Err(_) => dropped += 1,
            }
        }

        let layout = layout.expect("change was lost").unwrap();
        assert_eq!(layout[0].id, "c");
        assert!(dropped > 0);
    }

    #[test]
    fn test_apply_to_store_skips_identical_layout() {
        let blocks = vec![Block::new("a", "Hero", Props::new())];
        let mut store = EditorStore::new(blocks.clone());

        assert!(!apply_to_store(&mut store, blocks));
        assert!(apply_to_store(&mut store, Vec::new()));
        assert!(store.can_undo());
    }
}
