//! Last-known-good layouts, used to show something before the first live
//! update arrives.

use crate::error::PreviewResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use storefront_layout::{get_seed, Block, StoreColors, ThemeTag};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub tenant: String,
    pub page: String,
}

impl SnapshotKey {
    pub fn new(tenant: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            page: page.into(),
        }
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub key: SnapshotKey,
    pub layout: Vec<Block>,
    pub colors: StoreColors,
    pub theme: ThemeTag,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(key: SnapshotKey, layout: Vec<Block>, colors: StoreColors, theme: ThemeTag) -> Self {
        Self {
            key,
            layout,
            colors,
            theme,
            saved_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, key: &SnapshotKey) -> PreviewResult<Option<Snapshot>>;
    async fn save(&self, snapshot: &Snapshot) -> PreviewResult<()>;
}

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<HashMap<SnapshotKey, Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, key: &SnapshotKey) -> PreviewResult<Option<Snapshot>> {
        let snapshots = self.snapshots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(snapshots.get(key).cloned())
    }

    async fn save(&self, snapshot: &Snapshot) -> PreviewResult<()> {
        self.snapshots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(snapshot.key.clone(), snapshot.clone());
        Ok(())
    }
}

/// One JSON file per key under `dir`
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<crc32 of "tenant/page">.json`
    pub fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        self.dir.join(format!("{}.json", get_seed(&key.to_string())))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &SnapshotKey) -> PreviewResult<Option<Snapshot>> {
        let path = self.path_for(key);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&source)?;
        // crc32 collisions are possible; never hand back another page
        if &snapshot.key != key {
            debug!(key = %key, found = %snapshot.key, "Snapshot file belongs to another key");
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> PreviewResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&snapshot.key);
        tokio::fs::write(&path, serde_json::to_string_pretty(snapshot)?).await?;
        debug!(key = %snapshot.key, path = %path.display(), "Snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_layout::Props;

    fn snapshot(page: &str) -> Snapshot {
        Snapshot::new(
            SnapshotKey::new("acme", page),
            vec![Block::new("a", "Hero", Props::new())],
            StoreColors::default(),
            ThemeTag::Bold,
        )
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshots"));

        let home = snapshot("home");
        assert_eq!(store.load(&home.key).await.unwrap(), None);

        store.save(&home).await.unwrap();
        assert_eq!(store.load(&home.key).await.unwrap(), Some(home.clone()));
        assert_eq!(store.load(&SnapshotKey::new("acme", "about")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_names_do_not_leak_keys() {
        let store = FileSnapshotStore::new("/tmp/snapshots");
        let path = store.path_for(&SnapshotKey::new("../etc", "passwd"));
        assert_eq!(path.parent(), Some(std::path::Path::new("/tmp/snapshots")));
    }

    #[tokio::test]
    async fn test_memory_store_overwrites() {
        let store = MemorySnapshotStore::new();
        let mut home = snapshot("home");
        store.save(&home).await.unwrap();

        home.theme = ThemeTag::Minimal;
        store.save(&home).await.unwrap();
        assert_eq!(store.load(&home.key).await.unwrap().unwrap().theme, ThemeTag::Minimal);
    }
}
