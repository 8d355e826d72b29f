use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront_layout::{PacketMap, Product, StoreColors, ThemeTag};
use storefront_packets::PacketCache;

pub const DEFAULT_CONFIG_NAME: &str = "storefront.config.json";

/// Storefront project configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory containing layout files (one JSON array per page)
    #[serde(default = "default_layouts_dir")]
    pub layouts_dir: String,

    /// JSON array of content packets
    #[serde(default = "default_packets_file")]
    pub packets_file: String,

    /// JSON array of catalog products
    #[serde(default = "default_products_file")]
    pub products_file: String,

    #[serde(default)]
    pub theme: ThemeTag,

    #[serde(default)]
    pub colors: StoreColors,

    /// Packet cache lifetime; `null` keeps packets for the whole session
    #[serde(default)]
    pub packet_cache_ttl_secs: Option<u64>,

    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,

    #[serde(default)]
    pub preview: PreviewConfig,

    /// Default tracing filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_layouts_dir() -> String {
    "layouts".to_string()
}

fn default_packets_file() -> String {
    "packets.json".to_string()
}

fn default_products_file() -> String {
    "products.json".to_string()
}

fn default_snapshot_dir() -> String {
    ".storefront/snapshots".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3030
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layouts_dir: default_layouts_dir(),
            packets_file: default_packets_file(),
            products_file: default_products_file(),
            theme: ThemeTag::default(),
            colors: StoreColors::default(),
            packet_cache_ttl_secs: None,
            snapshot_dir: default_snapshot_dir(),
            preview: PreviewConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from a directory; a missing file yields the defaults
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn layouts_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.layouts_dir)
    }

    pub fn packets_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.packets_file)
    }

    pub fn snapshot_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.snapshot_dir)
    }

    pub fn packet_cache(&self) -> PacketCache {
        PacketCache::with_ttl(self.packet_cache_ttl_secs.map(Duration::from_secs))
    }

    /// Catalog products; a missing file means an empty catalog
    pub fn load_products(&self, cwd: &Path) -> anyhow::Result<Vec<Product>> {
        let path = cwd.join(&self.products_file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).with_context(|| format!("Invalid {}", path.display()))
    }

    /// All packets keyed by id; a missing file means no packets
    pub fn load_packets(&self, cwd: &Path) -> anyhow::Result<PacketMap> {
        let path = self.packets_path(cwd);
        if !path.exists() {
            return Ok(PacketMap::new());
        }
        let content = std::fs::read_to_string(&path)?;
        let packets: Vec<storefront_layout::ContentPacket> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid {}", path.display()))?;
        Ok(packets.into_iter().map(|p| (p.id.clone(), p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r##"{
            "layoutsDir": "pages",
            "theme": "bold",
            "colors": {
                "primary": "#000000",
                "secondary": "#111111",
                "accent": "#222222",
                "background": "#ffffff",
                "text": "#333333"
            },
            "packetCacheTtlSecs": 60,
            "preview": { "port": 4000 }
        }"##;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.layouts_dir, "pages");
        assert_eq!(config.theme, ThemeTag::Bold);
        assert_eq!(config.colors.primary, "#000000");
        assert_eq!(config.packet_cache_ttl_secs, Some(60));
        assert_eq!(config.preview.port, 4000);
        assert_eq!(config.packets_file, "packets.json");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layouts_dir, "layouts");
        assert_eq!(config.theme, ThemeTag::Modern);
        assert_eq!(config.preview.port, 3030);
        assert_eq!(config.packet_cache().ttl(), None);
    }

    #[test]
    fn test_missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config, Config::default());
        assert!(config.load_products(dir.path()).unwrap().is_empty());
        assert!(config.load_packets(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
