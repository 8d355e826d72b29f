use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storefront_editor::EditorStore;
use storefront_layout::parse_layout;
use storefront_packets::{JsonFilePacketSource, MemoryPacketSource, PacketSource};
use storefront_preview::{
    apply_to_store, channel, serve, FileSnapshotStore, LayoutWatcher, PreviewFrame, PreviewHost,
    PreviewState, SnapshotKey,
};
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Layout file to preview; edits on disk are picked up live
    pub layout: PathBuf,

    /// Port to serve the preview on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Tenant name used for the snapshot key
    #[arg(long, default_value = "local")]
    pub tenant: String,

    /// Page name used for the snapshot key (defaults to the file name)
    #[arg(long)]
    pub page: Option<String>,
}

pub async fn preview(args: PreviewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;

    let source = fs::read_to_string(&args.layout)
        .with_context(|| format!("Cannot read {}", args.layout.display()))?;
    let mut store = EditorStore::new(parse_layout(&source)?);

    let page = args.page.clone().unwrap_or_else(|| {
        args.layout
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "home".to_string())
    });
    let key = SnapshotKey::new(args.tenant.clone(), page.clone());

    let packets_path = config.packets_path(cwd);
    let packet_source: Arc<dyn PacketSource> = if packets_path.exists() {
        Arc::new(JsonFilePacketSource::new(packets_path))
    } else {
        Arc::new(MemoryPacketSource::default())
    };

    let (host_port, frame_port) = channel();
    let frame = PreviewFrame::new(frame_port, packet_source)
        .with_cache(config.packet_cache())
        .with_snapshots(Arc::new(FileSnapshotStore::new(config.snapshot_dir(cwd))), key);
    let renders = frame.subscribe();
    tokio::spawn(frame.run());

    let port = args.port.unwrap_or(config.preview.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let title = format!("{} preview", page);
    let server = tokio::spawn(async move { serve(addr, renders, &title).await });

    let mut host = PreviewHost::new(
        host_port,
        PreviewState {
            layout: store.blocks().to_vec(),
            colors: config.colors.clone(),
            theme: config.theme,
            products: config.load_products(cwd)?,
        },
    );
    let mut watcher = LayoutWatcher::new(args.layout.clone())?;

    println!("{}", "👀 Starting storefront preview...".bright_blue().bold());
    println!("   Layout: {}", args.layout.display());
    println!("   Open:   {}", format!("http://{}", addr).cyan());
    println!();

    loop {
        tokio::select! {
            alive = host.handle_next() => {
                if !alive {
                    warn!("Preview frame stopped");
                    break;
                }
            }
            Some(result) = watcher.next_layout() => match result {
                Ok(blocks) => {
                    if apply_to_store(&mut store, blocks) {
                        info!(blocks = store.blocks().len(), version = store.version(), "Layout reloaded");
                        host.sync_from_store(&store);
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring unreadable layout"),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down preview");
                break;
            }
        }
    }

    server.abort();
    Ok(())
}
