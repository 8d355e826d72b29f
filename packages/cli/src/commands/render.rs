use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use storefront_engine::{to_html, HtmlOptions, LayoutEngine, RenderContext, RenderMode};
use storefront_layout::parse_layout;
use storefront_packets::{extract_packet_ids, JsonFilePacketSource, PacketResolver};
use tracing::warn;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Layout file to render
    pub layout: PathBuf,

    /// Write HTML to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Show failing blocks inline instead of dropping them
    #[arg(long)]
    pub preview: bool,

    /// Emit a fragment without indentation instead of a full document
    #[arg(long)]
    pub compact: bool,
}

pub async fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let html = render_layout_file(&args, &config, cwd).await?;

    match &args.out {
        Some(out) => {
            fs::write(out, &html)?;
            eprintln!(
                "{} {} → {}",
                "✓".green(),
                args.layout.display(),
                out.display()
            );
        }
        None => println!("{}", html),
    }
    Ok(())
}

pub async fn render_layout_file(args: &RenderArgs, config: &Config, cwd: &Path) -> Result<String> {
    let source = fs::read_to_string(&args.layout)
        .with_context(|| format!("Cannot read {}", args.layout.display()))?;
    let blocks = parse_layout(&source)?;

    let packets_path = config.packets_path(cwd);
    let blocks = if extract_packet_ids(&blocks).is_empty() || !packets_path.exists() {
        blocks
    } else {
        let mut resolver =
            PacketResolver::with_cache(JsonFilePacketSource::new(packets_path), config.packet_cache());
        match resolver.resolve(&blocks).await {
            Ok(hydrated) => hydrated,
            Err(e) => {
                warn!(error = %e, "Packet resolution failed, rendering unresolved");
                blocks
            }
        }
    };

    let mode = if args.preview {
        RenderMode::Preview
    } else {
        RenderMode::Production
    };
    let ctx = RenderContext::new(config.colors.clone(), config.theme)
        .with_products(config.load_products(cwd)?)
        .with_mode(mode);

    let page = LayoutEngine::default().render(&blocks, &ctx);

    let options = if args.compact {
        HtmlOptions::compact()
    } else {
        HtmlOptions::default().document()
    };
    Ok(to_html(&page, options))
}
