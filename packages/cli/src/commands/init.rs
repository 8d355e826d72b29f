use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::Path;
use storefront_layout::make_packet_ref;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing storefront project...".bright_blue().bold());

    let config = Config::default();

    let layouts_dir = config.layouts_dir(cwd);
    if !layouts_dir.exists() {
        fs::create_dir_all(&layouts_dir)?;
        println!("  {} Created {}/", "✓".green(), config.layouts_dir);
    }

    write_if_missing(&layouts_dir.join("home.json"), &sample_layout()?, "home layout")?;
    write_if_missing(&config.packets_path(cwd), &sample_packets()?, &config.packets_file)?;
    write_if_missing(&cwd.join(&config.products_file), &sample_products()?, &config.products_file)?;

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/home.json", config.layouts_dir);
    println!("  2. Run: storefront validate");
    println!("  3. Run: storefront preview {}/home.json", config.layouts_dir);

    Ok(())
}

fn write_if_missing(path: &Path, content: &str, label: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content)?;
    println!("  {} Created {}", "✓".green(), label);
    Ok(())
}

fn sample_layout() -> Result<String> {
    let layout = json!([
        {
            "id": "header",
            "type": "Header",
            "props": {
                "storeName": "My Store",
                "links": [{ "label": "Shop", "href": "/products" }]
            }
        },
        {
            "id": "hero",
            "type": "Hero",
            "props": {
                "title": make_packet_ref("hero-title"),
                "subtitle": "Fresh arrivals every week",
                "ctaLabel": "Shop now",
                "animation": "theme"
            }
        },
        {
            "id": "products",
            "type": "ProductGrid",
            "props": { "title": "Featured", "collectionId": "all", "limit": 8 }
        },
        {
            "id": "newsletter",
            "type": "Newsletter",
            "props": {}
        },
        {
            "id": "footer",
            "type": "Footer",
            "props": { "storeName": "My Store" }
        }
    ]);
    Ok(serde_json::to_string_pretty(&layout)?)
}

fn sample_packets() -> Result<String> {
    let packets = json!([
        {
            "id": "hero-title",
            "type": "text",
            "name": "Hero title",
            "data": { "text": "Welcome to My Store" }
        }
    ]);
    Ok(serde_json::to_string_pretty(&packets)?)
}

fn sample_products() -> Result<String> {
    let products = json!([
        { "id": "p1", "name": "Canvas Tote", "price": 24.0, "collectionIds": ["bags"] },
        { "id": "p2", "name": "Ceramic Mug", "price": 14.5, "collectionIds": ["kitchen"] }
    ]);
    Ok(serde_json::to_string_pretty(&products)?)
}
