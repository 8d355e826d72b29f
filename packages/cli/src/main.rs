mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, preview, render, validate, InitArgs, PreviewArgs, RenderArgs, ValidateArgs};
use config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Storefront CLI - build, check and preview storefront page layouts
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new storefront project
    Init(InitArgs),

    /// Render a layout file to HTML
    Render(RenderArgs),

    /// Check layouts for errors before publishing
    Validate(ValidateArgs),

    /// Serve a live preview of a layout file
    Preview(PreviewArgs),
}

fn init_tracing(cwd: &Path) {
    // `RUST_LOG` wins over the configured level
    let default_level = Config::load(cwd)
        .map(|c| c.log_level)
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };
    init_tracing(&cwd);

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Render(args) => render(args, &cwd).await,
        Command::Validate(args) => validate(args, &cwd),
        Command::Preview(args) => preview(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
