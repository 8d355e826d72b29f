use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use storefront_engine::ComponentRegistry;
use storefront_layout::{parse_layout, validate_colors, validate_layout, LayoutIssue, PacketMap};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Layout file or directory (defaults to the configured layouts directory)
    pub path: Option<PathBuf>,

    /// Fail on warnings too
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

pub fn validate(args: ValidateArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let target = args.path.clone().unwrap_or_else(|| config.layouts_dir(cwd));

    println!("🔍 {} layouts", "Validating".green().bold());
    println!("   Input: {}", target.display());
    println!();

    let summary = validate_path(&target, &config, cwd)?;

    println!();
    println!(
        "✨ {} Validation complete!",
        if summary.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", summary.files);
    if summary.errors > 0 {
        println!("   {} {}", "Errors:".red(), summary.errors);
    }
    if summary.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), summary.warnings);
    }

    if summary.errors > 0 || (args.strict && summary.warnings > 0) {
        return Err(anyhow!("Validation failed"));
    }
    Ok(())
}

pub fn validate_path(target: &Path, config: &Config, cwd: &Path) -> Result<Summary> {
    let files = if target.is_file() {
        vec![target.to_path_buf()]
    } else if target.is_dir() {
        find_layout_files(target)
    } else {
        return Err(anyhow!("Input path does not exist: {}", target.display()));
    };

    let registry = ComponentRegistry::builtin();
    let packets = config.load_packets(cwd)?;
    let mut summary = Summary::default();

    let color_issues = validate_colors(&config.colors);
    if !color_issues.is_empty() {
        println!("{}", "storefront config".bright_white());
        report(&color_issues, &mut summary);
    }

    for file in files {
        summary.files += 1;
        let issues = validate_file(&file, &registry, &packets);
        if issues.is_empty() {
            println!("  {} {}", "✓".green(), file.display());
        } else {
            println!("  {}", file.display().to_string().bright_white());
            report(&issues, &mut summary);
        }
    }

    Ok(summary)
}

fn validate_file(path: &Path, registry: &ComponentRegistry, packets: &PacketMap) -> Vec<LayoutIssue> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return vec![LayoutIssue::error("io", e.to_string())],
    };
    match parse_layout(&source) {
        Ok(blocks) => validate_layout(&blocks, |ty| registry.contains(ty), Some(packets)),
        Err(e) => vec![LayoutIssue::error("parse", e.to_string())],
    }
}

fn report(issues: &[LayoutIssue], summary: &mut Summary) {
    for issue in issues {
        let location = issue
            .block_id
            .as_deref()
            .map(|id| format!(" [{}]", id))
            .unwrap_or_default();

        if issue.is_error() {
            summary.errors += 1;
            println!("    {} {}{}: {}", "✗".red(), issue.rule.red(), location, issue.message);
        } else {
            summary.warnings += 1;
            println!("    {} {}{}: {}", "⚠".yellow(), issue.rule.yellow(), location, issue.message);
        }
    }
}

fn find_layout_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}
