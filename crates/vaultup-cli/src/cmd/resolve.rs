//! Resolve command
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use vaultup_core::{InstallerConfig, Resolver};
use vaultup_schema::{Os, Version};

/// Print what `version` resolves to. Never touches the network.
pub fn resolve(
    config: &InstallerConfig,
    version: &Version,
    os: Os,
    raw_arch: &str,
    json: bool,
) -> Result<()> {
    let table = config
        .checksum_table()
        .context("Failed to load checksum table")?;
    let resolver = Resolver::new(config.vault.archive_url_root.clone(), table);
    let descriptor = resolver.resolve(version, os, raw_arch, config.vault.tier());

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("{} {}", label("filename"), descriptor.filename);
    println!("{} {}", label("url"), descriptor.url);
    match &descriptor.checksum {
        Some(digest) => println!("{} {digest}", label("sha256")),
        None => println!("{} {}", label("sha256"), "(none)".dark_grey()),
    }
    for warning in &descriptor.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
    Ok(())
}

fn label(name: &str) -> impl std::fmt::Display {
    format!("{name:<10}").bold()
}
