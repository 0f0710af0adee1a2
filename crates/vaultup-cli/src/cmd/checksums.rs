//! Checksums command
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;
use tracing::debug;
use vaultup_core::InstallerConfig;
use vaultup_schema::Os;

#[derive(Debug, Serialize)]
struct Entry<'a> {
    os: &'a str,
    arch: &'a str,
    version: &'a str,
    sha256: &'a str,
}

/// List the pinned checksums of the active table.
pub fn checksums(config: &InstallerConfig, os: Option<Os>, json: bool) -> Result<()> {
    let table = config
        .checksum_table()
        .context("Failed to load checksum table")?;
    debug!(entries = table.len(), "checksum table loaded");
    if table.is_empty() {
        eprintln!(
            "{} checksum table is empty, downloads will not be verified",
            "note:".yellow().bold()
        );
    }

    let entries: Vec<Entry<'_>> = table
        .iter()
        .filter(|(entry_os, ..)| os.is_none_or(|o| o.as_str() == *entry_os))
        .map(|(os, arch, version, digest)| Entry {
            os,
            arch,
            version,
            sha256: digest.as_str(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for e in &entries {
        println!("{:<8} {:<6} {:<8} {}", e.os, e.arch, e.version, e.sha256);
    }
    Ok(())
}
