//! Install command
use std::sync::Arc;

use anyhow::{Context, Result};
use vaultup_core::{InstallRequest, InstallerConfig, Reporter, installer_for};
use vaultup_schema::{Platform, Version};

use crate::ui::ConsoleReporter;

/// Install `version` and print the executable path on stdout.
pub async fn install(
    config: &InstallerConfig,
    version: Version,
    platform: Platform,
    quiet: bool,
) -> Result<()> {
    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(quiet));
    let installer = installer_for(config, reporter).context("Failed to set up installer")?;

    let request = InstallRequest::from_config(config, version, platform);
    let exe = installer
        .ensure_installed(&request)
        .await
        .with_context(|| format!("Failed to install vault {}", request.version))?;

    println!("{}", exe.display());
    Ok(())
}
