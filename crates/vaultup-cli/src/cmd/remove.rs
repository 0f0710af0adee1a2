//! Remove command
use std::sync::Arc;

use anyhow::{Context, Result};
use vaultup_core::{InstallerConfig, Reporter, installer_for};
use vaultup_schema::Version;

use crate::ui::ConsoleReporter;

/// Remove `version` and the stable symlink.
pub async fn remove(config: &InstallerConfig, version: &Version, quiet: bool) -> Result<()> {
    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(quiet));
    let installer = installer_for(config, reporter).context("Failed to set up installer")?;

    installer
        .ensure_removed(version)
        .await
        .with_context(|| format!("Failed to remove vault {version}"))
}
