//! vaultup - HashiCorp Vault installer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Installs a pinned Vault release into a versioned directory and points a
//! stable symlink at it, or hands the job to the system package manager.
//!
//! # Directory Layout
//!
//! ```text
//! /opt/vault/
//! ├── 0.9.1/vault
//! └── 1.8.5/vault
//! /usr/local/bin/vault -> /opt/vault/1.8.5/vault
//! ```
//!
//! Settings come from an optional `vaultup.toml`, overridden by flags and
//! `VAULTUP_*` environment variables.

pub mod cmd;
pub mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use vaultup_core::{InstallMethod, InstallerConfig};
use tracing::debug;
use vaultup_schema::{Arch, Os, Platform, Version};

#[derive(Debug, Parser)]
#[command(name = "vaultup")]
#[command(author, version, about = "vaultup - install and remove HashiCorp Vault releases")]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a version and point the symlink at it
    Install {
        /// Version to install (defaults to the configured version)
        version: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Remove a version and the symlink
    Remove {
        /// Version to remove (defaults to the configured version)
        version: Option<String>,
    },
    /// Show the archive, URL and checksum a version resolves to
    Resolve {
        /// Version to resolve (defaults to the configured version)
        version: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List pinned checksums
    Checksums {
        /// Only show entries for this OS
        #[arg(long)]
        os: Option<Os>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Overrides layered on top of the configuration file.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Configuration file
    #[arg(long, global = true, env = "VAULTUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per installed version
    #[arg(long, global = true, env = "VAULTUP_INSTALL_ROOT")]
    pub install_root: Option<PathBuf>,

    /// Stable symlink pointing at the active executable
    #[arg(long, global = true, env = "VAULTUP_SYMLINK")]
    pub symlink: Option<PathBuf>,

    /// Release host, or a full base URL for mirrors
    #[arg(long, global = true, env = "VAULTUP_ARCHIVE_URL_ROOT")]
    pub archive_url_root: Option<String>,

    /// Install the enterprise distribution
    #[arg(long, global = true, env = "VAULTUP_ENTERPRISE")]
    pub enterprise: bool,

    /// Use the internal enterprise layout (implies --enterprise)
    #[arg(long, global = true, env = "VAULTUP_USE_INTERNAL_REPOS")]
    pub internal: bool,

    /// Do not verify downloads against pinned checksums
    #[arg(long, global = true, env = "VAULTUP_NO_VERIFY")]
    pub no_verify: bool,

    /// Replacement checksum table
    #[arg(long, global = true, env = "VAULTUP_CHECKSUMS")]
    pub checksums: Option<PathBuf>,

    /// Installation backend (binary or package)
    #[arg(long, global = true, env = "VAULTUP_METHOD")]
    pub method: Option<InstallMethod>,
}

impl SettingsArgs {
    /// Read the configuration file (if any) and apply the overrides.
    pub fn load(&self) -> Result<InstallerConfig> {
        let mut config = match &self.config {
            Some(path) => InstallerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => InstallerConfig::default(),
        };
        self.apply(&mut config);
        debug!(?config, "effective configuration");
        Ok(config)
    }

    pub fn apply(&self, config: &mut InstallerConfig) {
        if let Some(root) = &self.install_root {
            config.install.root.clone_from(root);
        }
        if let Some(symlink) = &self.symlink {
            config.install.symlink.clone_from(symlink);
        }
        if let Some(url) = &self.archive_url_root {
            config.vault.archive_url_root.clone_from(url);
        }
        if let Some(path) = &self.checksums {
            config.install.checksums = Some(path.clone());
        }
        if let Some(method) = self.method {
            config.install.method = method;
        }
        if self.enterprise || self.internal {
            config.vault.enterprise = true;
        }
        if self.internal {
            config.vault.use_internal_repos = true;
        }
        if self.no_verify {
            config.install.enforce_checksums = false;
        }
    }
}

/// Target platform; defaults to the host.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Target operating system
    #[arg(long)]
    pub os: Option<Os>,

    /// Target architecture, as reported by the machine (x86_64, aarch64, ...)
    #[arg(long)]
    pub arch: Option<String>,
}

impl TargetArgs {
    pub fn os(&self) -> Os {
        self.os.unwrap_or_else(Os::current)
    }

    pub fn raw_arch(&self) -> &str {
        self.arch.as_deref().unwrap_or(std::env::consts::ARCH)
    }

    pub fn platform(&self) -> Platform {
        Platform::new(self.os(), Arch::normalize(self.raw_arch()))
    }
}

/// The version named on the command line, or the configured one.
pub fn version_or_default(version: Option<&str>, config: &InstallerConfig) -> Version {
    version.map_or_else(|| config.vault.version.clone(), Version::from)
}
