//! Release-archive backend.
//!
//! Layout on disk:
//!
//! ```text
//! <root>/<version>/vault
//! <symlink> -> <root>/<version>/vault
//! ```
//!
//! The presence of `<root>/<version>/vault` is the only installed-state
//! signal. When it exists nothing is downloaded or re-verified.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use vaultup_schema::{APP_NAME, ArtifactDescriptor, Os, Version};

use super::{InstallRequest, Installer, link, validate_version};
use crate::Reporter;
use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::io::download::{DownloadError, DownloadRequest};
use crate::io::extract::unpack_release;
use crate::resolver::Resolver;

pub struct BinaryInstaller {
    resolver: Resolver,
    root: PathBuf,
    symlink: PathBuf,
    client: Client,
    reporter: Arc<dyn Reporter>,
}

impl BinaryInstaller {
    pub fn new(
        resolver: Resolver,
        root: impl Into<PathBuf>,
        symlink: impl Into<PathBuf>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            resolver,
            root: root.into(),
            symlink: symlink.into(),
            client: Client::new(),
            reporter,
        }
    }

    /// Build from configuration, loading the effective checksum table.
    pub fn from_config(
        config: &InstallerConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, InstallError> {
        let resolver = Resolver::new(
            config.vault.archive_url_root.clone(),
            config.checksum_table()?,
        );
        Ok(Self::new(
            resolver,
            config.install.root.clone(),
            config.install.symlink.clone(),
            reporter,
        ))
    }

    pub fn version_dir(&self, version: &Version) -> PathBuf {
        self.root.join(version.as_str())
    }

    /// Where the executable for `version` lives once installed.
    pub fn executable_path(&self, version: &Version, os: Os) -> PathBuf {
        self.version_dir(version).join(executable_name(os))
    }

    async fn fetch(
        &self,
        req: &InstallRequest,
        descriptor: &ArtifactDescriptor,
        version_dir: &Path,
        executable: &str,
    ) -> Result<(), InstallError> {
        tokio::fs::create_dir_all(version_dir)
            .await
            .map_err(|e| InstallError::io(version_dir, e))?;

        let result = self
            .download_and_unpack(req, descriptor, version_dir, executable)
            .await;

        if result.is_err() {
            debug!(dir = %version_dir.display(), "discarding partial install");
            if let Err(e) = tokio::fs::remove_dir_all(version_dir).await {
                warn!(dir = %version_dir.display(), error = %e, "failed to clean up");
            }
        }

        result
    }

    async fn download_and_unpack(
        &self,
        req: &InstallRequest,
        descriptor: &ArtifactDescriptor,
        version_dir: &Path,
        executable: &str,
    ) -> Result<(), InstallError> {
        let archive = tempfile::Builder::new()
            .prefix(".vaultup-")
            .suffix(".zip")
            .tempfile_in(&self.root)
            .map_err(|e| InstallError::io(&self.root, e))?;

        let expected = match (&descriptor.checksum, req.enforce_checksum) {
            (Some(digest), true) => Some(digest),
            (Some(_), false) => {
                info!("checksum enforcement disabled, skipping verification");
                self.reporter
                    .info("checksum enforcement disabled, archive not verified");
                None
            }
            (None, _) => None,
        };

        info!(url = %descriptor.url, "downloading");
        let mut download = DownloadRequest::new(
            &self.client,
            &req.version,
            &descriptor.url,
            archive.path(),
            self.reporter.as_ref(),
        );
        if let Some(digest) = expected {
            download = download.verify_against(digest);
        }

        let sha = download.execute().await.map_err(|e| match e {
            DownloadError::HashMismatch { expected, actual } => InstallError::Integrity {
                url: descriptor.url.clone(),
                expected,
                actual,
            },
            source => InstallError::Retrieval {
                url: descriptor.url.clone(),
                source,
            },
        })?;
        info!(sha256 = %sha, "download complete");

        self.reporter.extracting(&req.version);
        unpack_release(
            archive.path().to_path_buf(),
            version_dir.to_path_buf(),
            executable.to_string(),
        )
        .await
        .map_err(|source| InstallError::Extract {
            archive: descriptor.filename.clone(),
            source,
        })?;
        debug!(dir = %version_dir.display(), "extracted");

        Ok(())
    }
}

#[async_trait]
impl Installer for BinaryInstaller {
    async fn ensure_installed(&self, req: &InstallRequest) -> Result<PathBuf, InstallError> {
        validate_version(&req.version)?;

        let descriptor = self
            .resolver
            .resolve_platform(&req.version, &req.platform, req.tier);
        for warning in &descriptor.warnings {
            warn!(%warning, "resolution warning");
            self.reporter.warning(&warning.to_string());
        }

        // Refuse early rather than after a download that could never be linked.
        link::ensure_link_slot(&self.symlink)?;

        let exe = self.executable_path(&req.version, req.platform.os);
        let present = tokio::fs::try_exists(&exe)
            .await
            .map_err(|e| InstallError::io(&exe, e))?;
        if present {
            info!(version = %req.version, "already installed, skipping download");
            self.reporter
                .info(&format!("{} already present", exe.display()));
        } else {
            let version_dir = self.version_dir(&req.version);
            let executable = executable_name(req.platform.os);
            self.fetch(req, &descriptor, &version_dir, executable).await?;
        }

        let exe = std::path::absolute(&exe).map_err(|e| InstallError::io(&exe, e))?;
        if link::point_symlink(&self.symlink, &exe)? {
            info!(link = %self.symlink.display(), target = %exe.display(), "relinked");
            self.reporter.linked(&self.symlink, &exe);
        }

        self.reporter.done(
            &req.version,
            if present { "already installed" } else { "installed" },
        );
        Ok(exe)
    }

    async fn ensure_removed(&self, version: &Version) -> Result<(), InstallError> {
        validate_version(version)?;

        // Nothing is deleted if the link path is occupied by something foreign.
        link::ensure_link_slot(&self.symlink)?;

        let version_dir = self.version_dir(version);
        let present = tokio::fs::try_exists(&version_dir)
            .await
            .map_err(|e| InstallError::io(&version_dir, e))?;
        if present {
            tokio::fs::remove_dir_all(&version_dir)
                .await
                .map_err(|e| InstallError::io(&version_dir, e))?;
            info!(dir = %version_dir.display(), "removed version directory");
        } else {
            debug!(dir = %version_dir.display(), "version directory absent");
        }

        if link::remove_symlink(&self.symlink)? {
            info!(link = %self.symlink.display(), "removed link");
        }

        self.reporter.removed(version);
        Ok(())
    }
}

/// Name of the executable inside a release archive.
pub fn executable_name(os: Os) -> &'static str {
    match os {
        Os::Windows => "vault.exe",
        _ => APP_NAME,
    }
}
