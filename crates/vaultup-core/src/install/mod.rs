//! Installation backends.
//!
//! Every backend exposes the same two idempotent operations through
//! [`Installer`]; which one runs is chosen by [`InstallMethod`].

pub mod binary;
pub mod link;
pub mod package;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use vaultup_schema::{Platform, Tier, Version};

pub use binary::BinaryInstaller;
pub use package::PackageInstaller;

use crate::Reporter;
use crate::config::{InstallMethod, InstallerConfig};
use crate::error::InstallError;

/// One install invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: Version,
    pub platform: Platform,
    pub tier: Tier,
    /// Verify the archive when a pinned checksum exists.
    pub enforce_checksum: bool,
}

impl InstallRequest {
    /// A community install with checksum enforcement on.
    pub fn new(version: Version, platform: Platform) -> Self {
        Self {
            version,
            platform,
            tier: Tier::Community,
            enforce_checksum: true,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn enforce_checksum(mut self, enforce: bool) -> Self {
        self.enforce_checksum = enforce;
        self
    }

    /// Request for `version` on `platform`, with tier and enforcement taken from `config`.
    pub fn from_config(config: &InstallerConfig, version: Version, platform: Platform) -> Self {
        Self::new(version, platform)
            .with_tier(config.vault.tier())
            .enforce_checksum(config.install.enforce_checksums)
    }
}

/// Converges the host towards "version installed" or "version absent".
///
/// Both operations are re-entrant: running one twice leaves the same state
/// as running it once. Implementations hold no locks, so callers need
/// external serialization for invocations sharing an installation root.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Make sure `req.version` is installed and active, returning the
    /// absolute path of the executable.
    async fn ensure_installed(&self, req: &InstallRequest) -> Result<PathBuf, InstallError>;

    /// Make sure `version` is no longer installed.
    async fn ensure_removed(&self, version: &Version) -> Result<(), InstallError>;
}

/// Build the backend selected by `config.install.method`.
pub fn installer_for(
    config: &InstallerConfig,
    reporter: Arc<dyn Reporter>,
) -> Result<Box<dyn Installer>, InstallError> {
    let installer: Box<dyn Installer> = match config.install.method {
        InstallMethod::Binary => Box::new(BinaryInstaller::from_config(config, reporter)?),
        InstallMethod::Package => Box::new(PackageInstaller::from_config(config, reporter)),
    };
    Ok(installer)
}

/// Reject versions that cannot safely name a directory.
pub(crate) fn validate_version(version: &Version) -> Result<(), InstallError> {
    if version.is_path_safe() {
        Ok(())
    } else {
        Err(InstallError::InvalidVersion(version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultup_schema::{Arch, Os};

    #[test]
    fn request_from_config() {
        let mut cfg = InstallerConfig::default();
        cfg.vault.enterprise = true;
        cfg.install.enforce_checksums = false;

        let req = InstallRequest::from_config(
            &cfg,
            Version::new("0.9.1"),
            Platform::new(Os::Linux, Arch::Amd64),
        );
        assert_eq!(req.tier, Tier::EnterprisePublic);
        assert!(!req.enforce_checksum);
    }

    #[test]
    fn rejects_unsafe_versions() {
        assert!(validate_version(&Version::new("0.9.1")).is_ok());
        assert!(matches!(
            validate_version(&Version::new("../../etc")),
            Err(InstallError::InvalidVersion(v)) if v == "../../etc"
        ));
    }

    #[test]
    fn factory_picks_backend() {
        let reporter: Arc<dyn Reporter> = Arc::new(crate::NullReporter);
        let mut cfg = InstallerConfig::default();
        assert!(installer_for(&cfg, reporter.clone()).is_ok());

        cfg.install.method = InstallMethod::Package;
        assert!(installer_for(&cfg, reporter).is_ok());
    }
}
