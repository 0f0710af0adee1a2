//! Installer configuration.
//!
//! Loaded from a `vaultup.toml` file; every key is optional and falls back to
//! the defaults below.
//!
//! ```toml
//! [vault]
//! version = "1.8.5"
//! enterprise = false
//! use_internal_repos = false
//! archive_url_root = "releases.hashicorp.com"
//!
//! [install]
//! method = "binary"
//! root = "/opt/vault"
//! symlink = "/usr/local/bin/vault"
//! enforce_checksums = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vaultup_schema::{Tier, Version};

use crate::checksums::ChecksumTable;
use crate::error::ConfigError;

/// Top-level configuration passed to the resolver and installers at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// What to install.
    pub vault: VaultSettings,
    /// Where and how to install it.
    pub install: InstallSettings,
}

/// The `[vault]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultSettings {
    /// Version installed when none is given on the command line.
    pub version: Version,
    /// Install the enterprise distribution.
    pub enterprise: bool,
    /// Fetch enterprise builds laid out for an internal mirror.
    pub use_internal_repos: bool,
    /// Host (or full base URL) serving release archives.
    pub archive_url_root: String,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            version: Version::new("1.8.5"),
            enterprise: false,
            use_internal_repos: false,
            archive_url_root: "releases.hashicorp.com".to_string(),
        }
    }
}

impl VaultSettings {
    /// Tier implied by the enterprise switches.
    pub fn tier(&self) -> Tier {
        Tier::from_flags(self.enterprise, self.use_internal_repos)
    }
}

/// The `[install]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSettings {
    /// Installation backend.
    pub method: InstallMethod,
    /// Directory holding one subdirectory per installed version.
    pub root: PathBuf,
    /// Stable link pointing at the active executable.
    pub symlink: PathBuf,
    /// Verify downloads against pinned checksums when one is known.
    pub enforce_checksums: bool,
    /// Replacement checksum table; the embedded one is used when unset.
    pub checksums: Option<PathBuf>,
    /// Package manager used by [`InstallMethod::Package`].
    pub package_manager: PackageManager,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            method: InstallMethod::Binary,
            root: PathBuf::from("/opt/vault"),
            symlink: PathBuf::from("/usr/local/bin/vault"),
            enforce_checksums: true,
            checksums: None,
            package_manager: PackageManager::Apt,
        }
    }
}

/// Installation backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    /// Download the release zip and unpack it under the install root.
    #[default]
    Binary,
    /// Delegate to the system package manager.
    Package,
}

impl std::str::FromStr for InstallMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "package" => Ok(Self::Package),
            _ => Err(format!("Unknown install method: {s}")),
        }
    }
}

/// System package managers the package backend knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// Debian / Ubuntu.
    #[default]
    Apt,
    /// Fedora / RHEL 8+.
    Dnf,
    /// RHEL / `CentOS` 7.
    Yum,
}

impl PackageManager {
    /// Executable to invoke.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }

    /// `package` pinned to `version` in the manager's own syntax.
    pub fn pinned(&self, package: &str, version: &Version) -> String {
        match self {
            Self::Apt => format!("{package}={version}"),
            Self::Dnf | Self::Yum => format!("{package}-{version}"),
        }
    }

    /// Arguments installing `package` at `version`.
    pub fn install_args(&self, package: &str, version: &Version) -> Vec<String> {
        vec![
            "install".to_string(),
            "-y".to_string(),
            self.pinned(package, version),
        ]
    }

    /// Arguments removing `package`, only if `version` is the one installed.
    pub fn remove_args(&self, package: &str, version: &Version) -> Vec<String> {
        vec![
            "remove".to_string(),
            "-y".to_string(),
            self.pinned(package, version),
        ]
    }
}

impl InstallerConfig {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The checksum table in effect: the configured replacement, or the embedded one.
    pub fn checksum_table(&self) -> Result<ChecksumTable, ConfigError> {
        match &self.install.checksums {
            Some(path) => ChecksumTable::load(path),
            None => ChecksumTable::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_release_layout() {
        let cfg = InstallerConfig::default();
        assert_eq!(cfg.vault.version, "1.8.5");
        assert_eq!(cfg.vault.archive_url_root, "releases.hashicorp.com");
        assert_eq!(cfg.vault.tier(), Tier::Community);
        assert_eq!(cfg.install.root, PathBuf::from("/opt/vault"));
        assert_eq!(cfg.install.symlink, PathBuf::from("/usr/local/bin/vault"));
        assert!(cfg.install.enforce_checksums);
        assert_eq!(cfg.install.method, InstallMethod::Binary);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: InstallerConfig = toml::from_str(
            r#"
            [vault]
            version = "0.9.1"
            enterprise = true
            use_internal_repos = true

            [install]
            root = "/srv/vault"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.vault.version, "0.9.1");
        assert_eq!(cfg.vault.tier(), Tier::EnterpriseInternal);
        assert_eq!(cfg.install.root, PathBuf::from("/srv/vault"));
        assert_eq!(cfg.install.symlink, PathBuf::from("/usr/local/bin/vault"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<InstallerConfig, _> = toml::from_str("[vault]\nversoin = \"1.0\"\n");
        assert!(res.is_err());
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vaultup.toml");
        std::fs::write(&path, "[install\n").unwrap();

        let err = InstallerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("vaultup.toml"));
    }

    #[test]
    fn package_manager_arguments() {
        let v = Version::new("1.8.5");
        assert_eq!(
            PackageManager::Apt.install_args("vault", &v),
            vec!["install", "-y", "vault=1.8.5"]
        );
        assert_eq!(
            PackageManager::Yum.install_args("vault-enterprise", &v),
            vec!["install", "-y", "vault-enterprise-1.8.5"]
        );
        assert_eq!(PackageManager::Dnf.program(), "dnf");
        assert_eq!(
            PackageManager::Apt.remove_args("vault", &v),
            vec!["remove", "-y", "vault=1.8.5"]
        );
        assert_eq!(
            PackageManager::Dnf.remove_args("vault-enterprise", &v),
            vec!["remove", "-y", "vault-enterprise-1.8.5"]
        );
    }

    #[test]
    fn missing_override_table_is_an_error() {
        let mut cfg = InstallerConfig::default();
        cfg.install.checksums = Some(PathBuf::from("/nonexistent/checksums.toml"));
        assert!(cfg.checksum_table().is_err());
        cfg.install.checksums = None;
        assert!(cfg.checksum_table().is_ok());
    }
}
