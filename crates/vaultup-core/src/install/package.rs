//! System package manager backend.
//!
//! The package manager owns placement and linking; this backend only runs it
//! and locates the resulting executable on `PATH`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use vaultup_schema::{APP_NAME, Tier, Version};

use super::{InstallRequest, Installer, validate_version};
use crate::Reporter;
use crate::config::{InstallerConfig, PackageManager};
use crate::error::InstallError;
use crate::resolver::artifact_prefix;

pub struct PackageInstaller {
    manager: PackageManager,
    program: String,
    leading_args: Vec<String>,
    /// Removal carries no request, so the package name comes from here.
    removal_tier: Tier,
    search_path: Option<OsString>,
    reporter: Arc<dyn Reporter>,
}

impl PackageInstaller {
    /// `removal_tier` picks the package `ensure_removed` targets; installs
    /// follow the tier of each request.
    pub fn new(manager: PackageManager, removal_tier: Tier, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            manager,
            program: manager.program().to_string(),
            leading_args: Vec::new(),
            removal_tier,
            search_path: None,
            reporter,
        }
    }

    pub fn from_config(config: &InstallerConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self::new(
            config.install.package_manager,
            config.vault.tier(),
            reporter,
        )
    }

    /// Run `program leading_args...` in place of the manager's executable.
    pub fn with_command<I, S>(mut self, program: impl Into<String>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.into();
        self.leading_args = leading_args.into_iter().map(Into::into).collect();
        self
    }

    /// Look the executable up in `path` instead of the process `PATH`.
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    async fn run(&self, args: &[String]) -> Result<(), InstallError> {
        debug!(program = %self.program, ?args, "running package manager");
        self.reporter
            .info(&format!("{} {}", self.manager.program(), args.join(" ")));

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(args)
            .output()
            .await
            .map_err(|e| InstallError::Package(format!("failed to run {}: {e}", self.program)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(InstallError::Package(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    fn locate_executable(&self) -> Result<PathBuf, InstallError> {
        let found = match &self.search_path {
            Some(path) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                which::which_in(APP_NAME, Some(path), cwd)
            }
            None => which::which(APP_NAME),
        };
        found.map_err(|e| {
            InstallError::Package(format!("{APP_NAME} not found on PATH after install: {e}"))
        })
    }
}

#[async_trait]
impl Installer for PackageInstaller {
    async fn ensure_installed(&self, req: &InstallRequest) -> Result<PathBuf, InstallError> {
        validate_version(&req.version)?;

        let package = artifact_prefix(req.tier);
        let args = self.manager.install_args(&package, &req.version);
        self.run(&args).await?;

        let exe = self.locate_executable()?;
        info!(%package, version = %req.version, path = %exe.display(), "installed");
        self.reporter.done(&req.version, "installed");
        Ok(exe)
    }

    async fn ensure_removed(&self, version: &Version) -> Result<(), InstallError> {
        validate_version(version)?;

        let package = artifact_prefix(self.removal_tier);
        let args = self.manager.remove_args(&package, version);
        self.run(&args).await?;

        info!(%package, %version, "removed");
        self.reporter.removed(version);
        Ok(())
    }
}
