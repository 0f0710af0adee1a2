pub mod checksums;
pub mod config;
pub mod error;
pub mod install;
pub mod io;
pub mod resolver;

pub mod reporter;

pub use checksums::ChecksumTable;
pub use config::{InstallMethod, InstallerConfig, PackageManager};
pub use error::{ConfigError, InstallError};
pub use install::{BinaryInstaller, InstallRequest, Installer, PackageInstaller, installer_for};
pub use reporter::{NullReporter, Reporter};
pub use resolver::Resolver;

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("vaultup/", env!("CARGO_PKG_VERSION"));
