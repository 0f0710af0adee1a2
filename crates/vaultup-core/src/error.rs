//! Domain-specific errors for installation operations

use std::path::PathBuf;

use thiserror::Error;

use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;

/// Failure of an install or remove operation.
///
/// Nothing is retried internally; every variant is surfaced to the caller
/// as-is.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The archive could not be fetched or written to disk.
    #[error("Failed to retrieve {url}: {source}")]
    Retrieval {
        url: String,
        #[source]
        source: DownloadError,
    },

    /// The downloaded archive did not match its pinned checksum.
    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    /// Something other than a symbolic link occupies the stable link path.
    #[error("Refusing to touch {}: it exists and is not a symbolic link", path.display())]
    StateConflict { path: PathBuf },

    /// The archive could not be unpacked.
    #[error("Failed to extract {archive}: {source}")]
    Extract {
        archive: String,
        #[source]
        source: ExtractError,
    },

    /// The version cannot be used as a directory name.
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// The system package manager reported a failure.
    #[error("Package manager failed: {0}")]
    Package(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InstallError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to load configuration or a checksum table.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Embedded checksum table is invalid: {0}")]
    BuiltinChecksums(#[source] toml::de::Error),
}
