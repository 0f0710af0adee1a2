//! Pinned archive checksums, loaded from a TOML data asset.
//!
//! The table is keyed by `(os, arch, version)` only. Enterprise archives are
//! never pinned and the resolver never consults the table for them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vaultup_schema::{Arch, Os, Sha256Digest, Version};

use crate::error::ConfigError;

/// Checksum asset compiled into the binary.
const BUILTIN: &str = include_str!("../data/checksums.toml");

/// `os token -> arch token -> version -> digest`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecksumTable(BTreeMap<String, BTreeMap<String, BTreeMap<String, Sha256Digest>>>);

impl ChecksumTable {
    /// The table shipped with this build.
    pub fn builtin() -> Result<Self, ConfigError> {
        toml::from_str(BUILTIN).map_err(ConfigError::BuiltinChecksums)
    }

    /// Load a replacement table from disk.
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

    /// Look up the pinned digest for one archive.
    pub fn get(&self, os: Os, arch: &Arch, version: &Version) -> Option<&Sha256Digest> {
        self.0
            .get(os.as_str())?
            .get(arch.as_str())?
            .get(version.as_str())
    }

    /// Pin a digest, replacing any previous entry for the same key.
    pub fn insert(&mut self, os: Os, arch: &Arch, version: &Version, digest: Sha256Digest) {
        self.0
            .entry(os.to_string())
            .or_default()
            .entry(arch.as_str().to_string())
            .or_default()
            .insert(version.to_string(), digest);
    }

    /// Iterate every entry as `(os, arch token, version, digest)`, sorted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, &Sha256Digest)> {
        self.0.iter().flat_map(|(os, archs)| {
            archs.iter().flat_map(move |(arch, versions)| {
                versions.iter().map(move |(version, digest)| {
                    (os.as_str(), arch.as_str(), version.as_str(), digest)
                })
            })
        })
    }

    /// Number of pinned digests.
    pub fn len(&self) -> usize {
        self.0
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    /// Whether no digests are pinned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
