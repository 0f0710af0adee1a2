//! Version identifiers and the artifact descriptor produced by resolution.

use serde::{Deserialize, Serialize};

use crate::hash::Sha256Digest;
use crate::tier::Tier;

/// An opaque release version string (e.g. `0.9.1`).
///
/// Versions are only ever compared for equality; no ordering is defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Create a new version from the given string (stored as-is).
    pub fn new(v: &str) -> Self {
        Self(v.to_string())
    }

    /// Return the version string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the version can be used as a single directory name.
    ///
    /// Rejects empty strings, `.`/`..`, and anything containing a path
    /// separator or NUL byte.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && !self.0.contains(['/', '\\', '\0'])
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for Version {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for Version {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Non-fatal conditions noticed while resolving an artifact.
///
/// Resolution carries on in both cases; callers log these and proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// The machine architecture is not in the mapping table and was used verbatim.
    UnrecognizedArch {
        /// Architecture as reported by the caller.
        raw: String,
    },
    /// No pinned checksum exists, so the download cannot be verified.
    NoChecksum {
        /// `<os>_<arch>` key that was looked up.
        platform: String,
        /// Version that was looked up.
        version: Version,
        /// Tier of the request (enterprise tiers never carry checksums).
        tier: Tier,
    },
}

impl std::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedArch { raw } => {
                write!(f, "unrecognized architecture '{raw}', using it verbatim")
            }
            Self::NoChecksum {
                platform,
                version,
                tier,
            } => write!(
                f,
                "no checksum pinned for {version} on {platform} ({tier}); integrity will not be verified"
            ),
        }
    }
}

/// Everything needed to fetch one release archive.
///
/// Fully derived from (version, platform, tier); resolving the same inputs
/// twice yields equal descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Archive filename (e.g. `vault_0.9.1_linux_amd64.zip`).
    pub filename: String,
    /// Full download URL.
    pub url: String,
    /// Pinned SHA256 of the archive, if one is known.
    pub checksum: Option<Sha256Digest>,
    /// Non-fatal findings from resolution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ResolutionWarning>,
}
