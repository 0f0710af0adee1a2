//! Licensing tiers and the naming rules they imply.

use serde::{Deserialize, Serialize};

/// Licensing variant of the distribution being installed.
///
/// The tier decides the archive filename prefix and the marker appended to
/// the version token. It never takes part in checksum lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Open-source build.
    #[default]
    Community,
    /// Enterprise build from the public release host.
    EnterprisePublic,
    /// Enterprise build from an internal mirror.
    EnterpriseInternal,
}

impl Tier {
    /// Derive the tier from the two configuration switches.
    ///
    /// `use_internal_repos` only matters when `enterprise` is set.
    pub fn from_flags(enterprise: bool, use_internal_repos: bool) -> Self {
        match (enterprise, use_internal_repos) {
            (false, _) => Self::Community,
            (true, false) => Self::EnterprisePublic,
            (true, true) => Self::EnterpriseInternal,
        }
    }

    /// Whether this is one of the enterprise tiers.
    pub fn is_enterprise(&self) -> bool {
        !matches!(self, Self::Community)
    }

    /// URL-escaped marker appended to the version inside the filename.
    ///
    /// `%2b` is an escaped `+`.
    pub fn version_suffix(&self) -> &'static str {
        match self {
            Self::Community => "",
            Self::EnterprisePublic => "%2bent",
            Self::EnterpriseInternal => "%2bprem",
        }
    }

    /// Marker appended to the version directory segment of the download URL.
    ///
    /// Only the public enterprise tier repeats its marker here; the internal
    /// tier carries `+prem` in the filename alone. The two enterprise tiers
    /// are therefore laid out differently on the release host, and the
    /// difference is kept as-is.
    pub fn url_terminal(&self) -> &'static str {
        match self {
            Self::EnterprisePublic => "%2bent",
            Self::Community | Self::EnterpriseInternal => "",
        }
    }

    /// Canonical kebab-case name (`community`, `enterprise-public`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::EnterprisePublic => "enterprise-public",
            Self::EnterpriseInternal => "enterprise-internal",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
