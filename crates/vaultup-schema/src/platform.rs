//! Operating systems, CPU architectures, and the platform pair they form.
//!
//! Release archives are published per `<os>_<arch>` pair using Go-style
//! tokens (`linux_amd64`, `darwin_arm64`, ...). Machines report their
//! architecture in a variety of spellings (`x86_64`, `aarch64`, `i686`), so
//! [`Arch::normalize`] folds those into the canonical release token.
//!
//! # Example
//!
//! ```
//! use vaultup_schema::{Arch, Os, Platform};
//!
//! let platform = Platform::new(Os::Linux, Arch::normalize("x86_64"));
//! assert_eq!(platform.to_string(), "linux_amd64");
//! ```

use serde::{Deserialize, Serialize};

/// Operating systems that release archives are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS.
    Darwin,
    /// `FreeBSD`.
    Freebsd,
    /// Linux.
    Linux,
    /// `NetBSD`.
    Netbsd,
    /// `OpenBSD`.
    Openbsd,
    /// Solaris / illumos.
    Solaris,
    /// Windows.
    Windows,
}

impl Os {
    /// Operating system of the running host.
    ///
    /// Hosts outside the supported set report [`Os::Linux`], the most common
    /// server target.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Self::Darwin,
            "freebsd" => Self::Freebsd,
            "netbsd" => Self::Netbsd,
            "openbsd" => Self::Openbsd,
            "solaris" | "illumos" => Self::Solaris,
            "windows" => Self::Windows,
            _ => Self::Linux,
        }
    }

    /// Release token for this operating system (e.g. `darwin`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Freebsd => "freebsd",
            Self::Linux => "linux",
            Self::Netbsd => "netbsd",
            Self::Openbsd => "openbsd",
            Self::Solaris => "solaris",
            Self::Windows => "windows",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an operating system name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operating system: {0}")]
pub struct UnknownOs(pub String);

impl std::str::FromStr for Os {
    type Err = UnknownOs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Ok(Self::Darwin),
            "freebsd" => Ok(Self::Freebsd),
            "linux" => Ok(Self::Linux),
            "netbsd" => Ok(Self::Netbsd),
            "openbsd" => Ok(Self::Openbsd),
            "solaris" | "illumos" => Ok(Self::Solaris),
            "windows" => Ok(Self::Windows),
            _ => Err(UnknownOs(s.to_string())),
        }
    }
}

/// CPU architecture in canonical release-token form.
///
/// Built with [`Arch::normalize`], which never fails: spellings outside the
/// mapping table are kept verbatim in [`Arch::Other`] so that a best-effort
/// artifact name can still be produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Arch {
    /// 64-bit x86 (`x86_64`, `amd64`).
    Amd64,
    /// 32-bit x86 (`i386`, `i686`, `x86`).
    I386,
    /// 32-bit ARM (`arm`, `armv6l`, `armv7l`).
    Arm,
    /// 64-bit ARM (`aarch64`, `arm64`).
    Arm64,
    /// An architecture outside the mapping table, kept as reported.
    Other(String),
}

impl Arch {
    /// Fold a raw machine-reported architecture into its canonical token.
    ///
    /// ```
    /// use vaultup_schema::Arch;
    ///
    /// assert_eq!(Arch::normalize("x86_64"), Arch::Amd64);
    /// assert_eq!(Arch::normalize("aarch64"), Arch::Arm64);
    /// assert_eq!(Arch::normalize("ppc64").as_str(), "ppc64");
    /// ```
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "x86_64" | "amd64" => Self::Amd64,
            "i386" | "i686" | "x86" | "386" => Self::I386,
            "aarch64" | "arm64" => Self::Arm64,
            "arm" | "armv6l" | "armv7l" => Self::Arm,
            other => Self::Other(other.to_string()),
        }
    }

    /// Architecture of the running host, normalized.
    pub fn current() -> Self {
        Self::normalize(std::env::consts::ARCH)
    }

    /// Release token used in artifact names and checksum keys.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Amd64 => "amd64",
            Self::I386 => "386",
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the raw value was found in the mapping table.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Arch {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<&str> for Arch {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.as_str().to_string()
    }
}

/// An (operating system, architecture) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Target operating system.
    pub os: Os,
    /// Target CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from an OS and an already-normalized architecture.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Platform of the running host.
    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_known_spellings() {
        assert_eq!(Arch::normalize("x86_64"), Arch::Amd64);
        assert_eq!(Arch::normalize("amd64"), Arch::Amd64);
        assert_eq!(Arch::normalize("i386"), Arch::I386);
        assert_eq!(Arch::normalize("i686"), Arch::I386);
        assert_eq!(Arch::normalize("aarch64"), Arch::Arm64);
        assert_eq!(Arch::normalize("armv7l"), Arch::Arm);
    }

    #[test]
    fn unknown_arch_passes_through() {
        let arch = Arch::normalize("ppc64");
        assert_eq!(arch, Arch::Other("ppc64".to_string()));
        assert_eq!(arch.as_str(), "ppc64");
        assert!(!arch.is_recognized());
    }

    #[test]
    fn i386_uses_go_token() {
        assert_eq!(Arch::I386.as_str(), "386");
    }

    #[test]
    fn os_parses_aliases() {
        assert_eq!("macos".parse::<Os>(), Ok(Os::Darwin));
        assert_eq!("Linux".parse::<Os>(), Ok(Os::Linux));
        assert!("plan9".parse::<Os>().is_err());
    }

    #[test]
    fn arch_serializes_as_token() {
        let json = serde_json::to_string(&Arch::normalize("x86_64")).unwrap();
        assert_eq!(json, "\"amd64\"");
        let back: Arch = serde_json::from_str("\"aarch64\"").unwrap();
        assert_eq!(back, Arch::Arm64);
    }

    #[test]
    fn platform_display() {
        let p = Platform::new(Os::Freebsd, Arch::Arm);
        assert_eq!(p.to_string(), "freebsd_arm");
    }
}
