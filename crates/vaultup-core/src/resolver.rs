//! Artifact resolution: (version, platform, tier) -> filename, URL, checksum.
//!
//! Pure and infallible. Unknown architectures and missing checksums are
//! reported as [`ResolutionWarning`]s on the descriptor and never stop
//! resolution; whether they matter is the installer's decision.

use std::sync::Arc;

use vaultup_schema::{
    APP_NAME, Arch, ArtifactDescriptor, Os, Platform, ResolutionWarning, Tier, Version,
};

use crate::checksums::ChecksumTable;

/// Maps release coordinates onto archive names, URLs and pinned checksums.
#[derive(Debug, Clone)]
pub struct Resolver {
    archive_url_root: String,
    checksums: Arc<ChecksumTable>,
}

impl Resolver {
    /// Create a resolver for the given release host and checksum table.
    ///
    /// `archive_url_root` is normally a bare host (`releases.hashicorp.com`),
    /// which is served over HTTPS. A value that already names a scheme
    /// (`http://mirror.local:8080`) is used as the base URL verbatim.
    pub fn new(archive_url_root: impl Into<String>, checksums: ChecksumTable) -> Self {
        Self {
            archive_url_root: archive_url_root.into(),
            checksums: Arc::new(checksums),
        }
    }

    /// Resolve from a raw machine-reported architecture.
    pub fn resolve(
        &self,
        version: &Version,
        os: Os,
        raw_arch: &str,
        tier: Tier,
    ) -> ArtifactDescriptor {
        self.resolve_platform(version, &Platform::new(os, Arch::normalize(raw_arch)), tier)
    }

    /// Resolve for an already-normalized platform.
    pub fn resolve_platform(
        &self,
        version: &Version,
        platform: &Platform,
        tier: Tier,
    ) -> ArtifactDescriptor {
        let mut warnings = Vec::new();

        if !platform.arch.is_recognized() {
            warnings.push(ResolutionWarning::UnrecognizedArch {
                raw: platform.arch.to_string(),
            });
        }

        let filename = artifact_filename(version, platform, tier);
        let url = format!(
            "{base}/{APP_NAME}/{version}{terminal}/{filename}",
            base = self.base_url(),
            terminal = tier.url_terminal(),
        );

        let checksum = if tier.is_enterprise() {
            None
        } else {
            self.checksums
                .get(platform.os, &platform.arch, version)
                .cloned()
        };

        if checksum.is_none() {
            warnings.push(ResolutionWarning::NoChecksum {
                platform: platform.to_string(),
                version: version.clone(),
                tier,
            });
        }

        ArtifactDescriptor {
            filename,
            url,
            checksum,
            warnings,
        }
    }

    fn base_url(&self) -> String {
        let root = self.archive_url_root.trim_end_matches('/');
        if root.contains("://") {
            root.to_string()
        } else {
            format!("https://{root}")
        }
    }
}

/// Filename prefix for a tier: `vault` or `vault-enterprise`.
pub fn artifact_prefix(tier: Tier) -> String {
    if tier.is_enterprise() {
        format!("{APP_NAME}-enterprise")
    } else {
        APP_NAME.to_string()
    }
}

/// Version token embedded in the filename (`0.9.1`, `0.9.1%2bent`, `0.9.1%2bprem`).
pub fn version_token(version: &Version, tier: Tier) -> String {
    format!("{version}{}", tier.version_suffix())
}

/// `<prefix>_<version token>_<os>_<arch>.zip`
pub fn artifact_filename(version: &Version, platform: &Platform, tier: Tier) -> String {
    format!(
        "{}_{}_{}_{}.zip",
        artifact_prefix(tier),
        version_token(version, tier),
        platform.os,
        platform.arch,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(
            "releases.hashicorp.com",
            ChecksumTable::builtin().unwrap(),
        )
    }

    #[test]
    fn community_linux_amd64() {
        let d = resolver().resolve(&Version::new("0.9.1"), Os::Linux, "x86_64", Tier::Community);

        assert_eq!(d.filename, "vault_0.9.1_linux_amd64.zip");
        assert_eq!(
            d.url,
            "https://releases.hashicorp.com/vault/0.9.1/vault_0.9.1_linux_amd64.zip"
        );
        assert_eq!(
            d.checksum.as_ref().map(|c| c.as_str()),
            Some("6308013ee0d6278e98cdfe8d6de0162102a8d25f3bcd1e3737bf7b022a9f6702")
        );
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn every_pinned_community_entry_resolves_to_its_digest() {
        let r = resolver();
        let table = ChecksumTable::builtin().unwrap();

        for (os, arch, version, digest) in table.iter() {
            let os: Os = os.parse().unwrap();
            let d = r.resolve(&Version::new(version), os, arch, Tier::Community);
            assert_eq!(d.checksum.as_ref(), Some(digest), "{os} {arch} {version}");
        }
    }

    #[test]
    fn raw_i386_hits_386_table() {
        let d = resolver().resolve(&Version::new("0.8.3"), Os::Windows, "i386", Tier::Community);
        assert_eq!(d.filename, "vault_0.8.3_windows_386.zip");
        assert_eq!(
            d.checksum.unwrap().as_str(),
            "1fb1d837a085e1feceae00753b496735db746674ad3c55938f50545d1607dc32"
        );
    }

    #[test]
    fn enterprise_internal_naming() {
        let d = resolver().resolve(
            &Version::new("0.9.1"),
            Os::Linux,
            "amd64",
            Tier::EnterpriseInternal,
        );

        assert_eq!(d.filename, "vault-enterprise_0.9.1%2bprem_linux_amd64.zip");
        // The internal layout keeps the bare version directory.
        assert_eq!(
            d.url,
            "https://releases.hashicorp.com/vault/0.9.1/vault-enterprise_0.9.1%2bprem_linux_amd64.zip"
        );
        assert!(d.checksum.is_none());
    }

    #[test]
    fn enterprise_public_repeats_marker_in_path() {
        let d = resolver().resolve(
            &Version::new("0.9.1"),
            Os::Darwin,
            "arm64",
            Tier::EnterprisePublic,
        );

        assert_eq!(d.filename, "vault-enterprise_0.9.1%2bent_darwin_arm64.zip");
        assert_eq!(
            d.url,
            "https://releases.hashicorp.com/vault/0.9.1%2bent/vault-enterprise_0.9.1%2bent_darwin_arm64.zip"
        );
    }

    #[test]
    fn enterprise_never_carries_checksum() {
        // A community digest exists for this key but must not leak into enterprise.
        let d = resolver().resolve(
            &Version::new("0.9.1"),
            Os::Linux,
            "x86_64",
            Tier::EnterprisePublic,
        );
        assert!(d.checksum.is_none());
        assert!(matches!(
            d.warnings.as_slice(),
            [ResolutionWarning::NoChecksum {
                tier: Tier::EnterprisePublic,
                ..
            }]
        ));
    }

    #[test]
    fn unknown_arch_is_best_effort() {
        let d = resolver().resolve(&Version::new("0.9.1"), Os::Linux, "ppc64", Tier::Community);

        assert_eq!(d.filename, "vault_0.9.1_linux_ppc64.zip");
        assert!(d.checksum.is_none());
        assert_eq!(d.warnings.len(), 2);
        assert_eq!(
            d.warnings[0],
            ResolutionWarning::UnrecognizedArch {
                raw: "ppc64".to_string()
            }
        );
    }

    #[test]
    fn unknown_version_has_no_checksum() {
        let d = resolver().resolve(&Version::new("1.8.5"), Os::Linux, "x86_64", Tier::Community);
        assert!(d.checksum.is_none());
        assert_eq!(d.filename, "vault_1.8.5_linux_amd64.zip");
    }

    #[test]
    fn resolution_is_referentially_stable() {
        let r = resolver();
        let v = Version::new("0.7.2");
        let a = r.resolve(&v, Os::Freebsd, "arm", Tier::Community);
        let b = r.resolve(&v, Os::Freebsd, "arm", Tier::Community);
        assert_eq!(a, b);
    }

    #[test]
    fn scheme_in_root_is_kept() {
        let r = Resolver::new("http://127.0.0.1:8080/", ChecksumTable::default());
        let d = r.resolve(&Version::new("1.0.0"), Os::Linux, "amd64", Tier::Community);
        assert_eq!(
            d.url,
            "http://127.0.0.1:8080/vault/1.0.0/vault_1.0.0_linux_amd64.zip"
        );
    }
}
