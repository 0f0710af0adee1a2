//! Reporter trait for dependency injection
//!
//! Installers report progress through this trait so the core stays free of
//! any terminal handling.

use vaultup_schema::Version;

pub trait Reporter: Send + Sync {
    /// Download progress; `total` is unknown when the server omits a length.
    fn downloading(&self, version: &Version, current: u64, total: Option<u64>);

    /// Archive unpacking has started.
    fn extracting(&self, version: &Version);

    /// The stable link now points at `target`.
    fn linked(&self, link: &std::path::Path, target: &std::path::Path);

    /// A version (and its link) were removed.
    fn removed(&self, version: &Version);

    /// An operation on `version` finished; `detail` says what happened.
    fn done(&self, version: &Version, detail: &str);

    fn warning(&self, msg: &str);

    fn info(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn downloading(&self, version: &Version, current: u64, total: Option<u64>) {
        (**self).downloading(version, current, total)
    }
    fn extracting(&self, version: &Version) {
        (**self).extracting(version)
    }
    fn linked(&self, link: &std::path::Path, target: &std::path::Path) {
        (**self).linked(link, target)
    }
    fn removed(&self, version: &Version) {
        (**self).removed(version)
    }
    fn done(&self, version: &Version, detail: &str) {
        (**self).done(version, detail)
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg)
    }
    fn info(&self, msg: &str) {
        (**self).info(msg)
    }
}

/// A reporter that does nothing (useful for tests)
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn downloading(&self, _: &Version, _: u64, _: Option<u64>) {}
    fn extracting(&self, _: &Version) {}
    fn linked(&self, _: &std::path::Path, _: &std::path::Path) {}
    fn removed(&self, _: &Version) {}
    fn done(&self, _: &Version, _: &str) {}
    fn warning(&self, _: &str) {}
    fn info(&self, _: &str) {}
}
