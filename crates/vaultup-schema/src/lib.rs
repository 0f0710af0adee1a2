//! Shared types for vaultup.
//!
//! Everything here is plain data: the release [`Version`], the target
//! [`Platform`], the licensing [`Tier`], and the [`ArtifactDescriptor`] the
//! resolver produces from them. No I/O happens in this crate.

pub mod hash;
pub mod platform;
pub mod tier;
pub mod types;

// Re-exports
pub use hash::*;
pub use platform::*;
pub use tier::*;
pub use types::*;

/// Name of the managed application; also the executable and URL path segment.
pub const APP_NAME: &str = "vault";
