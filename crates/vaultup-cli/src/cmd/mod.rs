//! Command implementations

pub mod checksums;
pub mod install;
pub mod remove;
pub mod resolve;
