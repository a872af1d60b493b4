//! Shared types for ghinst.
//!
//! This crate is pure data: release metadata as decoded from the registry,
//! install targets, the platform alias table, and archive classification.
//! It performs no I/O.

pub mod archive;
pub mod platform;
pub mod target;
pub mod types;

// Re-exports
pub use archive::{ArchiveKind, is_archive_name};
pub use platform::{Arch, Os, Platform, PlatformError};
pub use target::{Target, TargetError};
pub use types::*;
