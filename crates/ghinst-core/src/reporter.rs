//! Reporter trait for dependency injection
//!
//! This trait allows core logic to report progress and status without
//! being coupled to a specific terminal implementation.

use std::path::Path;

pub trait Reporter: Send + Sync {
    /// Indicates a new phase has started (e.g. "Resolving", "Installing").
    fn section(&self, title: &str);

    /// Updates the progress of a download.
    fn downloading(&self, name: &str, current: u64, total: Option<u64>);

    /// Marks the start of payload extraction from an asset.
    fn extracting(&self, name: &str);

    /// Marks the start of writing a payload to its final location.
    fn installing(&self, name: &str, dest: &Path);

    /// Reports a path deleted by purge.
    fn removed(&self, path: &Path);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn downloading(&self, name: &str, current: u64, total: Option<u64>) {
        (**self).downloading(name, current, total);
    }
    fn extracting(&self, name: &str) {
        (**self).extracting(name);
    }
    fn installing(&self, name: &str, dest: &Path) {
        (**self).installing(name, dest);
    }
    fn removed(&self, path: &Path) {
        (**self).removed(path);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &str, _: u64, _: Option<u64>) {}
    fn extracting(&self, _: &str) {}
    fn installing(&self, _: &str, _: &Path) {}
    fn removed(&self, _: &Path) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
