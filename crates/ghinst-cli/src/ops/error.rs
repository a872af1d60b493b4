//! Domain-specific errors for install and purge

use ghinst_core::io::download::DownloadError;
use ghinst_core::io::extract::ExtractError;
use ghinst_core::registry::RegistryError;
use ghinst_core::select::SelectError;
use ghinst_core::store::StoreError;
use ghinst_schema::TargetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("Release lookup failed: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Install failed: {0}")]
    Store(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{context}: {message}")]
    Context {
        context: &'static str,
        message: String,
    },
}

impl InstallError {
    /// Create an error with context for better debugging.
    pub fn context(ctx: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Context {
            context: ctx,
            message: msg.to_string(),
        }
    }

    /// Asset names to show the user when nothing matched this platform.
    pub fn available_assets(&self) -> Option<&[String]> {
        match self {
            Self::Select(SelectError::NoMatchingAsset { available, .. }) => Some(available),
            _ => None,
        }
    }
}
