//! Asset selection: pick the one release asset built for a platform.
//!
//! An asset is a candidate when its lowercased name mentions the OS, mentions
//! the architecture, and ends with a recognized archive extension. Among
//! candidates the shortest name wins, which drops companion files such as
//! `tool.tar.gz.sha256` or `tool.tar.gz.sbom.json`. Equal lengths keep the
//! first candidate in registry order.

use ghinst_schema::{Asset, Platform, PlatformError, is_archive_name};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error(transparent)]
    UnsupportedPlatform(#[from] PlatformError),

    #[error("no asset found for {platform}")]
    NoMatchingAsset {
        platform: Platform,
        /// Every asset name in the release, so the caller can show what was there.
        available: Vec<String>,
    },
}

/// Select the asset for `os`/`arch`, given as platform ids (`linux`, `darwin`,
/// `amd64`, `aarch64`, ...).
///
/// Unknown ids fail with [`SelectError::UnsupportedPlatform`] before the asset
/// list is looked at.
pub fn select_asset<'a>(assets: &'a [Asset], os: &str, arch: &str) -> Result<&'a Asset, SelectError> {
    let platform = Platform::from_ids(os, arch)?;
    select_for_platform(assets, platform)
}

/// Select the asset for an already-validated [`Platform`].
pub fn select_for_platform(assets: &[Asset], platform: Platform) -> Result<&Asset, SelectError> {
    let chosen = assets
        .iter()
        .filter(|a| is_candidate(&a.name, platform))
        .min_by_key(|a| a.name.len());

    match chosen {
        Some(asset) => {
            debug!(asset = %asset.name, %platform, "selected asset");
            Ok(asset)
        }
        None => Err(SelectError::NoMatchingAsset {
            platform,
            available: assets.iter().map(|a| a.name.clone()).collect(),
        }),
    }
}

fn is_candidate(name: &str, platform: Platform) -> bool {
    platform.matches(name) && is_archive_name(name)
}
