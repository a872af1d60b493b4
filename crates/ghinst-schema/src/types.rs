//! Release metadata decoded from the registry API.

use serde::{Deserialize, Serialize};

/// A published release as returned by the registry API.
///
/// Only the fields needed for installation are decoded; everything else in
/// the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version tag (e.g. `v1.2.3`). Opaque; never parsed.
    pub tag_name: String,

    /// Downloadable files attached to the release, in registry order.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A single downloadable file attached to a [`Release`].
///
/// `name` is untrusted free text and the only signal used for platform and
/// archive matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Display name of the file (e.g. `tool_linux_amd64.tar.gz`).
    pub name: String,

    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,

    /// Advertised size in bytes (0 when the registry omits it).
    #[serde(default)]
    pub size: u64,
}

impl Asset {
    /// Convenience constructor used by tests and fixtures.
    pub fn new(name: impl Into<String>, download_url: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            download_url: download_url.into(),
            size,
        }
    }
}
