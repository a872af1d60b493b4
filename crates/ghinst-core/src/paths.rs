use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Default install root (`~/.ghinst`), or None if the user's home cannot be resolved.
pub fn try_default_root() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".ghinst"))
}

/// On-disk layout under an install root.
///
/// ```text
/// <root>/
/// ├── bin/                 # Symlinks to installed executables
/// └── <owner>/
///     └── <repo>@<tag>/    # One directory per installed version
///         └── <binary>
/// ```
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Symlink directory: `<root>/bin`
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// All versions of all repos of one owner: `<root>/<owner>`
    pub fn owner_dir(&self, owner: &str) -> PathBuf {
        self.root.join(owner)
    }

    /// One installed version: `<root>/<owner>/<repo>@<tag>`
    pub fn version_dir(&self, owner: &str, repo: &str, tag: &str) -> PathBuf {
        self.owner_dir(owner).join(version_dir_name(repo, tag))
    }

    /// Stable entry point for an executable: `<root>/bin/<name>`
    pub fn link_path(&self, file_name: &str) -> PathBuf {
        self.bin_dir().join(file_name)
    }
}

/// Directory name for one installed version of `repo`.
pub fn version_dir_name(repo: &str, tag: &str) -> String {
    format!("{repo}@{tag}")
}
