//! Installed-version store: placement, bin links, and purge.
//!
//! Every installed version lives in its own directory. The directory mtime is
//! the recency marker purge sorts by, so installing refreshes it even when the
//! version was already present.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::Layout;
use crate::Reporter;
use crate::io::extract::ExtractedPayload;
use crate::paths::version_dir_name;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} {value:?} cannot be used as a directory name: {reason}")]
    InvalidPathComponent {
        /// Which part of the install path: owner, repo, tag or file name.
        what: &'static str,
        value: String,
        reason: &'static str,
    },
}

type Result<T> = std::result::Result<T, StoreError>;

trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Paths produced by a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    /// `<root>/<owner>/<repo>@<tag>/<file>`
    pub binary: PathBuf,
    /// `<root>/bin/<file>`
    pub link: PathBuf,
}

/// Write `payload` into its version directory and republish the bin link.
///
/// On any failure every directory this call created is removed again; a
/// pre-existing version directory only loses the partially written file.
///
/// Tags containing `/` (legal on GitHub, e.g. `release/v1`) are rejected with
/// [`StoreError::InvalidPathComponent`] since each tag maps to one directory.
pub fn install_binary<R: Reporter + ?Sized>(
    layout: &Layout,
    owner: &str,
    repo: &str,
    tag: &str,
    payload: &ExtractedPayload,
    reporter: &R,
) -> Result<Installed> {
    validate_component("owner", owner)?;
    validate_component("repo", repo)?;
    validate_component("tag", tag)?;
    validate_component("file name", &payload.file_name)?;

    let dir = layout.version_dir(owner, repo, tag);
    let partial = dir.join(format!(".{}.partial", payload.file_name));
    let mut guard = RollbackGuard {
        version_dir: (!dir.is_dir()).then(|| dir.clone()),
        parents: [layout.root().to_path_buf(), layout.owner_dir(owner)]
            .into_iter()
            .filter(|p| !p.exists())
            .collect(),
        partial: partial.clone(),
        armed: true,
    };
    fs::create_dir_all(&dir).at(&dir)?;

    let binary = dir.join(&payload.file_name);
    reporter.installing(&payload.file_name, &binary);

    fs::copy(payload.content.path(), &partial).at(&partial)?;
    make_executable(&partial)?;
    fs::rename(&partial, &binary).at(&binary)?;
    touch_dir(&dir)?;

    let bin_dir = layout.bin_dir();
    if !bin_dir.exists() {
        guard.parents.push(bin_dir.clone());
    }
    fs::create_dir_all(&bin_dir).at(&bin_dir)?;
    let link = layout.link_path(&payload.file_name);
    let link_target = std::path::absolute(&binary).at(&binary)?;
    replace_symlink(&link_target, &link)?;

    guard.disarm();
    info!(binary = %binary.display(), link = %link.display(), "installed");
    Ok(Installed { binary, link })
}

/// Remove every installed version of `owner/repo` except the most recent.
///
/// Versions are ordered by directory mtime, newest first; equal mtimes fall
/// back to the directory name so the result is deterministic. Bin links that
/// pointed into a removed directory are deleted too. Returns the removed
/// version directories.
pub fn purge<R: Reporter + ?Sized>(
    layout: &Layout,
    owner: &str,
    repo: &str,
    reporter: &R,
) -> Result<Vec<PathBuf>> {
    validate_component("owner", owner)?;
    validate_component("repo", repo)?;

    let owner_dir = layout.owner_dir(owner);
    if !owner_dir.is_dir() {
        debug!(dir = %owner_dir.display(), "nothing installed for owner");
        return Ok(Vec::new());
    }

    let prefix = version_dir_name(repo, "");
    let mut versions = Vec::new();
    for entry in fs::read_dir(&owner_dir).at(&owner_dir)? {
        let entry = entry.at(&owner_dir)?;
        let path = entry.path();
        if !entry.file_type().at(&path)?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&prefix) {
            continue;
        }
        let modified = entry.metadata().at(&path)?.modified().at(&path)?;
        versions.push((modified, name, path));
    }

    if versions.len() <= 1 {
        return Ok(Vec::new());
    }

    versions.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    debug!(keep = %versions[0].2.display(), "newest version kept");

    let mut removed = Vec::with_capacity(versions.len() - 1);
    for (_, _, path) in versions.into_iter().skip(1) {
        fs::remove_dir_all(&path).at(&path)?;
        info!(dir = %path.display(), "purged");
        reporter.removed(&path);
        removed.push(path);
    }

    remove_dangling_links(layout, &removed, reporter)?;
    Ok(removed)
}

/// Undoes a failed install unless disarmed: removes the partial file, the
/// version directory if it was created, then any other created directories.
struct RollbackGuard {
    version_dir: Option<PathBuf>,
    /// Root, owner and bin directories created by this install, in creation order.
    parents: Vec<PathBuf>,
    partial: PathBuf,
    armed: bool,
}

impl RollbackGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let result = match &self.version_dir {
            Some(dir) => fs::remove_dir_all(dir),
            None if self.partial.exists() => fs::remove_file(&self.partial),
            None => Ok(()),
        };
        if let Err(e) = result {
            warn!("rollback failed: {e}");
        }
        // Created parents hold nothing but what this install put there
        for dir in self.parents.iter().rev() {
            if let Err(e) = fs::remove_dir(dir) {
                warn!(dir = %dir.display(), "rollback failed: {e}");
            }
        }
    }
}

fn validate_component(what: &'static str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "it is empty"
    } else if value == "." || value == ".." {
        "it is a relative path component"
    } else if value.contains(['/', '\\']) {
        "it contains a path separator"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidPathComponent {
        what,
        value: value.to_string(),
        reason,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).at(path)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn touch_dir(dir: &Path) -> Result<()> {
    let handle = fs::File::open(dir).at(dir)?;
    handle.set_modified(SystemTime::now()).at(dir)
}

#[cfg(windows)]
fn touch_dir(dir: &Path) -> Result<()> {
    use std::os::windows::fs::OpenOptionsExt;
    // FILE_FLAG_BACKUP_SEMANTICS: required to open a directory handle
    let handle = fs::OpenOptions::new()
        .write(true)
        .custom_flags(0x0200_0000)
        .open(dir)
        .at(dir)?;
    handle.set_modified(SystemTime::now()).at(dir)
}

fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link).at(link)?;
    }
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).at(link)?;
    #[cfg(windows)]
    std::os::windows::fs::symlink_file(target, link).at(link)?;
    Ok(())
}

fn remove_dangling_links<R: Reporter + ?Sized>(
    layout: &Layout,
    removed: &[PathBuf],
    reporter: &R,
) -> Result<()> {
    let bin_dir = layout.bin_dir();
    if !bin_dir.is_dir() {
        return Ok(());
    }
    let removed: Vec<PathBuf> = removed
        .iter()
        .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
        .collect();

    for entry in fs::read_dir(&bin_dir).at(&bin_dir)? {
        let entry = entry.at(&bin_dir)?;
        let path = entry.path();
        let Ok(target) = fs::read_link(&path) else {
            continue;
        };
        if removed.iter().any(|dir| target.starts_with(dir)) {
            fs::remove_file(&path).at(&path)?;
            debug!(link = %path.display(), "removed dangling link");
            reporter.removed(&path);
        }
    }
    Ok(())
}
