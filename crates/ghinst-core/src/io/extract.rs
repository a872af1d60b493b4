//! Archive extraction module
//!
//! Locates the single executable inside a downloaded release asset. The
//! container format is decided by the asset name alone (see
//! [`ArchiveKind::from_name`]); content bytes are never sniffed and a failed
//! parse is never retried under another format.
//!
//! - tar (gz, bz2, xz): first regular file with any execute bit set.
//! - zip: first entry with an execute bit wins outright; otherwise the first
//!   entry whose base name has no extension.
//! - anything else: the asset is the executable, returned unchanged.

use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, Write};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use ghinst_schema::ArchiveKind;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use xz2::read::XzDecoder;
use zip::ZipArchive;

const EXEC_BITS: u32 = 0o111;
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot read asset as {kind}: {source}")]
    UnsupportedArchive {
        kind: ArchiveKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("no executable found in archive")]
    NoExecutableFound,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ExtractError {
    fn unsupported(kind: ArchiveKind, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::UnsupportedArchive {
            kind,
            source: source.into(),
        }
    }
}

/// The executable pulled out of an asset.
///
/// `content` is a scoped temporary file: it is deleted when the payload is
/// dropped, whether or not the install succeeded.
#[derive(Debug)]
pub struct ExtractedPayload {
    /// Base name of the executable (directory components stripped).
    pub file_name: String,
    /// Decompressed executable bytes, rewound to the start.
    pub content: NamedTempFile,
}

/// Extract the executable from an asset already saved at `path`.
pub fn extract_file(path: &Path, asset_name: &str) -> Result<ExtractedPayload, ExtractError> {
    extract_binary(File::open(path)?, asset_name)
}

/// Extract the executable from `reader`, dispatching on `asset_name`'s suffix.
pub fn extract_binary<R: Read + Seek>(
    mut reader: R,
    asset_name: &str,
) -> Result<ExtractedPayload, ExtractError> {
    let kind = ArchiveKind::from_name(asset_name);
    debug!(asset = asset_name, %kind, "extracting");

    match kind {
        ArchiveKind::TarGz => find_in_tar(MultiGzDecoder::new(BufReader::new(reader)), kind),
        ArchiveKind::TarBz2 => find_in_tar(BzDecoder::new(BufReader::new(reader)), kind),
        ArchiveKind::TarXz => find_in_tar(XzDecoder::new(BufReader::new(reader)), kind),
        ArchiveKind::Zip => find_in_zip(reader),
        ArchiveKind::Raw => {
            let mut content = NamedTempFile::new()?;
            io::copy(&mut reader, &mut content)?;
            content.rewind()?;
            Ok(ExtractedPayload {
                file_name: asset_name.to_string(),
                content,
            })
        }
    }
}

/// Returns the first executable regular file in a tar stream.
fn find_in_tar<R: Read>(reader: R, kind: ArchiveKind) -> Result<ExtractedPayload, ExtractError> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| ExtractError::unsupported(kind, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ExtractError::unsupported(kind, e))?;

        let header = entry.header();
        if !header.entry_type().is_file() {
            continue;
        }
        // An unparsable mode field is treated as non-executable
        if !header.mode().is_ok_and(|m| m & EXEC_BITS != 0) {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| ExtractError::unsupported(kind, e))?
            .into_owned();
        let Some(file_name) = base_name(&path) else {
            continue;
        };

        debug!(entry = %path.display(), "found executable tar entry");
        let content = spool(&mut entry, kind)?;
        return Ok(ExtractedPayload { file_name, content });
    }

    Err(ExtractError::NoExecutableFound)
}

/// Returns the first zip entry carrying an execute bit, falling back to the
/// first extensionless entry when no entry has one.
///
/// Both tiers are tracked in a single pass so the fallback is the first
/// extensionless entry in listing order, even when an executable appears
/// later and wins.
fn find_in_zip<R: Read + Seek>(reader: R) -> Result<ExtractedPayload, ExtractError> {
    let kind = ArchiveKind::Zip;
    let mut archive = ZipArchive::new(reader).map_err(|e| ExtractError::unsupported(kind, e))?;

    let mut fallback: Option<(usize, String)> = None;
    for index in 0..archive.len() {
        let (name, mode) = {
            let file = archive
                .by_index_raw(index)
                .map_err(|e| ExtractError::unsupported(kind, e))?;
            if file.is_dir() {
                continue;
            }
            (file.name().to_string(), file.unix_mode())
        };

        // Symlink entries carry 0o777 but their content is a path, not a program
        if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            continue;
        }
        let Some(file_name) = base_name(Path::new(&name)) else {
            continue;
        };

        if mode.is_some_and(|m| m & EXEC_BITS != 0) {
            debug!(entry = %name, "found executable zip entry");
            return read_zip_entry(&mut archive, index, file_name);
        }
        if fallback.is_none() && !file_name.contains('.') {
            fallback = Some((index, file_name));
        }
    }

    match fallback {
        Some((index, file_name)) => {
            debug!(entry = %file_name, "no executable bit set, using extensionless entry");
            read_zip_entry(&mut archive, index, file_name)
        }
        None => Err(ExtractError::NoExecutableFound),
    }
}

fn read_zip_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    file_name: String,
) -> Result<ExtractedPayload, ExtractError> {
    let kind = ArchiveKind::Zip;
    let mut file = archive
        .by_index(index)
        .map_err(|e| ExtractError::unsupported(kind, e))?;
    let content = spool(&mut file, kind)?;
    Ok(ExtractedPayload { file_name, content })
}

/// Copy an archive entry into a fresh temp file.
///
/// Read failures come from the decompressor and are reported against the
/// archive; write failures are local I/O errors.
fn spool<R: Read>(reader: &mut R, kind: ArchiveKind) -> Result<NamedTempFile, ExtractError> {
    let mut content = NamedTempFile::new()?;
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ExtractError::unsupported(kind, e)),
        };
        content.write_all(&buf[..n])?;
    }
    content.flush()?;
    content.rewind()?;
    Ok(content)
}

/// Last path component, if it is a usable file name.
fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    enum Node<'a> {
        File(&'a str, u32, &'a [u8]),
        Dir(&'a str),
        Symlink(&'a str, &'a str),
    }

    fn build_tar(nodes: &[Node<'_>]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for node in nodes {
            let mut header = tar::Header::new_gnu();
            match node {
                Node::File(path, mode, body) => {
                    header.set_entry_type(tar::EntryType::Regular);
                    header.set_mode(*mode);
                    header.set_size(body.len() as u64);
                    header.set_cksum();
                    builder.append_data(&mut header, path, *body).unwrap();
                }
                Node::Dir(path) => {
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_mode(0o755);
                    header.set_size(0);
                    header.set_cksum();
                    builder.append_data(&mut header, path, io::empty()).unwrap();
                }
                Node::Symlink(path, target) => {
                    header.set_entry_type(tar::EntryType::Symlink);
                    header.set_mode(0o777);
                    header.set_size(0);
                    builder.append_link(&mut header, path, target).unwrap();
                }
            }
        }
        builder.into_inner().unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn bzip(data: &[u8]) -> Vec<u8> {
        let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn xz(data: &[u8]) -> Vec<u8> {
        let mut enc = xz2::write::XzEncoder::new(Vec::new(), 6);
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn build_zip(files: &[(&str, u32, &[u8])]) -> Vec<u8> {
        use zip::write::SimpleFileOptions;

        let mut zw = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, mode, body) in files {
            if name.ends_with('/') {
                zw.add_directory(*name, SimpleFileOptions::default()).unwrap();
                continue;
            }
            let opts = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored)
                .unix_permissions(*mode);
            zw.start_file(*name, opts).unwrap();
            zw.write_all(body).unwrap();
        }
        zw.finish().unwrap().into_inner()
    }

    fn extract(data: Vec<u8>, asset_name: &str) -> Result<ExtractedPayload, ExtractError> {
        extract_binary(Cursor::new(data), asset_name)
    }

    fn contents(payload: &ExtractedPayload) -> Vec<u8> {
        std::fs::read(payload.content.path()).unwrap()
    }

    #[test]
    fn test_tar_gz_single_executable() {
        let body = b"#!/bin/sh\necho hello";
        let data = gzip(&build_tar(&[Node::File("tool", 0o755, body)]));

        let payload = extract(data, "tool_linux_amd64.tar.gz").unwrap();
        assert_eq!(payload.file_name, "tool");
        assert_eq!(contents(&payload), body);
    }

    #[test]
    fn test_tar_gz_executable_among_noise() {
        let body = b"\x7fELF payload";
        let data = gzip(&build_tar(&[
            Node::Dir("tool-1.0/"),
            Node::File("tool-1.0/README.md", 0o644, b"docs"),
            Node::File("tool-1.0/LICENSE", 0o600, b"mit"),
            Node::Symlink("tool-1.0/latest", "bin/tool"),
            Node::Dir("tool-1.0/bin/"),
            Node::File("tool-1.0/bin/tool", 0o700, body),
            Node::File("tool-1.0/bin/helper", 0o755, b"second"),
        ]));

        let payload = extract(data, "tool.tgz").unwrap();
        assert_eq!(payload.file_name, "tool");
        assert_eq!(contents(&payload), body);
    }

    #[test]
    fn test_tar_group_or_other_exec_bit_counts() {
        let data = gzip(&build_tar(&[
            Node::File("notes.txt", 0o644, b"x"),
            Node::File("run", 0o641, b"other-exec"),
        ]));
        let payload = extract(data, "a.tar.gz").unwrap();
        assert_eq!(payload.file_name, "run");
    }

    #[test]
    fn test_tar_gz_without_executable() {
        let data = gzip(&build_tar(&[
            Node::File("readme.txt", 0o644, b"hello"),
            Node::Dir("bin/"),
            Node::Symlink("bin/tool", "../readme.txt"),
        ]));
        assert!(matches!(
            extract(data, "tool.tar.gz"),
            Err(ExtractError::NoExecutableFound)
        ));
    }

    #[test]
    fn test_tar_bz2_and_tar_xz() {
        let tarball = build_tar(&[Node::File("bin/tool", 0o755, b"bz-or-xz")]);

        let payload = extract(bzip(&tarball), "tool.tar.bz2").unwrap();
        assert_eq!(payload.file_name, "tool");
        assert_eq!(contents(&payload), b"bz-or-xz");

        let payload = extract(xz(&tarball), "tool.TAR.XZ").unwrap();
        assert_eq!(payload.file_name, "tool");
        assert_eq!(contents(&payload), b"bz-or-xz");
    }

    #[test]
    fn test_corrupt_gzip_is_unsupported_archive() {
        let err = extract(b"definitely not gzip".to_vec(), "tool.tar.gz").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnsupportedArchive {
                kind: ArchiveKind::TarGz,
                ..
            }
        ));
    }

    #[test]
    fn test_name_decides_format_not_content() {
        // A valid gzip stream under a .zip name is parsed as zip and fails.
        let data = gzip(&build_tar(&[Node::File("tool", 0o755, b"x")]));
        assert!(matches!(
            extract(data, "tool.zip"),
            Err(ExtractError::UnsupportedArchive {
                kind: ArchiveKind::Zip,
                ..
            })
        ));
    }

    #[test]
    fn test_zip_exec_bit() {
        let data = build_zip(&[("tool", 0o755, b"binary")]);
        let payload = extract(data, "tool.zip").unwrap();
        assert_eq!(payload.file_name, "tool");
        assert_eq!(contents(&payload), b"binary");
    }

    #[test]
    fn test_zip_exec_bit_beats_earlier_extensionless_entry() {
        let data = build_zip(&[
            ("dist/", 0o755, b""),
            ("dist/LICENSE", 0o644, b"license"),
            ("dist/tool.exe", 0o755, b"real"),
        ]);
        let payload = extract(data, "tool_windows_amd64.zip").unwrap();
        assert_eq!(payload.file_name, "tool.exe");
        assert_eq!(contents(&payload), b"real");
    }

    #[test]
    fn test_zip_extensionless_fallback() {
        let data = build_zip(&[
            ("README.md", 0o644, b"docs"),
            ("mytool", 0o644, b"fallback"),
            ("other", 0o644, b"second"),
        ]);
        let payload = extract(data, "mytool.zip").unwrap();
        assert_eq!(payload.file_name, "mytool");
        assert_eq!(contents(&payload), b"fallback");
    }

    #[test]
    fn test_zip_no_candidates() {
        let data = build_zip(&[("tool.txt", 0o644, b"text"), ("docs/", 0o755, b"")]);
        assert!(matches!(
            extract(data, "tool.zip"),
            Err(ExtractError::NoExecutableFound)
        ));
    }

    #[test]
    fn test_raw_binary_passthrough() {
        let payload = extract(b"raw bytes".to_vec(), "tool-linux-amd64").unwrap();
        assert_eq!(payload.file_name, "tool-linux-amd64");
        assert_eq!(contents(&payload), b"raw bytes");
    }

    #[test]
    fn test_extract_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.tar.gz");
        std::fs::write(&path, gzip(&build_tar(&[Node::File("tool", 0o755, b"disk")]))).unwrap();

        let payload = extract_file(&path, "tool.tar.gz").unwrap();
        assert_eq!(contents(&payload), b"disk");
    }

    #[test]
    fn test_payload_temp_file_is_removed_on_drop() {
        let payload = extract(b"raw".to_vec(), "tool").unwrap();
        let path = payload.content.path().to_path_buf();
        assert!(path.exists());
        drop(payload);
        assert!(!path.exists());
    }
}
