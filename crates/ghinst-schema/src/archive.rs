//! Archive kinds, classified purely by file-name suffix.

/// Container format of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// Gzip-compressed tar archive (`.tar.gz`, `.tgz`).
    TarGz,
    /// Bzip2-compressed tar archive (`.tar.bz2`).
    TarBz2,
    /// XZ-compressed tar archive (`.tar.xz`).
    TarXz,
    /// Zip archive (`.zip`).
    Zip,
    /// Anything else: the asset is the executable itself.
    Raw,
}

/// Recognized archive suffixes, in the order they are tested.
const SUFFIXES: &[(&str, ArchiveKind)] = &[
    (".tar.gz", ArchiveKind::TarGz),
    (".tgz", ArchiveKind::TarGz),
    (".tar.bz2", ArchiveKind::TarBz2),
    (".tar.xz", ArchiveKind::TarXz),
    (".zip", ArchiveKind::Zip),
];

impl ArchiveKind {
    /// Classify an asset by the case-insensitive suffix of its name.
    ///
    /// ```
    /// use ghinst_schema::ArchiveKind;
    ///
    /// assert_eq!(ArchiveKind::from_name("tool.TGZ"), ArchiveKind::TarGz);
    /// assert_eq!(ArchiveKind::from_name("tool.exe"), ArchiveKind::Raw);
    /// ```
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map_or(Self::Raw, |(_, kind)| *kind)
    }

    /// Whether this kind is one of the recognized archive formats.
    pub fn is_archive(self) -> bool {
        self != Self::Raw
    }

    /// Human-readable label used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::Zip => "zip",
            Self::Raw => "raw",
        }
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `name` ends with a recognized archive extension.
pub fn is_archive_name(name: &str) -> bool {
    ArchiveKind::from_name(name).is_archive()
}
