//! Platform identity and the alias table used to spot it in asset names.
//!
//! Release authors spell platforms inconsistently (`darwin`/`macos`/`osx`,
//! `amd64`/`x86_64`, ...). Each canonical [`Os`] and [`Arch`] owns a fixed set
//! of lowercase phrases; an asset name matches a component when its lowercased
//! form contains any of them.
//!
//! OS phrases must start a word: the character before the phrase, if any, is
//! not a letter. This keeps `win` (as in `win64`) from matching `darwin`.
//!
//! # Example
//!
//! ```
//! use ghinst_schema::{Arch, Os, Platform};
//!
//! let platform = Platform::from_ids("darwin", "aarch64").unwrap();
//! assert_eq!(platform, Platform::new(Os::Darwin, Arch::Arm64));
//! assert!(platform.matches("tool_macos_arm64.tar.gz"));
//! ```

use std::fmt;
use std::str::FromStr;

/// Operating system component of a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux-based operating systems.
    Linux,
    /// macOS (Apple's kernel name is used as the canonical id).
    Darwin,
    /// Microsoft Windows.
    Windows,
}

/// CPU architecture component of a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// Intel/AMD 64-bit.
    Amd64,
    /// ARM 64-bit.
    Arm64,
    /// Intel 32-bit.
    X86,
}

/// Error returned when an OS or architecture id is not in the alias table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The operating system id is not one of the supported systems.
    #[error("unsupported OS: {0}")]
    UnsupportedOs(String),

    /// The architecture id is not one of the supported architectures.
    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),
}

impl Os {
    /// Phrases that denote this OS inside a lowercased asset name.
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::Linux => &["linux"],
            Self::Darwin => &["darwin", "macos", "osx"],
            Self::Windows => &["windows", "win"],
        }
    }

    /// Canonical id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
        }
    }

    /// The OS this binary was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnsupportedOs`] outside the alias table.
    pub fn current() -> Result<Self, PlatformError> {
        std::env::consts::OS.parse()
    }

    /// Whether a lowercased asset name mentions this OS at the start of a word.
    pub fn matches(self, lower: &str) -> bool {
        self.phrases().iter().any(|p| contains_word_start(lower, p))
    }
}

impl Arch {
    /// Phrases that denote this architecture inside a lowercased asset name.
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::Amd64 => &["amd64", "x86_64"],
            Self::Arm64 => &["arm64", "aarch64"],
            Self::X86 => &["386", "i386", "i686"],
        }
    }

    /// Canonical id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::X86 => "x86",
        }
    }

    /// The architecture this binary was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnsupportedArch`] outside the alias table.
    pub fn current() -> Result<Self, PlatformError> {
        std::env::consts::ARCH.parse()
    }

    /// Whether a lowercased asset name contains any phrase for this architecture.
    pub fn matches(self, lower: &str) -> bool {
        self.phrases().iter().any(|p| lower.contains(p))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = PlatformError;

    /// Accepts Go-style (`darwin`) and Rust-style (`macos`) ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" => Ok(Self::Darwin),
            "windows" => Ok(Self::Windows),
            _ => Err(PlatformError::UnsupportedOs(s.to_string())),
        }
    }
}

impl FromStr for Arch {
    type Err = PlatformError;

    /// Accepts Go-style (`amd64`, `386`) and Rust-style (`x86_64`, `x86`) ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amd64" | "x86_64" => Ok(Self::Amd64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "386" | "x86" | "i386" | "i686" => Ok(Self::X86),
            _ => Err(PlatformError::UnsupportedArch(s.to_string())),
        }
    }
}

/// An (OS, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system component.
    pub os: Os,
    /// Architecture component.
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from already-validated components.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Look up both components in the alias table.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] naming the first component that is not
    /// recognized.
    pub fn from_ids(os: &str, arch: &str) -> Result<Self, PlatformError> {
        Ok(Self {
            os: os.parse()?,
            arch: arch.parse()?,
        })
    }

    /// The platform this binary was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the build target is outside the table.
    pub fn current() -> Result<Self, PlatformError> {
        Ok(Self::new(Os::current()?, Arch::current()?))
    }

    /// Whether `name` mentions both this OS and this architecture.
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.os.matches(&lower) && self.arch.matches(&lower)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

fn contains_word_start(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(i, _)| {
        haystack[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphabetic())
    })
}
