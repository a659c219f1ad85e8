//! Host platform identification and release artifact naming.
//!
//! The raw `(os, arch)` pair is captured once into a [`HostPlatform`] and
//! passed down explicitly. [`Os`] and [`Arch`] are the fixed lookup tables
//! that turn raw host values into release artifact tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Raw operating system and CPU architecture reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostPlatform {
    /// Operating system name as the host spells it (e.g., "linux", "win32").
    pub os: String,
    /// CPU architecture as the host spells it (e.g., "x64", "aarch64").
    pub arch: String,
}

impl HostPlatform {
    /// Create a host platform from raw values.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Read the platform this binary is running on.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map the raw pair onto supported artifact tokens.
    ///
    /// The operating system is checked first, so a host with both an unknown
    /// OS and an unknown architecture reports the platform.
    pub fn resolve(&self) -> Result<Platform> {
        let os = Os::parse(&self.os).ok_or_else(|| Error::unsupported_platform(&self.os))?;
        let arch =
            Arch::parse(&self.arch).ok_or_else(|| Error::unsupported_architecture(&self.arch))?;
        Ok(Platform::new(os, arch))
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// A supported platform combining OS and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Archive format the release ships for this platform.
    #[must_use]
    pub const fn archive_kind(&self) -> ArchiveKind {
        match self.os {
            Os::Windows => ArchiveKind::Zip,
            Os::Linux | Os::Darwin => ArchiveKind::TarGz,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Linux
    Linux,
    /// macOS
    Darwin,
    /// Windows
    Windows,
}

impl Os {
    /// Parse a raw host value.
    ///
    /// Accepts both Node-style (`darwin`, `win32`) and Rust-style
    /// (`macos`, `windows`) spellings.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linux" => Some(Self::Linux),
            "darwin" | "macos" => Some(Self::Darwin),
            "win32" | "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Token used in release artifact names.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86-64
    Amd64,
    /// 64-bit ARM
    Arm64,
}

impl Arch {
    /// Parse a raw host value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x64" | "x86_64" => Some(Self::Amd64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }

    /// Token used in release artifact names.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Archive format of a release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    /// `.zip`, used for Windows releases
    Zip,
    /// Gzip-compressed tarball
    TarGz,
}

impl ArchiveKind {
    /// File extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_pairs() {
        let cases = [
            ("linux", "x64", Os::Linux, Arch::Amd64),
            ("linux", "arm64", Os::Linux, Arch::Arm64),
            ("darwin", "x64", Os::Darwin, Arch::Amd64),
            ("macos", "aarch64", Os::Darwin, Arch::Arm64),
            ("win32", "x64", Os::Windows, Arch::Amd64),
            ("windows", "x86_64", Os::Windows, Arch::Amd64),
        ];
        for (os, arch, want_os, want_arch) in cases {
            let platform = HostPlatform::new(os, arch).resolve().unwrap();
            assert_eq!(platform, Platform::new(want_os, want_arch), "{os}/{arch}");
        }
    }

    #[test]
    fn test_unsupported_platform_message() {
        let err = HostPlatform::new("fakePlatform", "x64").resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "The platform fakePlatform is not supported by this action"
        );
    }

    #[test]
    fn test_unsupported_architecture_message() {
        let err = HostPlatform::new("linux", "fakeArch").resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "The architecture fakeArch is not supported by this action"
        );
    }

    #[test]
    fn test_platform_checked_before_architecture() {
        let err = HostPlatform::new("freebsd", "ia32").resolve().unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Os::Darwin.token(), "darwin");
        assert_eq!(Os::Windows.to_string(), "windows");
        assert_eq!(Arch::Amd64.token(), "amd64");
        assert_eq!(Platform::new(Os::Linux, Arch::Arm64).to_string(), "linux-arm64");
    }

    #[test]
    fn test_archive_kind() {
        assert_eq!(
            Platform::new(Os::Windows, Arch::Amd64).archive_kind(),
            ArchiveKind::Zip
        );
        assert_eq!(
            Platform::new(Os::Darwin, Arch::Arm64).archive_kind(),
            ArchiveKind::TarGz
        );
        assert_eq!(ArchiveKind::TarGz.extension(), "tar.gz");
    }

    #[test]
    fn test_detect_is_populated() {
        let host = HostPlatform::detect();
        assert!(!host.os.is_empty());
        assert!(!host.arch.is_empty());
    }
}
