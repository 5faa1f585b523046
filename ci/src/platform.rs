//! Platform-family detection for executable naming.
//!
//! The only thing the platform decides is the executable filename produced by
//! the build: a bare stem on Linux and `<stem>.exe` on Windows. Any other
//! platform is carried through verbatim so the error can report it.

use crate::error::{ArchiveError, Result};
use serde::Serialize;
use std::fmt;

/// A platform family, detected from a raw OS identifier.
///
/// Detection never fails; unrecognised identifiers become
/// [`Platform::Unsupported`] and only error once an executable name is
/// requested.
///
/// # Examples
///
/// ```
/// use spectro2_ci::platform::Platform;
///
/// assert_eq!(Platform::from_identifier("linux"), Platform::Linux);
/// assert_eq!(Platform::from_identifier("win32"), Platform::Windows);
/// assert!(matches!(
///     Platform::from_identifier("plan9"),
///     Platform::Unsupported(id) if id == "plan9"
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Platform {
    /// Linux and Linux-family identifiers (`linux`, `linux2`, ...).
    Linux,
    /// Windows (`windows`, `win32`).
    Windows,
    /// Any other identifier, kept as given.
    Unsupported(String),
}

impl Platform {
    /// Classify a raw OS identifier.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "windows" | "win32" => Self::Windows,
            id if id.starts_with("linux") => Self::Linux,
            other => Self::Unsupported(other.to_owned()),
        }
    }

    /// Detect the platform of the running host.
    #[must_use]
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Return the identifier for this platform.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Unsupported(raw) => raw.as_str(),
        }
    }

    /// Return the executable filename the build produces for `stem`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnsupportedPlatform`] carrying the raw
    /// identifier when the platform is neither Linux nor Windows.
    ///
    /// # Examples
    ///
    /// ```
    /// use spectro2_ci::platform::Platform;
    ///
    /// let name = Platform::Windows.executable_name("spectro2").expect("supported");
    /// assert_eq!(name, "spectro2.exe");
    /// ```
    pub fn executable_name(&self, stem: &str) -> Result<String> {
        match self {
            Self::Linux => Ok(stem.to_owned()),
            Self::Windows => Ok(format!("{stem}.exe")),
            Self::Unsupported(raw) => Err(ArchiveError::UnsupportedPlatform {
                platform: raw.clone(),
            }),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.identifier().to_owned()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
