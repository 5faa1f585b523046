//! Repository layout and path resolution.
//!
//! Fixes the names of everything the archive step reads and writes, and turns
//! the repository root and build output directory into absolute paths without
//! touching the process working directory.

use crate::error::{ArchiveError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Name of the staging directory, relative to the repository root.
pub const STAGING_DIR_NAME: &str = "archive-root";

/// Filename stem of the spectro2 executable.
pub const EXECUTABLE_STEM: &str = "spectro2";

/// Shader asset directory, relative to the repository root.
pub const SHADERS_DIR: &str = "shaders";

/// Readme file, relative to the repository root.
pub const README_FILE: &str = "README.md";

/// Package name that identifies the spectro2 repository.
const PROJECT_PACKAGE_NAME: &str = "spectro2";

/// Cargo build profile whose output is archived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    /// Optimised build in `target/release`.
    #[default]
    Release,
    /// Unoptimised build in `target/debug`.
    Debug,
}

impl BuildProfile {
    /// Return the directory name Cargo uses for this profile.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Source locations for one archive run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveLayout {
    repository_root: Utf8PathBuf,
    build_output_dir: Utf8PathBuf,
}

impl ArchiveLayout {
    /// Create a layout from explicit repository and build output paths.
    #[must_use]
    pub fn new(repository_root: Utf8PathBuf, build_output_dir: Utf8PathBuf) -> Self {
        Self {
            repository_root,
            build_output_dir,
        }
    }

    /// Create a layout whose build output is `<root>/target/<profile>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use spectro2_ci::layout::{ArchiveLayout, BuildProfile};
    ///
    /// let layout = ArchiveLayout::for_profile(Utf8PathBuf::from("/src/spectro2"), BuildProfile::Debug);
    /// assert!(layout.build_output_dir().ends_with("target/debug"));
    /// ```
    #[must_use]
    pub fn for_profile(repository_root: Utf8PathBuf, profile: BuildProfile) -> Self {
        let build_output_dir = repository_root.join("target").join(profile.dir_name());
        Self::new(repository_root, build_output_dir)
    }

    /// Convert both paths to absolute form.
    ///
    /// Relative paths are resolved against the current directory. Symlinks
    /// are not followed and the paths need not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or a resolved
    /// path is not valid UTF-8.
    pub fn resolve(&self) -> Result<Self> {
        let resolved = Self {
            repository_root: absolute_utf8(&self.repository_root)?,
            build_output_dir: absolute_utf8(&self.build_output_dir)?,
        };
        debug!(
            "resolved layout: root={} build={}",
            resolved.repository_root, resolved.build_output_dir
        );
        Ok(resolved)
    }

    /// Return the repository root.
    #[must_use]
    pub fn repository_root(&self) -> &Utf8Path {
        &self.repository_root
    }

    /// Return the build output directory.
    #[must_use]
    pub fn build_output_dir(&self) -> &Utf8Path {
        &self.build_output_dir
    }

    /// Return the staging directory, `<root>/archive-root`.
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.repository_root.join(STAGING_DIR_NAME)
    }
}

/// Checks whether `dir` holds the spectro2 Cargo manifest.
///
/// The directory qualifies when `Cargo.toml` parses and declares
/// `package.name = "spectro2"`.
#[must_use]
pub fn is_project_root(dir: &Utf8Path) -> bool {
    let Ok(content) = std::fs::read_to_string(dir.join("Cargo.toml")) else {
        return false;
    };

    let Ok(manifest) = content.parse::<toml::Table>() else {
        return false;
    };

    manifest
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .is_some_and(|name| name == PROJECT_PACKAGE_NAME)
}

/// Return the repository root: `override_root` if given, else the current
/// directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or is not valid
/// UTF-8.
pub fn resolve_repository_root(override_root: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    match override_root {
        Some(root) => Ok(root.to_owned()),
        None => current_dir_utf8(),
    }
}

/// Gets the current directory as a UTF-8 path.
fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| ArchiveError::NonUtf8Path {
        path: e.into_path_buf(),
    })
}

fn absolute_utf8(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let absolute = std::path::absolute(path)?;
    Utf8PathBuf::try_from(absolute).map_err(|e| ArchiveError::NonUtf8Path {
        path: e.into_path_buf(),
    })
}
