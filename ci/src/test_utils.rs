//! Fixture repositories for archive tests.
//!
//! A [`FixtureRepository`] is a throwaway spectro2 checkout in a temporary
//! directory: a `Cargo.toml`, a readme, a shader tree and a fake executable
//! in `target/release`, each of which can be omitted to exercise failures.

use crate::layout::{
    ArchiveLayout, BuildProfile, EXECUTABLE_STEM, README_FILE, SHADERS_DIR, STAGING_DIR_NAME,
};
use crate::platform::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Contents written to the fixture executable.
pub const EXECUTABLE_CONTENTS: &[u8] = b"\x7fELF fake spectro2 binary";

/// Contents written to the fixture readme.
pub const README_CONTENTS: &str = "# spectro2\n\nAudio spectrum viewer.\n";

/// Shader files written by [`FixtureRepository::complete`], relative to
/// `shaders/`.
pub const SHADER_FILES: &[(&str, &str)] = &[
    ("spectrum.vert", "#version 450\nvoid main() {}\n"),
    ("spectrum.frag", "#version 450\nvoid main() {}\n"),
    ("include/common.glsl", "// shared uniforms\n"),
];

/// A temporary spectro2 repository.
#[derive(Debug)]
pub struct FixtureRepository {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl FixtureRepository {
    /// Create a repository holding only the spectro2 `Cargo.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created or its
    /// path is not UTF-8.
    pub fn empty() -> io::Result<Self> {
        let temp = TempDir::new()?;
        let root = Utf8PathBuf::try_from(temp.path().to_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(
            root.join("Cargo.toml"),
            "[package]\nname = \"spectro2\"\nversion = \"0.1.0\"\n",
        )?;
        Ok(Self { _temp: temp, root })
    }

    /// Create a repository with every artefact present, the executable named
    /// for `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture file cannot be written, or
    /// [`io::ErrorKind::Unsupported`] if `platform` has no executable name.
    pub fn complete(platform: &Platform) -> io::Result<Self> {
        let repo = Self::empty()?;
        repo.write_executable(platform)?;
        for (path, contents) in SHADER_FILES {
            repo.write_shader(path, contents)?;
        }
        repo.write_readme(README_CONTENTS)?;
        Ok(repo)
    }

    /// Return the repository root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Return the release build output directory.
    #[must_use]
    pub fn build_dir(&self) -> Utf8PathBuf {
        self.layout().build_output_dir().to_owned()
    }

    /// Return the release layout for this repository.
    #[must_use]
    pub fn layout(&self) -> ArchiveLayout {
        ArchiveLayout::for_profile(self.root.clone(), BuildProfile::Release)
    }

    /// Return the staging directory for this repository.
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.root.join(STAGING_DIR_NAME)
    }

    /// Write the fake executable named for `platform` into the build
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written, or
    /// [`io::ErrorKind::Unsupported`] if `platform` has no executable name.
    pub fn write_executable(&self, platform: &Platform) -> io::Result<Utf8PathBuf> {
        let name = platform
            .executable_name(EXECUTABLE_STEM)
            .map_err(|e| io::Error::new(io::ErrorKind::Unsupported, e))?;
        let build_dir = self.build_dir();
        fs::create_dir_all(&build_dir)?;
        let path = build_dir.join(name);
        fs::write(&path, EXECUTABLE_CONTENTS)?;
        Ok(path)
    }

    /// Write a shader at `relative` inside `shaders/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write_shader(&self, relative: &str, contents: &str) -> io::Result<()> {
        let path = self.root.join(SHADERS_DIR).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    /// Write the repository readme.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_readme(&self, contents: &str) -> io::Result<()> {
        fs::write(self.root.join(README_FILE), contents)
    }

    /// Return every path under the staging directory, relative to it, with
    /// `/` separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging directory cannot be walked.
    pub fn staged_tree(&self) -> io::Result<BTreeSet<String>> {
        relative_tree(&self.staging_dir())
    }
}

/// Return every path under `root`, relative to it, with `/` separators.
///
/// # Errors
///
/// Returns an error if `root` cannot be walked.
pub fn relative_tree(root: &Utf8Path) -> io::Result<BTreeSet<String>> {
    let mut paths = BTreeSet::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        paths.insert(relative);
    }
    Ok(paths)
}

/// Return the tree a complete archive for `executable` should contain.
#[must_use]
pub fn expected_tree(executable: &str) -> BTreeSet<String> {
    let mut paths = BTreeSet::from([
        executable.to_owned(),
        README_FILE.to_owned(),
        SHADERS_DIR.to_owned(),
    ]);
    for (path, _) in SHADER_FILES {
        let mut prefix = SHADERS_DIR.to_owned();
        for component in path.split('/') {
            prefix = format!("{prefix}/{component}");
            paths.insert(prefix.clone());
        }
    }
    paths
}
