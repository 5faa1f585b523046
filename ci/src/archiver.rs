//! The `archive` operation.
//!
//! Stages the spectro2 executable, the shader tree and the readme into a
//! fresh `archive-root` directory for the packaging step that follows. The
//! run is one-shot and non-transactional: the staging directory is cleared
//! first, and a failure part way through leaves whatever was already copied.

use crate::error::Result;
use crate::layout::{
    ArchiveLayout, EXECUTABLE_STEM, README_FILE, SHADERS_DIR, is_project_root,
};
use crate::platform::Platform;
use crate::stager::Stager;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// The kind of artefact a copy step stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The platform-named executable from the build output directory.
    Executable,
    /// The shader directory, copied recursively.
    ShaderTree,
    /// The repository readme.
    Readme,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Executable => "executable",
            Self::ShaderTree => "shader tree",
            Self::Readme => "readme",
        })
    }
}

/// One planned copy into the staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCopy {
    /// What is being staged.
    pub kind: ArtifactKind,
    /// Directory containing the source.
    pub source_dir: Utf8PathBuf,
    /// Name of the source, kept unchanged in the staging directory.
    pub name: String,
}

impl PlannedCopy {
    /// Return the full source path.
    #[must_use]
    pub fn source(&self) -> Utf8PathBuf {
        self.source_dir.join(&self.name)
    }
}

/// The ordered copies an archive run performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivePlan {
    /// The layout the plan was computed for.
    pub layout: ArchiveLayout,
    /// Platform used to name the executable.
    pub platform: Platform,
    /// Copies in execution order.
    pub copies: Vec<PlannedCopy>,
}

impl ArchivePlan {
    /// Return the staging directory the plan writes into.
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.layout.staging_dir()
    }
}

/// An artefact present in the staging directory after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedEntry {
    /// What was staged.
    pub kind: ArtifactKind,
    /// Name inside the staging directory.
    pub name: String,
    /// Number of files the entry holds (1 for single files).
    pub files: usize,
}

/// Summary of a completed archive run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// The populated staging directory.
    pub staging_dir: Utf8PathBuf,
    /// Platform the executable was named for.
    pub platform: Platform,
    /// Staged entries in copy order.
    pub entries: Vec<StagedEntry>,
}

/// Compute the copies an archive run would perform, without touching the
/// filesystem.
///
/// The layout is used as given; callers wanting absolute paths should
/// [`ArchiveLayout::resolve`] it first.
///
/// # Errors
///
/// Returns [`crate::error::ArchiveError::UnsupportedPlatform`] if the
/// platform has no executable name.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use spectro2_ci::archiver::{ArtifactKind, plan};
/// use spectro2_ci::layout::{ArchiveLayout, BuildProfile};
/// use spectro2_ci::platform::Platform;
///
/// let layout = ArchiveLayout::for_profile(Utf8PathBuf::from("/src/spectro2"), BuildProfile::Release);
/// let plan = plan(&layout, &Platform::Windows).expect("windows is supported");
/// assert_eq!(plan.copies[0].kind, ArtifactKind::Executable);
/// assert_eq!(plan.copies[0].name, "spectro2.exe");
/// ```
pub fn plan(layout: &ArchiveLayout, platform: &Platform) -> Result<ArchivePlan> {
    let executable = platform.executable_name(EXECUTABLE_STEM)?;
    let root = layout.repository_root();

    let copies = vec![
        PlannedCopy {
            kind: ArtifactKind::Executable,
            source_dir: layout.build_output_dir().to_owned(),
            name: executable,
        },
        PlannedCopy {
            kind: ArtifactKind::ShaderTree,
            source_dir: root.to_owned(),
            name: SHADERS_DIR.to_owned(),
        },
        PlannedCopy {
            kind: ArtifactKind::Readme,
            source_dir: root.to_owned(),
            name: README_FILE.to_owned(),
        },
    ];

    Ok(ArchivePlan {
        layout: layout.clone(),
        platform: platform.clone(),
        copies,
    })
}

/// Stage the archive for the host platform.
///
/// # Errors
///
/// See [`archive_with_platform`].
pub fn archive(repository_root: &Utf8Path, build_output_dir: &Utf8Path) -> Result<ArchiveReport> {
    let layout = ArchiveLayout::new(repository_root.to_owned(), build_output_dir.to_owned());
    archive_with_platform(&layout, &Platform::current())
}

/// Stage the archive, naming the executable for `platform`.
///
/// Resolves both paths, clears and recreates the staging directory, then
/// copies the executable, the shader tree and the readme in that order. The
/// platform is checked after the staging directory is cleared, so an
/// unsupported platform leaves it empty.
///
/// # Errors
///
/// Returns [`crate::error::ArchiveError::UnsupportedPlatform`] for an
/// unrecognised platform, [`crate::error::ArchiveError::MissingAsset`] when a
/// source is absent, and staging or copy errors for I/O failures. Nothing
/// already staged is rolled back.
pub fn archive_with_platform(layout: &ArchiveLayout, platform: &Platform) -> Result<ArchiveReport> {
    let layout = layout.resolve()?;
    if !is_project_root(layout.repository_root()) {
        warn!(
            "{} does not contain the spectro2 Cargo.toml; staging anyway",
            layout.repository_root()
        );
    }

    let stager = Stager::new(layout.staging_dir());
    debug!("archive phase: cleaning {}", stager.staging_path());
    stager.reset()?;

    let plan = plan(&layout, platform)?;
    debug!("archive phase: populating for {platform}");
    let entries = plan
        .copies
        .iter()
        .map(|copy| stage_copy(&stager, copy))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "staged {} entries into {}",
        entries.len(),
        stager.staging_path()
    );
    debug!("archive phase: done");

    Ok(ArchiveReport {
        staging_dir: stager.staging_path().to_owned(),
        platform: plan.platform,
        entries,
    })
}

fn stage_copy(stager: &Stager, copy: &PlannedCopy) -> Result<StagedEntry> {
    let files = match copy.kind {
        ArtifactKind::Executable | ArtifactKind::Readme => {
            stager.stage_file(&copy.source_dir, &copy.name)?;
            1
        }
        ArtifactKind::ShaderTree => stager.stage_tree(&copy.source_dir, &copy.name)?,
    };

    Ok(StagedEntry {
        kind: copy.kind,
        name: copy.name.clone(),
        files,
    })
}

#[cfg(test)]
#[path = "archiver_tests.rs"]
mod tests;
