//! Staging directory management.
//!
//! Copies artefacts into the staging directory under their original names.
//! Every destination is an explicit join onto the staging path, so nothing
//! here depends on the process working directory.

use crate::error::{ArchiveError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::fs;
use std::io::ErrorKind;
use walkdir::WalkDir;

/// Copies artefacts into a single staging directory.
#[derive(Debug, Clone)]
pub struct Stager {
    staging_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager writing into `staging_dir`.
    #[must_use]
    pub fn new(staging_dir: Utf8PathBuf) -> Self {
        Self { staging_dir }
    }

    /// Return the staging directory.
    #[must_use]
    pub fn staging_path(&self) -> &Utf8Path {
        &self.staging_dir
    }

    /// Delete the staging directory if present and recreate it empty.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::StagingFailed`] if an existing directory
    /// cannot be removed or the new one cannot be created.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_dir_all(&self.staging_dir) {
            Ok(()) => trace!("removed previous staging directory {}", self.staging_dir),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(self.staging_failed(source)),
        }

        fs::create_dir_all(&self.staging_dir).map_err(|source| self.staging_failed(source))
    }

    /// Copy `source_dir/name` to `<staging>/name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MissingAsset`] if the source is not a regular
    /// file, or [`ArchiveError::CopyFailed`] if the copy fails.
    pub fn stage_file(&self, source_dir: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
        let source = source_dir.join(name);
        if !source.is_file() {
            return Err(ArchiveError::MissingAsset { path: source });
        }

        let destination = self.staging_dir.join(name);
        copy_file(&source, &destination)?;
        Ok(destination)
    }

    /// Recursively copy the directory `source_dir/name` to `<staging>/name`.
    ///
    /// Symlinks are followed, so the staged tree holds file contents. Returns
    /// the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MissingAsset`] if the source is not a
    /// directory, or a copy/I/O error if the tree cannot be reproduced.
    pub fn stage_tree(&self, source_dir: &Utf8Path, name: &str) -> Result<usize> {
        let source_root = source_dir.join(name);
        if !source_root.is_dir() {
            return Err(ArchiveError::MissingAsset { path: source_root });
        }

        let destination_root = self.staging_dir.join(name);
        let mut files = 0;

        for entry in WalkDir::new(&source_root).follow_links(true) {
            let entry = entry.map_err(|e| walk_failed(e, &source_root, &destination_root))?;
            let path =
                Utf8Path::from_path(entry.path()).ok_or_else(|| ArchiveError::NonUtf8Path {
                    path: entry.path().to_path_buf(),
                })?;
            // WalkDir only yields descendants of its root.
            let Ok(relative) = path.strip_prefix(&source_root) else {
                continue;
            };
            let destination = destination_root.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination).map_err(|source| ArchiveError::CopyFailed {
                    from: path.to_owned(),
                    to: destination.clone(),
                    source,
                })?;
            } else {
                copy_file(path, &destination)?;
                files += 1;
            }
        }

        Ok(files)
    }

    fn staging_failed(&self, source: std::io::Error) -> ArchiveError {
        ArchiveError::StagingFailed {
            path: self.staging_dir.clone(),
            source,
        }
    }
}

/// Maps a walk error to the entry it was reading, falling back to the tree
/// root when walkdir has no path for it.
fn walk_failed(
    err: walkdir::Error,
    source_root: &Utf8Path,
    destination_root: &Utf8Path,
) -> ArchiveError {
    let from = err
        .path()
        .and_then(Utf8Path::from_path)
        .map_or_else(|| source_root.to_owned(), Utf8Path::to_owned);
    let to = from
        .strip_prefix(source_root)
        .map_or_else(|_| destination_root.to_owned(), |rel| destination_root.join(rel));
    ArchiveError::CopyFailed {
        from,
        to,
        source: err.into(),
    }
}

fn copy_file(from: &Utf8Path, to: &Utf8Path) -> Result<()> {
    trace!("copying {from} -> {to}");
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| ArchiveError::CopyFailed {
            from: from.to_owned(),
            to: to.to_owned(),
            source,
        })
}
