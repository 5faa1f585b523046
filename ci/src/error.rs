//! Error types for the spectro2 CI helper.
//!
//! Filesystem variants name the path that caused the failure so the message
//! printed by the binary is enough to fix a broken CI job.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while staging the archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The platform identifier is neither Linux-family nor Windows.
    #[error("unknown OS {platform}, cannot determine executable name")]
    UnsupportedPlatform {
        /// The raw platform identifier.
        platform: String,
    },

    /// A required source file or directory does not exist.
    #[error("missing asset: {path}")]
    MissingAsset {
        /// Path where the asset was expected.
        path: Utf8PathBuf,
    },

    /// The staging directory could not be cleared or recreated.
    #[error("failed to prepare staging directory {path}")]
    StagingFailed {
        /// The staging directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Copying an artefact into the staging directory failed.
    #[error("failed to copy {from} to {to}")]
    CopyFailed {
        /// Source path of the copy.
        from: Utf8PathBuf,
        /// Destination path of the copy.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// The archive report could not be serialised.
    #[error("failed to serialise archive report: {0}")]
    ReportSerialization(#[from] serde_json::Error),
}

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;
