//! spectro2 CI helper library.
//!
//! Stages the artefacts of a spectro2 build into `archive-root/` so a later
//! CI step can package them. Used by the `spectro2-ci` binary and by the
//! behaviour tests.
//!
//! # Modules
//!
//! - [`archiver`] - The `archive` operation, its plan and its report
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Semantic error types
//! - [`layout`] - Fixed artefact names and path resolution
//! - [`output`] - Human-readable and JSON rendering
//! - [`platform`] - Platform-family detection and executable naming
//! - [`stager`] - Staging directory reset and copies

pub mod archiver;
pub mod cli;
pub mod error;
pub mod layout;
pub mod output;
pub mod platform;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
