//! CLI argument definitions for the spectro2 CI helper.
//!
//! Kept apart from the entrypoint so argument parsing can be unit tested
//! without spawning the binary.

use crate::layout::BuildProfile;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// CI helper for spectro2 release builds.
#[derive(Parser, Debug)]
#[command(name = "spectro2-ci")]
#[command(version, about)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Stage a release build from the repository root:\n",
    "    $ cargo build --release && spectro2-ci archive\n\n",
    "  Preview the copies without touching the filesystem:\n",
    "    $ spectro2-ci archive --dry-run\n\n",
    "  Stage a debug build and print the report as JSON:\n",
    "    $ spectro2-ci archive --profile debug --json",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stage the executable, shaders and README into `archive-root/`.
    Archive(ArchiveArgs),
}

/// Arguments for the archive command.
#[derive(Args, Debug, Clone, Default)]
pub struct ArchiveArgs {
    /// Repository root [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub repo_root: Option<Utf8PathBuf>,

    /// Build output directory [default: <REPO_ROOT>/target/<PROFILE>].
    #[arg(long, value_name = "DIR", conflicts_with = "profile")]
    pub build_dir: Option<Utf8PathBuf>,

    /// Cargo profile whose output is staged.
    #[arg(long, value_enum, default_value_t = BuildProfile::Release)]
    pub profile: BuildProfile,

    /// Platform identifier to name the executable for [default: host].
    #[arg(long, value_name = "ID")]
    pub platform: Option<String>,

    /// Show the planned copies and exit without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the archive report, or the plan with `--dry-run`, as JSON on
    /// stdout.
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
