//! spectro2 CI helper entrypoint.
//!
//! Runs after `cargo build` in CI and stages the spectro2 executable, shaders
//! and README into `archive-root/` for the packaging step.

use clap::Parser;
use spectro2_ci::archiver::{archive_with_platform, plan};
use spectro2_ci::cli::{ArchiveArgs, Cli, Command};
use spectro2_ci::error::{ArchiveError, Result};
use spectro2_ci::layout::{ArchiveLayout, is_project_root, resolve_repository_root};
use spectro2_ci::output::{
    DryRunInfo, format_plan_json, format_report_human, format_report_json, success_message,
};
use spectro2_ci::platform::Platform;
use std::io::Write;

fn main() {
    // Usage errors exit with status 2 from inside clap.
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Archive(args) => run_archive(args, stdout, stderr),
    }
}

/// Stages the archive, or prints the plan in dry-run mode.
fn run_archive(args: &ArchiveArgs, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let layout = layout_for_args(args)?.resolve()?;
    let platform = args
        .platform
        .as_deref()
        .map_or_else(Platform::current, Platform::from_identifier);

    if !args.quiet && !is_project_root(layout.repository_root()) {
        write_stderr_line(
            stderr,
            format!(
                "warning: {} does not contain the spectro2 Cargo.toml",
                layout.repository_root()
            ),
        );
    }

    if args.dry_run {
        let plan = plan(&layout, &platform)?;
        if args.json {
            write_stdout_line(stdout, format_plan_json(&plan)?)?;
        } else {
            write_stderr_line(stderr, DryRunInfo { plan: &plan }.display_text());
        }
        return Ok(());
    }

    if !args.quiet {
        write_stderr_line(
            stderr,
            format!("Staging artefacts to {}...", layout.staging_dir()),
        );
    }

    let report = archive_with_platform(&layout, &platform)?;

    if args.json {
        write_stdout_line(stdout, format_report_json(&report)?)?;
    } else if !args.quiet {
        write_stderr_line(stderr, format_report_human(&report));
    }

    if !args.quiet {
        write_stderr_line(stderr, success_message(&report));
    }

    Ok(())
}

/// Builds the layout from `--repo-root`, `--build-dir` and `--profile`.
fn layout_for_args(args: &ArchiveArgs) -> Result<ArchiveLayout> {
    let root = resolve_repository_root(args.repo_root.as_deref())?;
    Ok(match &args.build_dir {
        Some(build_dir) => ArchiveLayout::new(root, build_dir.clone()),
        None => ArchiveLayout::for_profile(root, args.profile),
    })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stdout_line(stdout: &mut dyn Write, message: impl std::fmt::Display) -> Result<()> {
    writeln!(stdout, "{message}").map_err(|source| ArchiveError::WriteFailed { source })
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use spectro2_ci::layout::BuildProfile;
    use spectro2_ci::test_utils::{FixtureRepository, expected_tree};
    use std::fs;

    #[fixture]
    fn linux_repo() -> FixtureRepository {
        FixtureRepository::complete(&Platform::Linux).expect("fixture repository")
    }

    fn args_for(repo: &FixtureRepository) -> ArchiveArgs {
        ArchiveArgs {
            repo_root: Some(repo.root().to_owned()),
            platform: Some("linux".to_owned()),
            ..ArchiveArgs::default()
        }
    }

    struct Captured {
        result: Result<()>,
        stdout: String,
        stderr: String,
    }

    fn run_captured(args: &ArchiveArgs) -> Captured {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let result = run_archive(args, &mut stdout, &mut stderr);
        Captured {
            result,
            stdout: String::from_utf8(stdout).expect("stdout was not UTF-8"),
            stderr: String::from_utf8(stderr).expect("stderr was not UTF-8"),
        }
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = ArchiveError::UnsupportedPlatform {
            platform: "plan9".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.starts_with("error: unknown OS plan9"));
    }

    #[test]
    fn layout_defaults_to_release_output() {
        let args = ArchiveArgs {
            repo_root: Some(Utf8PathBuf::from("/src/spectro2")),
            ..ArchiveArgs::default()
        };
        let layout = layout_for_args(&args).expect("layout");
        assert_eq!(
            layout,
            ArchiveLayout::for_profile(Utf8PathBuf::from("/src/spectro2"), BuildProfile::Release)
        );
    }

    #[test]
    fn layout_prefers_explicit_build_dir() {
        let args = ArchiveArgs {
            repo_root: Some(Utf8PathBuf::from("/src/spectro2")),
            build_dir: Some(Utf8PathBuf::from("/cache/build")),
            ..ArchiveArgs::default()
        };
        let layout = layout_for_args(&args).expect("layout");
        assert_eq!(layout.build_output_dir(), "/cache/build");
    }

    #[rstest]
    fn archive_reports_progress_on_stderr(linux_repo: FixtureRepository) {
        let captured = run_captured(&args_for(&linux_repo));

        assert!(captured.result.is_ok(), "stderr: {}", captured.stderr);
        assert!(captured.stdout.is_empty());
        assert!(captured.stderr.contains("Staging artefacts to"));
        assert!(captured.stderr.contains("Successfully staged 3 entries"));
        assert_eq!(
            linux_repo.staged_tree().expect("walk"),
            expected_tree("spectro2")
        );
    }

    #[rstest]
    fn quiet_archive_writes_nothing(linux_repo: FixtureRepository) {
        let args = ArchiveArgs {
            quiet: true,
            ..args_for(&linux_repo)
        };
        let captured = run_captured(&args);

        assert!(captured.result.is_ok());
        assert!(captured.stdout.is_empty());
        assert!(captured.stderr.is_empty());
    }

    #[rstest]
    fn json_report_goes_to_stdout(linux_repo: FixtureRepository) {
        let args = ArchiveArgs {
            json: true,
            ..args_for(&linux_repo)
        };
        let captured = run_captured(&args);

        assert!(captured.result.is_ok(), "stderr: {}", captured.stderr);
        let value: serde_json::Value =
            serde_json::from_str(&captured.stdout).expect("stdout is JSON");
        assert_eq!(value["platform"], "linux");
        assert_eq!(value["entries"][0]["name"], "spectro2");
    }

    #[rstest]
    fn dry_run_leaves_filesystem_untouched(linux_repo: FixtureRepository) {
        let args = ArchiveArgs {
            dry_run: true,
            ..args_for(&linux_repo)
        };
        let captured = run_captured(&args);

        assert!(captured.result.is_ok());
        assert!(captured.stderr.contains("Dry run - no files will be modified"));
        assert!(!linux_repo.staging_dir().exists());
    }

    #[rstest]
    fn dry_run_json_prints_plan_on_stdout(linux_repo: FixtureRepository) {
        let args = ArchiveArgs {
            dry_run: true,
            json: true,
            ..args_for(&linux_repo)
        };
        let captured = run_captured(&args);

        assert!(captured.result.is_ok(), "stderr: {}", captured.stderr);
        assert!(!captured.stderr.contains("Dry run"));
        let value: serde_json::Value =
            serde_json::from_str(&captured.stdout).expect("stdout is JSON");
        assert_eq!(value["platform"], "linux");
        assert_eq!(value["copies"][0]["kind"], "executable");
        assert_eq!(value["copies"][1]["name"], "shaders");
        assert!(!linux_repo.staging_dir().exists());
    }

    #[rstest]
    fn unrecognised_root_warns_and_stages_anyway(linux_repo: FixtureRepository) {
        fs::remove_file(linux_repo.root().join("Cargo.toml")).expect("remove manifest");

        let captured = run_captured(&args_for(&linux_repo));

        assert!(captured.result.is_ok(), "stderr: {}", captured.stderr);
        let warning = format!(
            "warning: {} does not contain the spectro2 Cargo.toml",
            linux_repo.root()
        );
        assert!(captured.stderr.contains(&warning), "stderr: {}", captured.stderr);
        assert_eq!(
            linux_repo.staged_tree().expect("walk"),
            expected_tree("spectro2")
        );
    }

    #[rstest]
    fn unrecognised_root_warning_is_silenced_by_quiet(linux_repo: FixtureRepository) {
        fs::remove_file(linux_repo.root().join("Cargo.toml")).expect("remove manifest");
        let args = ArchiveArgs {
            quiet: true,
            ..args_for(&linux_repo)
        };

        let captured = run_captured(&args);

        assert!(captured.result.is_ok());
        assert!(captured.stderr.is_empty());
    }

    #[rstest]
    fn recognised_root_does_not_warn(linux_repo: FixtureRepository) {
        let captured = run_captured(&args_for(&linux_repo));
        assert!(!captured.stderr.contains("warning:"));
    }

    #[rstest]
    fn unsupported_platform_is_an_error(linux_repo: FixtureRepository) {
        let args = ArchiveArgs {
            platform: Some("plan9".to_owned()),
            ..args_for(&linux_repo)
        };
        let captured = run_captured(&args);

        assert!(matches!(
            captured.result,
            Err(ArchiveError::UnsupportedPlatform { .. })
        ));
    }
}
