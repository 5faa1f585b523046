//! Behaviour-driven tests for the `spectro2-ci` binary.
//!
//! These scenarios run the compiled binary and check exit codes and the
//! messages it writes.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use spectro2_ci::platform::Platform;
use spectro2_ci::test_utils::{FixtureRepository, expected_tree};
use std::cell::RefCell;
use std::process::{Command, Output};

#[derive(Default)]
struct CliWorld {
    repo: RefCell<Option<FixtureRepository>>,
    args: RefCell<Vec<String>>,
    output: RefCell<Option<Output>>,
}

impl CliWorld {
    fn use_complete_repository(&self) -> String {
        let repo = FixtureRepository::complete(&Platform::Linux).expect("fixture repository");
        let root = repo.root().to_string();
        self.repo.replace(Some(repo));
        root
    }

    fn stderr(&self) -> String {
        let output = self.output.borrow();
        let output = output.as_ref().expect("CLI has not been run");
        String::from_utf8_lossy(&output.stderr).into_owned()
    }
}

#[fixture]
fn cli_world() -> CliWorld {
    CliWorld::default()
}

#[given("the CLI is invoked without arguments")]
fn given_no_arguments(cli_world: &CliWorld) {
    cli_world.args.borrow_mut().clear();
}

#[given("the CLI is invoked to archive a complete repository")]
fn given_archive_complete_repository(cli_world: &CliWorld) {
    let root = cli_world.use_complete_repository();
    cli_world.args.replace(vec![
        "archive".to_owned(),
        "--repo-root".to_owned(),
        root,
        "--platform".to_owned(),
        "linux".to_owned(),
    ]);
}

#[given("the CLI is invoked to archive for plan9")]
fn given_archive_for_plan9(cli_world: &CliWorld) {
    let root = cli_world.use_complete_repository();
    cli_world.args.replace(vec![
        "archive".to_owned(),
        "--repo-root".to_owned(),
        root,
        "--platform".to_owned(),
        "plan9".to_owned(),
    ]);
}

#[when("the CLI is run")]
fn when_cli_run(cli_world: &CliWorld) {
    let output = Command::new(env!("CARGO_BIN_EXE_spectro2-ci"))
        .args(cli_world.args.borrow().iter())
        .output()
        .expect("failed to run spectro2-ci");
    cli_world.output.replace(Some(output));
}

#[then("the CLI exits with code {code:i32}")]
fn then_exit_code(cli_world: &CliWorld, code: i32) {
    let output = cli_world.output.borrow();
    let output = output.as_ref().expect("CLI has not been run");
    assert_eq!(
        output.status.code(),
        Some(code),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[then("usage is printed to stderr")]
fn then_usage_printed(cli_world: &CliWorld) {
    let stderr = cli_world.stderr();
    assert!(stderr.contains("Usage:"), "stderr: {stderr}");
    assert!(stderr.contains("archive"), "stderr: {stderr}");
}

#[then("the CLI staged the archive")]
fn then_cli_staged(cli_world: &CliWorld) {
    let repo = cli_world.repo.borrow();
    let repo = repo.as_ref().expect("repository not set");
    assert_eq!(
        repo.staged_tree().expect("walk staging dir"),
        expected_tree("spectro2")
    );
    assert!(cli_world.stderr().contains("Successfully staged 3 entries"));
}

#[then("an unsupported platform message is shown")]
fn then_unsupported_message(cli_world: &CliWorld) {
    let stderr = cli_world.stderr();
    assert!(
        stderr.contains("error: unknown OS plan9"),
        "stderr: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/archive.feature", index = 5)]
fn scenario_cli_without_subcommand(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/archive.feature", index = 6)]
fn scenario_cli_archives_repository(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/archive.feature", index = 7)]
fn scenario_cli_rejects_unknown_platform(cli_world: CliWorld) {
    let _ = cli_world;
}
