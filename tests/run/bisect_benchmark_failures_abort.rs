use crate::common::command::{head_sha, regressing_history, run_perf_bisect_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::missing_executable(
    "definitely-not-a-benchmark-binary --fast",
    "benchmark command not found: definitely-not-a-benchmark-binary"
)]
#[case::non_zero_exit(
    "sh -c 'echo broken build >&2; exit 2'",
    "benchmark failed with exit code 2: broken build"
)]
#[case::unparseable_output("echo no numbers here", "could not parse duration from output")]
#[case::blank_command("   ", "empty benchmark command")]
#[case::unbalanced_quotes("cat 'duration.txt", "malformed benchmark command")]
fn probe_failure_aborts_the_bisection(
    regressing_history: (TempDir, Vec<String>),
    #[case] benchmark: &str,
    #[case] expected_error: &str,
) {
    let (repository_dir, _) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &["run", benchmark, "--good", "HEAD~5", "--threshold", "1.0"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("bisection aborted after 0 probe(s)"))
    .stderr(predicate::str::contains(expected_error))
    .stdout(predicate::str::contains("Regression found").not());
}

#[rstest]
fn slow_benchmark_times_out(regressing_history: (TempDir, Vec<String>)) {
    let (repository_dir, _) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &[
            "run",
            "sleep 10",
            "--good",
            "HEAD~5",
            "--threshold",
            "1.0",
            "--timeout",
            "1",
        ],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("benchmark timed out after 1s"));
}

#[rstest]
fn failed_bisection_still_restores_bad_revision(regressing_history: (TempDir, Vec<String>)) {
    let (repository_dir, shas) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &["run", "false", "--good", "HEAD~5", "--threshold", "1.0"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("benchmark failed with exit code 1"));

    assert_eq!(head_sha(repository_dir.path()), shas[5]);
}

#[rstest]
fn shell_metacharacters_are_not_interpreted(regressing_history: (TempDir, Vec<String>)) {
    let (repository_dir, _) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &[
            "run",
            "echo 0.5; touch injected",
            "--good",
            "HEAD~5",
            "--threshold",
            "1.0",
        ],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not parse duration from output"));

    assert!(!repository_dir.path().join("injected").exists());
}
