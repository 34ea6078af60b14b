use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

/// File holding the "measured" duration of every fixture commit
pub const DURATION_FILE: &str = "duration.txt";

/// Benchmark that reports whatever duration the checked-out commit holds
pub const BENCHMARK_CMD: &str = "cat duration.txt";

/// Duration of the initial (known good) fixture commit
pub const BASELINE_DURATION: f64 = 0.1;

/// Durations of the five commits after the baseline, oldest first
pub const REGRESSING_DURATIONS: [f64; 5] = [0.4, 0.6, 0.9, 1.3, 1.8];

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    let repository_dir = TempDir::new().expect("Failed to create temp dir");

    run_git_command(repository_dir.path(), &["init", "--quiet"])
        .assert()
        .success();

    repository_dir
}

/// A baseline commit followed by one commit per entry of [`REGRESSING_DURATIONS`]
///
/// The returned hashes are oldest first: index 0 is the baseline (`HEAD~5`),
/// index 5 is `HEAD`.
#[fixture]
pub fn regressing_history(repository_dir: TempDir) -> (TempDir, Vec<String>) {
    let shas = commit_durations(repository_dir.path(), &REGRESSING_DURATIONS);
    (repository_dir, shas)
}

/// Commit the baseline and then each of `durations`, returning every hash oldest first
pub fn commit_durations(dir: &Path, durations: &[f64]) -> Vec<String> {
    use fake::Fake;
    use fake::faker::lorem::en::Words;

    let mut shas = Vec::with_capacity(durations.len() + 1);

    write_duration(dir, BASELINE_DURATION);
    git_commit(dir, "Initial commit").assert().success();
    shas.push(head_sha(dir));

    for duration in durations {
        write_duration(dir, *duration);
        let detail = Words(2..4).fake::<Vec<String>>().join(" ");
        git_commit(dir, &format!("Set duration to {duration} ({detail})"))
            .assert()
            .success();
        shas.push(head_sha(dir));
    }

    shas
}

pub fn write_duration(dir: &Path, duration: f64) {
    write_file(FileSpec::new(dir.join(DURATION_FILE), format!("{duration}\n")));
}

pub fn run_perf_bisect_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("perf-bisect").expect("Failed to find perf-bisect binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("NO_COLOR", "1")]);
    cmd.env_remove("PERF_BISECT_THRESHOLD");
    cmd.env_remove("PERF_BISECT_TIMEOUT");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

#[derive(Debug, Clone, new)]
struct RandomAuthor {
    name: String,
    email: String,
}

fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>().replace(" ", "_");
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}

/// Stage everything and commit it with a random author
pub fn git_commit(dir: &Path, message: &str) -> Command {
    run_git_command(dir, &["add", "."]).assert().success();

    let author = generate_random_author();
    let mut cmd = run_git_command(dir, &["commit", "--quiet", "--no-gpg-sign", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", author.name.as_str()),
        ("GIT_AUTHOR_EMAIL", author.email.as_str()),
        ("GIT_COMMITTER_NAME", author.name.as_str()),
        ("GIT_COMMITTER_EMAIL", author.email.as_str()),
    ]);
    cmd
}

/// The commit HEAD points at
pub fn head_sha(dir: &Path) -> String {
    let output = run_git_command(dir, &["rev-parse", "HEAD"])
        .output()
        .expect("Failed to run git rev-parse");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Whether HEAD is still attached to a branch, i.e. nothing has been checked out
pub fn head_is_on_branch(dir: &Path) -> bool {
    run_git_command(dir, &["symbolic-ref", "--quiet", "HEAD"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// A scratch directory holding `results.json` with three probes: pass, fail, pass
#[fixture]
pub fn saved_results_dir() -> TempDir {
    redirect_temp_dir();
    let dir = TempDir::new().expect("Failed to create temp dir");

    let results = serde_json::json!({
        "good_commit": "1111111111111111111111111111111111111111",
        "bad_commit": "5555555555555555555555555555555555555555",
        "threshold": 1.0,
        "regression_commit": "3333333333333333333333333333333333333333",
        "regression_message": "Switch to naive sort",
        "measurements": [
            {"commit": "2222222222222222222222222222222222222222", "message": "Add caching", "duration": 0.9, "passed": true},
            {"commit": "3333333333333333333333333333333333333333", "message": "Switch to naive sort", "duration": 1.3, "passed": false},
            {"commit": "4444444444444444444444444444444444444444", "message": "Tidy up", "duration": 0.6, "passed": true}
        ]
    });
    write_file(FileSpec::new(
        dir.path().join("results.json"),
        results.to_string(),
    ));

    dir
}
