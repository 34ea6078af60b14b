use crate::common::command::{BENCHMARK_CMD, regressing_history, run_perf_bisect_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn results_are_saved_as_json(
    regressing_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (repository_dir, shas) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &[
            "run",
            BENCHMARK_CMD,
            "--good",
            "HEAD~5",
            "--threshold",
            "1.0",
            "--output",
            "results/run.json",
        ],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Results saved to:"))
    .stdout(predicate::str::contains("run.json"));

    let saved = std::fs::read_to_string(repository_dir.path().join("results").join("run.json"))?;
    let json: serde_json::Value = serde_json::from_str(&saved)?;

    assert_eq!(json["good_commit"], shas[0].as_str());
    assert_eq!(json["bad_commit"], shas[5].as_str());
    assert_eq!(json["threshold"], 1.0);
    assert_eq!(json["regression_commit"], shas[4].as_str());
    assert!(
        json["regression_message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Set duration to 1.3"))
    );

    let measurements = json["measurements"].as_array().ok_or("no measurements")?;
    assert_eq!(measurements.len(), 2);
    assert_eq!(measurements[0]["commit"], shas[3].as_str());
    assert_eq!(measurements[0]["duration"], 0.9);
    assert_eq!(measurements[0]["passed"], true);
    assert_eq!(measurements[1]["commit"], shas[4].as_str());
    assert_eq!(measurements[1]["duration"], 1.3);
    assert_eq!(measurements[1]["passed"], false);

    Ok(())
}

#[rstest]
fn results_are_saved_as_csv(
    regressing_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (repository_dir, shas) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &[
            "run",
            BENCHMARK_CMD,
            "--good",
            "HEAD~5",
            "--threshold",
            "1.0",
            "-o",
            "run.csv",
        ],
    )
    .assert()
    .success();

    let saved = std::fs::read_to_string(repository_dir.path().join("run.csv"))?;
    let lines = saved.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Commit,Duration,Passed,Message");
    assert!(lines[1].starts_with(&format!("{},0.9,true,Set duration to 0.9", shas[3])));
    assert!(lines[2].starts_with(&format!("{},1.3,false,Set duration to 1.3", shas[4])));

    Ok(())
}

#[rstest]
fn saved_results_can_be_reported_again(
    regressing_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (repository_dir, shas) = regressing_history;

    run_perf_bisect_command(
        repository_dir.path(),
        &[
            "run",
            BENCHMARK_CMD,
            "--good",
            "HEAD~5",
            "--threshold",
            "1.0",
            "-o",
            "run.json",
        ],
    )
    .assert()
    .success();

    run_perf_bisect_command(repository_dir.path(), &["report", "run.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Regression found at: {}",
            &shas[4][..7]
        )))
        .stdout(predicate::str::contains("=== Performance Graph ==="));

    Ok(())
}
