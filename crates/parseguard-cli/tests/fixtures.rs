//! Golden-report tests over the corpora in `tests/fixtures/`.
//!
//! Each fixture contains:
//! - a `parseguard.toml` and the files it selects
//! - `parser-output.txt`, the stdout the parser is replayed as
//! - `expected.report.json` (timestamps and the tool version use placeholders)

#![cfg(unix)]

use assert_cmd::Command;
use parseguard_test_util::{normalize_nondeterministic, write_canned_parser};
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn parseguard_cmd() -> Command {
    let mut cmd = Command::cargo_bin("parseguard").expect("parseguard binary not found");
    for var in [
        "GITHUB_WORKSPACE",
        "GITHUB_OUTPUT",
        "GITHUB_STEP_SUMMARY",
        "RUNNER_OS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parseguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Replay the fixture's canned output through `check` and return the exit code and report.
fn run_check_on_fixture(name: &str) -> (i32, Value) {
    let fixture = fixtures_dir().join(name);
    let tmp = TempDir::new().expect("temp dir");
    let stdout =
        std::fs::read_to_string(fixture.join("parser-output.txt")).expect("read parser output");
    let parser = write_canned_parser(tmp.path(), &stdout).expect("canned parser");
    let report_path = tmp.path().join("report.json");

    let output = parseguard_cmd()
        .arg("--repo-root")
        .arg(&fixture)
        .arg("check")
        .args(["--parser", "sh", "--parser-arg"])
        .arg(&parser)
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("run parseguard");

    let text = std::fs::read_to_string(&report_path).expect("read report");
    let report: Value = serde_json::from_str(&text).expect("report json");
    (output.status.code().unwrap_or(-1), report)
}

fn load_expected_report(name: &str) -> Value {
    let path = fixtures_dir().join(name).join("expected.report.json");
    let text = std::fs::read_to_string(path).expect("read expected report");
    serde_json::from_str(&text).expect("expected report json")
}

fn assert_reports_match(actual: Value, expected: Value, name: &str) {
    let actual = normalize_nondeterministic(actual);
    let expected = normalize_nondeterministic(expected);
    assert_eq!(
        actual,
        expected,
        "report mismatch for fixture '{name}'.\n\nActual:\n{}\n\nExpected:\n{}",
        serde_json::to_string_pretty(&actual).expect("pretty"),
        serde_json::to_string_pretty(&expected).expect("pretty"),
    );
}

#[test]
fn fixture_mixed_fails() {
    let (code, report) = run_check_on_fixture("mixed");
    assert_eq!(code, 2, "mixed fixture has an unexpected failure");
    assert_reports_match(report, load_expected_report("mixed"), "mixed");
}

#[test]
fn fixture_list_files_passes() {
    let (code, report) = run_check_on_fixture("list_files");
    assert_eq!(code, 0, "list_files fixture only has allowlisted errors");
    assert_reports_match(report, load_expected_report("list_files"), "list_files");
}

#[test]
fn fixture_mixed_markdown_lists_failures_and_stale_entries() {
    let fixture = fixtures_dir().join("mixed");
    let tmp = TempDir::new().expect("temp dir");
    let stdout =
        std::fs::read_to_string(fixture.join("parser-output.txt")).expect("read parser output");
    let parser = write_canned_parser(tmp.path(), &stdout).expect("canned parser");
    let md_path = tmp.path().join("summary.md");

    parseguard_cmd()
        .arg("--repo-root")
        .arg(&fixture)
        .arg("check")
        .args(["--parser", "sh", "--parser-arg"])
        .arg(&parser)
        .arg("--report-out")
        .arg(tmp.path().join("report.json"))
        .arg("--write-markdown")
        .arg("--markdown-out")
        .arg(&md_path)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("::error::Failed to parse 1/4 files"));

    let md = std::fs::read_to_string(&md_path).expect("read markdown");
    assert!(md.contains("| 4 | 2 | 1 | 1 |"), "{md}");
    assert!(md.contains("- `corpus/oops.js`"), "{md}");
    assert!(md.contains("- `corpus/invalid/fixed.js`"), "{md}");
}

#[test]
fn expected_reports_are_schema_valid() {
    let schema = schemars::schema_for!(parseguard_types::ParseguardReport);
    let schema = serde_json::to_value(&schema).expect("schema json");
    let validator = jsonschema::validator_for(&schema).expect("compile schema");

    for name in ["mixed", "list_files"] {
        let expected = load_expected_report(name);
        let errors: Vec<String> = validator
            .iter_errors(&expected)
            .map(|e| e.to_string())
            .collect();
        assert!(errors.is_empty(), "{name}: {errors:?}");
    }
}
