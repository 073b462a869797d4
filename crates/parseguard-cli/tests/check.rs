//! End-to-end CLI tests driving `parseguard check` against a shell script standing in for the
//! parser.

#![cfg(unix)]

use assert_cmd::Command;
use parseguard_test_util::{
    normalize_nondeterministic, normalize_workspace, write_canned_parser, write_fake_parser,
};
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
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

struct Workspace {
    tmp: TempDir,
    parser: PathBuf,
}

impl Workspace {
    fn new(files: &[&str]) -> Self {
        let tmp = TempDir::new().expect("temp dir");
        for f in files {
            let p = tmp.path().join(f);
            std::fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
            std::fs::write(&p, "source\n").expect("write");
        }
        let tools = tmp.path().join(".tools");
        std::fs::create_dir_all(&tools).expect("mkdir tools");
        let parser = write_fake_parser(&tools).expect("fake parser");
        Self { tmp, parser }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.tmp.path().join(rel)
    }

    /// `parseguard check` with the fake parser run through `sh`.
    fn check(&self) -> Command {
        let mut cmd = parseguard_cmd();
        cmd.arg("--repo-root")
            .arg(self.root())
            .arg("check")
            .args(["--parser", "sh", "--parser-arg"])
            .arg(&self.parser)
            .args(["--parser-arg", "parse", "--parser-arg", "-q", "--parser-arg", "-t"])
            .arg("--report-out")
            .arg(self.path("out/report.json"));
        cmd
    }

    fn report(&self) -> Value {
        let text = std::fs::read_to_string(self.path("out/report.json")).expect("read report");
        let value: Value = serde_json::from_str(&text).expect("report json");
        normalize_workspace(
            normalize_nondeterministic(value),
            self.root().to_str().expect("utf8 root"),
        )
    }
}

#[test]
fn allowlisted_errors_pass_and_publish_outputs() {
    let ws = Workspace::new(&["corpus/good.txt", "corpus/bad.txt"]);

    ws.check()
        .args(["--files", "corpus/*.txt", "--invalid-files", "corpus/bad.txt"])
        .args(["--os-name", "Linux"])
        .arg("--github-output")
        .arg(ws.path("gh_output"))
        .arg("--step-summary")
        .arg(ws.path("gh_summary.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("::group::Parsing files"))
        .stdout(predicate::str::contains(
            "::warning file=corpus/bad.txt,line=2,endLine=2,col=3,endColumn=6,title=Invalid syntax (Linux)::",
        ))
        .stdout(predicate::str::contains("::endgroup::"))
        .stdout(predicate::str::contains("Failed to parse").not());

    let report = ws.report();
    assert_eq!(report["schema"], "parseguard.report.v1");
    assert_eq!(report["verdict"]["status"], "pass");
    assert_eq!(report["data"]["total_files"], 2);
    assert_eq!(report["data"]["successful"], 1);
    assert_eq!(report["data"]["expected_invalid"], 1);
    assert_eq!(report["run"]["os"], "Linux");

    let output = std::fs::read_to_string(ws.path("gh_output")).expect("read output");
    assert_eq!(output, "failures<<PARSEGUARD_EOF\nPARSEGUARD_EOF\n");

    let summary = std::fs::read_to_string(ws.path("gh_summary.md")).expect("read summary");
    assert!(summary.contains("## Parsing results (Linux)"));
    assert!(summary.contains("| 2 | 1 | 1 | 0 |"));
}

#[test]
fn unexpected_errors_fail_with_exit_code_two() {
    let ws = Workspace::new(&["src/a.txt", "src/oops.txt", "src/bad.txt"]);

    ws.check()
        .args(["--files", "src/*.txt", "--invalid-files", "src/bad.txt"])
        .arg("--github-output")
        .arg(ws.path("gh_output"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "::error file=src/oops.txt,line=2,endLine=2,col=3,endColumn=6,title=Parsing error::Parsing error: ERROR node at 2:3-2:6",
        ))
        .stdout(predicate::str::contains("::error::Failed to parse 1/3 files"));

    let report = ws.report();
    assert_eq!(report["verdict"]["status"], "fail");
    assert_eq!(report["verdict"]["reasons"][0], "parse_errors");
    assert_eq!(report["data"]["failures"], serde_json::json!(["src/oops.txt"]));
    assert_eq!(report["tool"]["version"], "__VERSION__");
    assert_eq!(report["run"]["duration_ms"], 0);

    let output = std::fs::read_to_string(ws.path("gh_output")).expect("read output");
    assert_eq!(output, "failures<<PARSEGUARD_EOF\nsrc/oops.txt\nPARSEGUARD_EOF\n");
}

#[test]
fn stale_allowlist_entry_warns_but_passes() {
    let ws = Workspace::new(&["good.txt", "fixed.txt"]);

    ws.check()
        .args(["--files", "*.txt", "--invalid-files", "fixed.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "::warning file=fixed.txt,title=Unexpectedly valid syntax::",
        ));

    let report = ws.report();
    assert_eq!(report["verdict"]["status"], "warn");
    assert_eq!(report["data"]["allowlist_violations"], serde_json::json!(["fixed.txt"]));
}

#[test]
fn per_file_mode_matches_batch_results() {
    let ws = Workspace::new(&["a.txt", "oops.txt", "bad.txt"]);

    ws.check()
        .args(["--files", "*.txt", "--invalid-files", "bad.txt", "--mode", "per-file"])
        .assert()
        .code(2);

    let report = ws.report();
    assert_eq!(report["data"]["mode"], "per-file");
    assert_eq!(report["data"]["total_files"], 3);
    assert_eq!(report["data"]["failures"], serde_json::json!(["oops.txt"]));
}

#[test]
fn config_file_supplies_inputs() {
    let ws = Workspace::new(&["tests/ok.txt", "tests/bad_1.txt"]);
    std::fs::write(ws.path("invalid.txt"), "tests/bad_*.txt\n").expect("write list");
    std::fs::write(
        ws.path("parseguard.toml"),
        format!(
            "parser = \"sh\"\nparser_args = [\"{}\", \"parse\", \"-q\"]\nfiles = [\"tests/**/*.txt\"]\ninvalid_files_list = \"invalid.txt\"\n",
            ws.parser.display()
        ),
    )
    .expect("write config");

    parseguard_cmd()
        .arg("--repo-root")
        .arg(ws.root())
        .arg("check")
        .arg("--report-out")
        .arg(ws.path("out/report.json"))
        .assert()
        .success();

    let report = ws.report();
    assert_eq!(report["data"]["expected_invalid"], 1);
    assert_eq!(report["data"]["parser"], "sh");
}

#[test]
fn no_matching_files_passes_without_parsing() {
    let ws = Workspace::new(&["a.txt"]);

    ws.check().args(["--files", "*.rs"]).assert().success();

    let report = ws.report();
    assert_eq!(report["verdict"]["status"], "pass");
    assert_eq!(report["verdict"]["reasons"], serde_json::json!(["no_files"]));
    assert_eq!(report["data"]["total_files"], 0);
}

#[test]
fn missing_parser_is_a_runtime_error() {
    let ws = Workspace::new(&["a.txt"]);

    parseguard_cmd()
        .arg("--repo-root")
        .arg(ws.root())
        .arg("check")
        .args(["--files", "*.txt"])
        .arg("--report-out")
        .arg(ws.path("out/report.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no parser configured"));

    let report = ws.report();
    assert_eq!(report["verdict"]["status"], "fail");
    assert_eq!(report["findings"][0]["check_id"], "tool.runtime");
    assert_eq!(report["findings"][0]["code"], "runtime_error");
}

#[test]
fn malformed_parser_output_aborts_with_exit_code_one() {
    let ws = Workspace::new(&["a.txt"]);
    let canned = write_canned_parser(&ws.path(".tools"), "a.txt (ERROR [1 2] - [1, 5])\n")
        .expect("canned parser");

    parseguard_cmd()
        .arg("--repo-root")
        .arg(ws.root())
        .arg("check")
        .args(["--parser", "sh", "--parser-arg"])
        .arg(&canned)
        .args(["--files", "*.txt"])
        .arg("--report-out")
        .arg(ws.path("out/report.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unrecognized parser output"));

    let report = ws.report();
    assert_eq!(report["findings"][0]["code"], "unrecognized_output");
}

#[test]
fn resolve_prints_sorted_paths() {
    let ws = Workspace::new(&["b/z.txt", "a/y.txt", "a/skip.txt"]);

    parseguard_cmd()
        .arg("--repo-root")
        .arg(ws.root())
        .arg("resolve")
        .args(["--files", "**/*.txt", "--files", "!a/skip.txt"])
        .assert()
        .success()
        .stdout("a/y.txt\nb/z.txt\n");
}

#[test]
fn resolve_writes_list_for_invalid_files() {
    let ws = Workspace::new(&["bad/1.txt", "bad/2.txt"]);

    parseguard_cmd()
        .arg("--repo-root")
        .arg(ws.root())
        .arg("resolve")
        .args(["--target", "invalid-files", "--invalid-files", "bad/*"])
        .args(["--output", "lists/invalid.txt"])
        .assert()
        .success()
        .stdout("");

    let list = std::fs::read_to_string(ws.path("lists/invalid.txt")).expect("read list");
    assert_eq!(list, "bad/1.txt\nbad/2.txt\n");
}

#[test]
fn md_and_annotations_rerender_a_report() {
    let ws = Workspace::new(&["oops.txt", "ok.txt"]);
    ws.check().args(["--files", "*.txt"]).assert().code(2);

    parseguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(ws.path("out/report.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("## Parsing results"))
        .stdout(predicate::str::contains("| 2 | 1 | 0 | 1 |"))
        .stdout(predicate::str::contains("- `oops.txt`"));

    parseguard_cmd()
        .arg("annotations")
        .arg("--report")
        .arg(ws.path("out/report.json"))
        .args(["--max", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("::error file=oops.txt,"));
}
