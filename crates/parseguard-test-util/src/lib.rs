//! Shared test utilities for the parseguard workspace.
//!
//! This crate exists because both the CLI integration tests and `xtask` need these helpers
//! outside of `#[cfg(test)]` (`xtask conform` checks golden files are stored normalized).

use serde_json::Value;
#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` is replaced with `"__VERSION__"` only when the root object
///    looks like a report envelope (has `schema`, `tool`, `run`, `verdict`, `findings`).
///    Finding `data` payloads are never touched.
/// 2. **Recursive**: timestamp keys (`started_at`, `ended_at`) and `duration_ms` are normalized
///    at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "verdict", "findings"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "ended_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            if map.contains_key("duration_ms") {
                map.insert("duration_ms".to_string(), Value::Number(0.into()));
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

/// Replace every occurrence of `root` inside string values with `__WORKSPACE__`.
///
/// Runtime error messages embed absolute temp-dir paths; this makes them comparable.
pub fn normalize_workspace(mut value: Value, root: &str) -> Value {
    fn walk(value: &mut Value, root: &str) {
        match value {
            Value::String(s) if s.contains(root) => *s = s.replace(root, "__WORKSPACE__"),
            Value::Object(map) => map.values_mut().for_each(|v| walk(v, root)),
            Value::Array(arr) => arr.iter_mut().for_each(|v| walk(v, root)),
            _ => {}
        }
    }
    if !root.is_empty() {
        walk(&mut value, root);
    }
    value
}

/// Write an executable shell script standing in for the parser.
///
/// Tests should run it as `sh <script> ...` rather than executing it directly; exec'ing a file
/// that was just written races with concurrent forks (`ETXTBSY`).
///
/// It mimics `tree-sitter parse -q -t`: flags are skipped, every file argument whose name
/// contains `bad` or `oops` gets one error line (`ERROR [1, 2] - [1, 5]`), clean files print
/// nothing, a trailing summary line is printed, and the exit code is 1 whenever an error
/// was printed.
#[cfg(unix)]
pub fn write_fake_parser(dir: &Path) -> std::io::Result<PathBuf> {
    write_script(
        dir,
        "fake-parser",
        r#"#!/bin/sh
status=0
for f in "$@"; do
  case "$f" in
    -*|parse) ;;
    *bad*|*oops*)
      printf '%s\t0.10 ms\t(ERROR [1, 2] - [1, 5])\n' "$f"
      status=1
      ;;
  esac
done
echo "Total parses: $#"
exit $status
"#,
    )
}

/// Write an executable script that prints `stdout` verbatim, whatever its arguments.
#[cfg(unix)]
pub fn write_canned_parser(dir: &Path, stdout: &str) -> std::io::Result<PathBuf> {
    let data = dir.join("canned-output.txt");
    std::fs::write(&data, stdout)?;
    write_script(
        dir,
        "canned-parser",
        &format!("#!/bin/sh\ncat '{}'\nexit 1\n", data.display()),
    )
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body)?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(path)
}
