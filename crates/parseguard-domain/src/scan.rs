//! Attribute raw parser stdout to the files that were checked.
//!
//! Lines are matched to files by their leading path, never by position: a single invocation
//! may print several lines for one file, and tools append summary lines. The longest prefix
//! that names a checked file wins, so paths containing spaces are attributed correctly.

use crate::grammar::{LineFormatError, parse_parts, path_candidates};
use crate::model::ParseRecord;
use parseguard_types::{FileSet, RepoPath};

/// An output line attributed to a checked file that does not follow the line grammar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized parser output on line {line_no} ({source}): `{text}`")]
pub struct ScanError {
    /// 1-based line number within the scanned stdout.
    pub line_no: usize,
    pub text: String,
    #[source]
    pub source: LineFormatError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Records in output order, followed by synthesized clean records.
    pub records: Vec<ParseRecord>,
    /// Non-blank lines whose path token did not name a checked file.
    pub unmatched: Vec<String>,
}

/// Scan the output of one invocation covering every file in `targets`.
///
/// Targets that produced no line at all are implicitly clean.
pub fn scan_batch(
    stdout: &str,
    targets: &FileSet,
    base_dir: &str,
) -> Result<ScanOutput, ScanError> {
    let mut out = scan_lines(stdout, base_dir, |path| targets.contains(path))?;

    let seen: FileSet = out.records.iter().map(|r| r.file.clone()).collect();
    out.records.extend(
        targets
            .iter()
            .filter(|t| !seen.contains(*t))
            .cloned()
            .map(ParseRecord::clean),
    );

    Ok(out)
}

/// Scan the output of an invocation for a single `file`.
///
/// Only lines whose path token names `file` are attributed to it; when none do, the file is
/// clean.
pub fn scan_single(stdout: &str, file: &RepoPath, base_dir: &str) -> Result<ScanOutput, ScanError> {
    let mut out = scan_lines(stdout, base_dir, |path| path == file)?;
    if out.records.is_empty() {
        out.records.push(ParseRecord::clean(file.clone()));
    }
    Ok(out)
}

fn scan_lines(
    stdout: &str,
    base_dir: &str,
    is_target: impl Fn(&RepoPath) -> bool,
) -> Result<ScanOutput, ScanError> {
    let mut out = ScanOutput::default();

    for (idx, line) in stdout.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let Some((path, rest)) =
            path_candidates(text).find(|(path, _)| is_target(&RepoPath::normalize(path, base_dir)))
        else {
            out.unmatched.push(text.to_string());
            continue;
        };

        let record = parse_parts(path, rest, text, base_dir).map_err(|source| ScanError {
            line_no: idx + 1,
            text: text.to_string(),
            source,
        })?;
        out.records.push(record);
    }

    Ok(out)
}
