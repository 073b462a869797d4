use crate::grammar::parse_line;
use crate::model::ParseRecord;
use parseguard_types::{FileSet, RepoPath};

pub fn allow(paths: &[&str]) -> FileSet {
    paths.iter().map(RepoPath::new).collect()
}

pub fn records(lines: &[&str]) -> Vec<ParseRecord> {
    lines
        .iter()
        .map(|l| parse_line(l).expect("test line should parse"))
        .collect()
}

pub fn error_line(path: &str, row: u32, col: u32) -> String {
    format!("{path} (ERROR [{row}, {col}] - [{row}, {}])", col + 1)
}
