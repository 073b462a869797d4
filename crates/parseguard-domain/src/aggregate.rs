use crate::classify::{Outcome, classify};
use crate::model::ParseRecord;
use parseguard_types::{FileSet, RepoPath};
use std::collections::HashMap;

/// Tally of one run. Every distinct file is counted exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_files: u32,
    /// Clean files, including allowlist violations.
    pub success_count: u32,
    pub expected_invalid_count: u32,
    /// Unexpected failures, unique, in first-seen order.
    pub failures: Vec<RepoPath>,
    /// Allowlisted files that parsed cleanly, in first-seen order.
    pub allowlist_violations: Vec<RepoPath>,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn tally(&mut self, file: &RepoPath, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.success_count += 1,
            Outcome::AllowlistViolation => {
                self.success_count += 1;
                self.allowlist_violations.push(file.clone());
            }
            Outcome::ExpectedInvalid => self.expected_invalid_count += 1,
            Outcome::UnexpectedFailure => self.failures.push(file.clone()),
        }
        self.total_files =
            self.success_count + self.expected_invalid_count + self.failures.len() as u32;
    }
}

/// All records reported for one file, in output order.
#[derive(Clone, Debug)]
pub struct FileRecords<'a> {
    pub file: &'a RepoPath,
    pub records: Vec<&'a ParseRecord>,
}

impl<'a> FileRecords<'a> {
    /// The record that decides the outcome: the first error-bearing one, else the first.
    pub fn decisive(&self) -> &'a ParseRecord {
        self.records
            .iter()
            .copied()
            .find(|r| r.has_error())
            .unwrap_or(self.records[0])
    }

    pub fn errors(&self) -> impl Iterator<Item = &'a ParseRecord> + '_ {
        self.records.iter().copied().filter(|r| r.has_error())
    }
}

/// Group records per file, preserving first-seen file order.
pub fn group_by_file(records: &[ParseRecord]) -> Vec<FileRecords<'_>> {
    let mut index: HashMap<&RepoPath, usize> = HashMap::new();
    let mut groups: Vec<FileRecords<'_>> = Vec::new();

    for record in records {
        match index.get(&record.file) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(&record.file, groups.len());
                groups.push(FileRecords {
                    file: &record.file,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

/// Classify every file and tally the outcomes.
pub fn aggregate(records: &[ParseRecord], invalid: &FileSet) -> RunSummary {
    let mut summary = RunSummary::default();

    for group in group_by_file(records) {
        summary.tally(group.file, classify(group.decisive(), invalid));
    }

    summary
}
