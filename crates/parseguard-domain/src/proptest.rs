//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Classification truth table membership
//! - Summary arithmetic and failure dedup
//! - Coordinate conversion and rendering of regions

use crate::aggregate::aggregate;
use crate::classify::{Outcome, classify};
use crate::engine::evaluate;
use crate::grammar::parse_line;
use crate::model::ParseRecord;
use crate::test_support::error_line;
use parseguard_types::{FileSet, RepoPath, VerdictStatus};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for a small pool of file names so collisions (repeated lines) are common.
fn arb_file() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "a.js", "b.js", "c.txt", "src/d.rs", "test/e.py", "test/f.js", "g", "h.c",
    ])
    .prop_map(|s| s.to_string())
}

/// One output line: a file plus an optional 0-based error point.
fn arb_line() -> impl Strategy<Value = (String, Option<(u32, u32)>)> {
    (arb_file(), prop::option::of((0u32..500, 0u32..200)))
}

fn arb_allowlist() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(arb_file(), 0..5)
}

fn render_line(file: &str, point: Option<(u32, u32)>) -> String {
    match point {
        Some((row, col)) => error_line(file, row, col),
        None => file.to_string(),
    }
}

fn to_records(lines: &[(String, Option<(u32, u32)>)]) -> Vec<ParseRecord> {
    lines
        .iter()
        .map(|(f, p)| parse_line(&render_line(f, *p)).expect("generated line parses"))
        .collect()
}

fn to_set(paths: &BTreeSet<String>) -> FileSet {
    paths.iter().map(RepoPath::new).collect()
}

/// A file parsed cleanly never appears with an error marker in batch output, so the generated
/// stream is filtered to either only-clean or only-error lines per file.
fn consistent(lines: Vec<(String, Option<(u32, u32)>)>) -> Vec<(String, Option<(u32, u32)>)> {
    let erroring: BTreeSet<String> = lines
        .iter()
        .filter(|(_, p)| p.is_some())
        .map(|(f, _)| f.clone())
        .collect();
    lines
        .into_iter()
        .filter(|(f, p)| p.is_some() || !erroring.contains(f))
        .collect()
}

proptest! {
    #[test]
    fn totals_always_add_up(
        lines in prop::collection::vec(arb_line(), 0..40),
        allow in arb_allowlist(),
    ) {
        let records = to_records(&consistent(lines));
        let s = aggregate(&records, &to_set(&allow));

        prop_assert_eq!(
            s.total_files,
            s.success_count + s.expected_invalid_count + s.failures.len() as u32
        );
        let distinct: BTreeSet<&RepoPath> = records.iter().map(|r| &r.file).collect();
        prop_assert_eq!(s.total_files as usize, distinct.len());
    }

    #[test]
    fn failures_are_unique_and_exactly_the_unlisted_erroring_files(
        lines in prop::collection::vec(arb_line(), 0..40),
        allow in arb_allowlist(),
    ) {
        let lines = consistent(lines);
        let invalid = to_set(&allow);
        let s = aggregate(&to_records(&lines), &invalid);

        let unique: BTreeSet<&RepoPath> = s.failures.iter().collect();
        prop_assert_eq!(unique.len(), s.failures.len());

        let expected: BTreeSet<RepoPath> = lines
            .iter()
            .filter(|(f, p)| p.is_some() && !allow.contains(f))
            .map(|(f, _)| RepoPath::new(f))
            .collect();
        prop_assert_eq!(unique.into_iter().cloned().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn allowlisted_files_never_fail(
        lines in prop::collection::vec(arb_line(), 0..40),
        allow in arb_allowlist(),
    ) {
        let invalid = to_set(&allow);
        let s = aggregate(&to_records(&consistent(lines)), &invalid);
        for f in &s.failures {
            prop_assert!(!invalid.contains(f));
        }
        for f in &s.allowlist_violations {
            prop_assert!(invalid.contains(f));
        }
    }

    #[test]
    fn verdict_tracks_failures_only(
        lines in prop::collection::vec(arb_line(), 0..40),
        allow in arb_allowlist(),
    ) {
        let report = evaluate(&to_records(&consistent(lines)), &to_set(&allow));
        prop_assert_eq!(
            report.verdict == VerdictStatus::Fail,
            !report.summary.failures.is_empty()
        );
    }

    #[test]
    fn classification_matches_truth_table(
        (file, point) in arb_line(),
        listed in any::<bool>(),
    ) {
        let record = parse_line(&render_line(&file, point)).expect("parse");
        let invalid: FileSet = if listed {
            std::iter::once(RepoPath::new(&file)).collect()
        } else {
            FileSet::new()
        };
        let expected = match (listed, point.is_some()) {
            (false, false) => Outcome::Success,
            (false, true) => Outcome::UnexpectedFailure,
            (true, true) => Outcome::ExpectedInvalid,
            (true, false) => Outcome::AllowlistViolation,
        };
        prop_assert_eq!(classify(&record, &invalid), expected);
    }

    #[test]
    fn coordinates_are_shifted_by_one(
        r1 in 0u32..10_000, c1 in 0u32..10_000, r2 in 0u32..10_000, c2 in 0u32..10_000,
    ) {
        let line = format!("x.js (ERROR [{r1}, {c1}] - [{r2}, {c2}])");
        let region = parse_line(&line).expect("parse").region.expect("region");
        prop_assert_eq!(
            (region.start_line, region.start_col, region.end_line, region.end_col),
            (r1 + 1, c1 + 1, r2 + 1, c2 + 1)
        );

        let loc = region.location(RepoPath::new("x.js"));
        if r1 == r2 {
            prop_assert_eq!((loc.col, loc.end_col), (Some(c1 + 1), Some(c2 + 1)));
        } else {
            prop_assert_eq!((loc.col, loc.end_col), (None, None));
        }
    }

    #[test]
    fn parse_line_never_panics(line in "\\PC{0,80}") {
        let _ = parse_line(&line);
    }
}
