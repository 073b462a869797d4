use crate::aggregate::{FileRecords, RunSummary, group_by_file};
use crate::classify::{Outcome, classify};
use crate::fingerprint::fingerprint_for_record;
use crate::model::ParseRecord;
use crate::report::{DomainReport, SeverityCounts};
use parseguard_types::{FileSet, Finding, Location, Severity, VerdictStatus, ids};
use serde_json::json;

/// Reconcile parser records against the allowlist.
///
/// Every error-node line is surfaced as a finding; the verdict depends only on the set of
/// unexpected failures.
pub fn evaluate(records: &[ParseRecord], invalid: &FileSet) -> DomainReport {
    let mut summary = RunSummary::default();
    let mut findings: Vec<Finding> = Vec::new();

    for group in group_by_file(records) {
        let outcome = classify(group.decisive(), invalid);
        summary.tally(group.file, outcome);
        push_findings(&group, outcome, &mut findings);
    }

    let (verdict, reasons) = compute_verdict(&summary);
    let counts = SeverityCounts::from_findings(&findings);

    DomainReport {
        verdict,
        reasons,
        findings,
        summary,
        counts,
    }
}

fn push_findings(group: &FileRecords<'_>, outcome: Outcome, out: &mut Vec<Finding>) {
    match outcome {
        Outcome::Success => {}
        Outcome::UnexpectedFailure => {
            out.extend(group.errors().map(|r| error_node_finding(r, Severity::Error)));
        }
        Outcome::ExpectedInvalid => {
            out.extend(group.errors().map(|r| error_node_finding(r, Severity::Warning)));
        }
        Outcome::AllowlistViolation => {
            let path = group.file.clone();
            out.push(Finding {
                severity: Severity::Warning,
                check_id: ids::CHECK_SYNTAX_PARSE.to_string(),
                code: ids::CODE_ALLOWLIST_VIOLATION.to_string(),
                message: "file is listed as invalid but parsed without errors".to_string(),
                help: Some("remove it from the invalid-files allowlist".to_string()),
                fingerprint: Some(fingerprint_for_record(
                    ids::CHECK_SYNTAX_PARSE,
                    ids::CODE_ALLOWLIST_VIOLATION,
                    path.as_str(),
                    "",
                )),
                location: Some(Location::file(path)),
                data: serde_json::Value::Null,
            });
        }
    }
}

fn error_node_finding(record: &ParseRecord, severity: Severity) -> Finding {
    let (code, message) = match severity {
        Severity::Error => (ids::CODE_PARSE_ERROR, "Parsing error"),
        _ => (ids::CODE_EXPECTED_INVALID, "Invalid syntax (expected)"),
    };

    // Callers only pass error-bearing records.
    let (location, message, label, node) = match &record.region {
        Some(region) => (
            Some(region.location(record.file.clone())),
            format!("{message}: {} node at {}", region.label, region.span()),
            json!(region.label),
            region.identity(),
        ),
        None => (
            Some(Location::file(record.file.clone())),
            message.to_string(),
            serde_json::Value::Null,
            record.raw.clone(),
        ),
    };

    Finding {
        severity,
        check_id: ids::CHECK_SYNTAX_PARSE.to_string(),
        code: code.to_string(),
        message,
        location,
        help: None,
        fingerprint: Some(fingerprint_for_record(
            ids::CHECK_SYNTAX_PARSE,
            code,
            record.file.as_str(),
            &node,
        )),
        data: json!({ "label": label, "raw": record.raw }),
    }
}

fn compute_verdict(summary: &RunSummary) -> (VerdictStatus, Vec<String>) {
    let mut reasons = Vec::new();
    if !summary.failures.is_empty() {
        reasons.push(ids::REASON_PARSE_ERRORS.to_string());
    }
    if !summary.allowlist_violations.is_empty() {
        reasons.push(ids::REASON_ALLOWLIST_STALE.to_string());
    }
    if summary.total_files == 0 {
        reasons.push(ids::REASON_NO_FILES.to_string());
    }

    let status = if !summary.passed() {
        VerdictStatus::Fail
    } else if !summary.allowlist_violations.is_empty() {
        VerdictStatus::Warn
    } else {
        VerdictStatus::Pass
    };

    (status, reasons)
}
