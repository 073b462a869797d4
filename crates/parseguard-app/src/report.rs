use anyhow::Context;
use parseguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use parseguard_types::{
    Finding, ParseguardData, ParseguardReport, RunMeta, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict, VerdictCounts, VerdictStatus, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ParseguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse parseguard report")
}

pub fn serialize_report(report: &ParseguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ParseguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict.status {
            VerdictStatus::Pass => RenderableVerdictStatus::Pass,
            VerdictStatus::Warn => RenderableVerdictStatus::Warn,
            VerdictStatus::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            total_files: report.data.total_files,
            successful: report.data.successful,
            expected_invalid: report.data.expected_invalid,
            failures: report
                .data
                .failures
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            allowlist_violations: report
                .data
                .allowlist_violations
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            os: report.run.os.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
            end_line: loc.end_line,
            end_col: loc.end_col,
        }),
        help: f.help.clone(),
    }
}

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "parseguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// A passing report with no files.
#[cfg(test)]
pub(crate) fn empty_report(parser: &str, mode: &str, os: Option<String>) -> ParseguardReport {
    let now = OffsetDateTime::now_utc();
    ParseguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
            os,
        },
        verdict: Verdict {
            status: VerdictStatus::Pass,
            counts: VerdictCounts::default(),
            reasons: vec![ids::REASON_NO_FILES.to_string()],
        },
        findings: Vec::new(),
        data: ParseguardData {
            parser: parser.to_string(),
            mode: mode.to_string(),
            ..ParseguardData::default()
        },
    }
}

/// A failing report describing a tool-level error (bad config, spawn failure, protocol error).
///
/// Malformed parser output is reported with the `unrecognized_output` code so it is
/// distinguishable from other runtime problems.
pub fn runtime_error_report(err: &anyhow::Error, os: Option<String>) -> ParseguardReport {
    let now = OffsetDateTime::now_utc();
    let protocol = err
        .chain()
        .any(|c| c.is::<parseguard_domain::ScanError>());
    let code = if protocol {
        ids::CODE_UNRECOGNIZED_OUTPUT
    } else {
        ids::CODE_RUNTIME_ERROR
    };

    ParseguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
            os,
        },
        verdict: Verdict {
            status: VerdictStatus::Fail,
            counts: VerdictCounts {
                info: 0,
                warn: 0,
                error: 1,
            },
            reasons: vec![ids::REASON_TOOL_ERROR.to_string()],
        },
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: code.to_string(),
            message: format!("{err:#}"),
            location: None,
            help: Some("fix the configuration or parser invocation and re-run".to_string()),
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: ParseguardData::default(),
    }
}
