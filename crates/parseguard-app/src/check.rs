//! The `check` use case: resolve file sets, run the parser, reconcile, produce a report.

use crate::publish::RunEnvironment;
use crate::report::tool_meta;
use crate::runner::{ParserRunner, collect_records};
use anyhow::Context;
use parseguard_domain::RunSummary;
use parseguard_domain::report::DomainReport;
use parseguard_settings::{Overrides, ResolvedConfig};
use parseguard_types::{
    ParseguardData, ParseguardReport, RunMeta, SCHEMA_REPORT_V1, Verdict, VerdictCounts,
    VerdictStatus,
};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    pub env: &'a RunEnvironment,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ParseguardReport,
    pub summary: RunSummary,
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case.
///
/// Configuration problems and malformed parser output abort with an error; parse errors in
/// checked files never do, they only shape the verdict.
pub fn run_check(
    input: CheckInput<'_>,
    runner: &dyn ParserRunner,
) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();
    let workspace = input.env.workspace.as_path();

    // Parse config (empty is allowed, CLI flags must then carry the essentials).
    let cfg = if input.config_text.trim().is_empty() {
        parseguard_settings::ParseguardConfigV1::default()
    } else {
        parseguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = parseguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;

    let targets = parseguard_repo::resolve_file_set(workspace, &effective.files)
        .context("resolve files")?;
    if targets.is_empty() {
        warn!("file patterns matched no files");
    }
    let invalid = parseguard_repo::resolve_file_set(workspace, &effective.invalid_files)
        .context("resolve invalid files")?;
    info!(
        "checking {} file(s) with {} known-invalid",
        targets.len(),
        invalid.len()
    );

    let scanned = collect_records(runner, effective, &targets, workspace)?;

    let DomainReport {
        verdict,
        reasons,
        findings,
        summary,
        counts,
    } = parseguard_domain::evaluate(&scanned.records, &invalid);

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    info!(
        "{} file(s): {} successful, {} invalid syntax, {} parsing error(s)",
        summary.total_files,
        summary.success_count,
        summary.expected_invalid_count,
        summary.failures.len()
    );

    let report = ParseguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at,
            ended_at: Some(finished_at),
            duration_ms: Some(duration_ms),
            os: input.env.os_name.clone(),
        },
        verdict: Verdict {
            status: verdict,
            counts: VerdictCounts {
                info: counts.info,
                warn: counts.warning,
                error: counts.error,
            },
            reasons,
        },
        findings,
        data: ParseguardData {
            parser: effective.parser.clone(),
            mode: effective.mode.as_str().to_string(),
            total_files: summary.total_files,
            successful: summary.success_count,
            expected_invalid: summary.expected_invalid_count,
            failures: summary.failures.clone(),
            allowlist_violations: summary.allowlist_violations.clone(),
        },
    };

    Ok(CheckOutput {
        report,
        summary,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: VerdictStatus) -> i32 {
    match verdict {
        VerdictStatus::Pass | VerdictStatus::Warn => 0,
        VerdictStatus::Fail => 2,
    }
}
