use crate::{RenderableFinding, RenderableReport, RenderableSeverity};
use parseguard_types::ids;

/// Closes a log group opened with [`group_start`].
pub const GROUP_END: &str = "::endgroup::";

/// Open a collapsible log group.
pub fn group_start(title: &str) -> String {
    format!("::group::{}", escape_data(title))
}

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},endLine={line},col={col},endColumn={col},title={title}::{message}`
///
/// Columns are only present for single-line regions.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Info => "notice",
        };

        let mut meta: Vec<String> = Vec::new();
        if let Some(loc) = &f.location {
            meta.push(format!("file={}", escape_property(&loc.path)));
            if let Some(line) = loc.line {
                meta.push(format!("line={}", line));
            }
            if let Some(end_line) = loc.end_line {
                meta.push(format!("endLine={}", end_line));
            }
            if let Some(col) = loc.col {
                meta.push(format!("col={}", col));
            }
            if let Some(end_col) = loc.end_col {
                meta.push(format!("endColumn={}", end_col));
            }
        }
        meta.push(format!(
            "title={}",
            escape_property(&report.data.qualify(title_for(f)))
        ));

        out.push(format!(
            "::{} {}::{}",
            level,
            meta.join(","),
            escape_data(&f.message)
        ));
    }

    out
}

fn title_for(f: &RenderableFinding) -> &'static str {
    match f.code.as_str() {
        ids::CODE_PARSE_ERROR => "Parsing error",
        ids::CODE_EXPECTED_INVALID => "Invalid syntax",
        ids::CODE_ALLOWLIST_VIOLATION => "Unexpectedly valid syntax",
        ids::CODE_UNRECOGNIZED_OUTPUT => "Unrecognized parser output",
        _ => "parseguard",
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
