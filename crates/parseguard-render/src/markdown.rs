use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

/// Render a step-summary style Markdown document.
pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let data = &report.data;

    out.push_str(&format!("## {}\n\n", data.qualify("Parsing results")));
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!("- Verdict: **{}**\n\n", verdict));

    out.push_str("| Total files | Successful | Invalid syntax | Parsing errors |\n");
    out.push_str("|---|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        data.total_files,
        data.successful,
        data.expected_invalid,
        data.failures.len()
    ));

    if !data.failures.is_empty() {
        out.push_str(&format!(
            "\n### Parsing errors\n\nFailed to parse {}/{} files:\n\n",
            data.failures.len(),
            data.total_files
        ));
        for path in &data.failures {
            out.push_str(&format!("- `{}`\n", path));
        }
    }

    if !data.allowlist_violations.is_empty() {
        out.push_str("\n### Unexpectedly valid syntax\n\n");
        out.push_str("Listed as invalid but parsed without errors:\n\n");
        for path in &data.allowlist_violations {
            out.push_str(&format!("- `{}`\n", path));
        }
    }

    let details: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.severity == RenderableSeverity::Error)
        .collect();
    if !details.is_empty() {
        out.push_str("\n<details><summary>Error details</summary>\n\n");
        for f in details {
            match &f.location {
                Some(loc) => out.push_str(&format!(
                    "- `{}`:{}: {}\n",
                    loc.path,
                    loc.line.unwrap_or(0),
                    f.message
                )),
                None => out.push_str(&format!("- {}\n", f.message)),
            }
        }
        out.push_str("\n</details>\n");
    }

    out
}
