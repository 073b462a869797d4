//! Render use cases: markdown and GitHub annotations from in-memory reports.

use parseguard_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    parseguard_render::render_markdown(report)
}

/// Annotations in report order, errors first so the cap never hides a failure behind notices.
pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    let mut ordered = report.clone();
    ordered
        .findings
        .sort_by_key(|f| std::cmp::Reverse(f.severity as u8));
    parseguard_render::render_github_annotations(&ordered)
        .into_iter()
        .take(max)
        .collect()
}
