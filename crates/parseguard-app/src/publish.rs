//! Publishing results to the CI host: log groups, annotations, job outputs, step summary.

use crate::render::{render_annotations, render_markdown};
use crate::report::to_renderable;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use parseguard_render::{GROUP_END, group_start};
use parseguard_types::ParseguardReport;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::{debug, info};

/// Process environment captured once at startup. Nothing else reads ambient state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunEnvironment {
    /// Directory the file sets are resolved against and the parser runs in.
    pub workspace: Utf8PathBuf,
    /// Runner OS label (`Linux`, `macOS`, `Windows`), used to qualify titles.
    pub os_name: Option<String>,
    /// File that receives job outputs (`GITHUB_OUTPUT`).
    pub github_output: Option<Utf8PathBuf>,
    /// File that receives the Markdown step summary (`GITHUB_STEP_SUMMARY`).
    pub step_summary: Option<Utf8PathBuf>,
}

/// Writes a finished report to GitHub Actions surfaces.
///
/// Workflow commands go to `out` (normally stdout). Job outputs and the step summary are
/// appended to the files named in the environment, when present.
pub struct GithubActionsSink<'a, W: Write> {
    env: &'a RunEnvironment,
    max_annotations: usize,
    out: W,
}

impl<'a, W: Write> GithubActionsSink<'a, W> {
    pub fn new(env: &'a RunEnvironment, max_annotations: usize, out: W) -> Self {
        Self {
            env,
            max_annotations,
            out,
        }
    }

    pub fn publish(&mut self, report: &ParseguardReport) -> anyhow::Result<()> {
        let renderable = to_renderable(report);

        writeln!(self.out, "{}", group_start("Parsing files")).context("write group start")?;
        let annotations = render_annotations(&renderable, self.max_annotations);
        let dropped = report.findings.len().saturating_sub(annotations.len());
        for line in &annotations {
            writeln!(self.out, "{line}").context("write annotation")?;
        }
        if dropped > 0 {
            info!("{dropped} annotation(s) omitted (max_annotations = {})", self.max_annotations);
        }
        writeln!(self.out, "{GROUP_END}").context("write group end")?;

        let data = &report.data;
        if !data.failures.is_empty() {
            writeln!(
                self.out,
                "::error::Failed to parse {}/{} files",
                data.failures.len(),
                data.total_files
            )
            .context("write failure summary")?;
        }

        if let Some(path) = &self.env.github_output {
            let failures: Vec<&str> = data.failures.iter().map(|p| p.as_str()).collect();
            append(path, &output_entry("failures", &failures))
                .context("write GITHUB_OUTPUT")?;
            debug!("wrote job outputs to {path}");
        }

        if let Some(path) = &self.env.step_summary {
            append(path, &render_markdown(&renderable)).context("write GITHUB_STEP_SUMMARY")?;
            debug!("wrote step summary to {path}");
        }

        self.out.flush().context("flush stdout")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Multi-line job output in heredoc form, with a delimiter that no value line can collide with.
fn output_entry(name: &str, lines: &[&str]) -> String {
    let mut delimiter = "PARSEGUARD_EOF".to_string();
    while lines.contains(&delimiter.as_str()) {
        delimiter.push('_');
    }

    let mut out = format!("{name}<<{delimiter}\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&delimiter);
    out.push('\n');
    out
}

fn append(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {path}"))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("append to {path}"))?;
    Ok(())
}
