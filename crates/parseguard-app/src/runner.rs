//! Parser invocation: the only place parseguard spawns a process.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use parseguard_domain::{ScanOutput, scan_batch, scan_single};
use parseguard_settings::{EffectiveConfig, InvocationMode};
use parseguard_domain::grammar::split_path_token;
use parseguard_types::{FileSet, RepoPath};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Upper bound on the command line of one batch invocation, in bytes.
///
/// Windows caps a command line at 32,767 UTF-16 units; staying under it leaves room for the
/// program path and quoting.
const MAX_COMMAND_LINE: usize = 30_000;

/// One parser process to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Utf8PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerOutput {
    pub stdout: String,
    /// Exit code, when the process exited normally. Informational only.
    pub status: Option<i32>,
}

/// Runs parser invocations. Implemented by [`ProcessRunner`]; tests substitute canned output.
pub trait ParserRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<RunnerOutput>;
}

/// Spawns the parser with `std::process::Command`, capturing stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ParserRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<RunnerOutput> {
        debug!(
            "running {} with {} argument(s) in {}",
            invocation.program,
            invocation.args.len(),
            invocation.cwd
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("spawn parser `{}`", invocation.program))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("parser stderr: {}", stderr.trim_end());
        }

        Ok(RunnerOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            status: output.status.code(),
        })
    }
}

/// Invoke the parser over `targets` using the configured strategy and scan its output.
///
/// The parser is not invoked at all for an empty target set, and batch mode splits long target
/// sets across several invocations to stay under [`MAX_COMMAND_LINE`]. Exit codes are logged and
/// otherwise ignored: the tool exits non-zero whenever any file has errors, including
/// allowlisted ones.
pub fn collect_records(
    runner: &dyn ParserRunner,
    cfg: &EffectiveConfig,
    targets: &FileSet,
    cwd: &Utf8Path,
) -> anyhow::Result<ScanOutput> {
    if targets.is_empty() {
        info!("no files to parse; skipping parser invocation");
        return Ok(ScanOutput::default());
    }

    let base = cwd.as_str();
    match cfg.mode {
        InvocationMode::Batch => {
            let chunks = batch_chunks(&cfg.parser, &cfg.parser_args, targets, MAX_COMMAND_LINE);
            if chunks.len() > 1 {
                info!(
                    "splitting {} file(s) into {} parser invocations",
                    targets.len(),
                    chunks.len()
                );
            }

            let mut all = ScanOutput::default();
            for chunk in chunks {
                let mut args = cfg.parser_args.clone();
                args.extend(chunk.iter().map(|t| t.as_str().to_string()));
                let out = runner.run(&Invocation {
                    program: cfg.parser.clone(),
                    args,
                    cwd: cwd.to_owned(),
                })?;
                debug!("parser exited with {:?}", out.status);

                let chunk_targets: FileSet = chunk.into_iter().cloned().collect();
                let scanned = scan_batch(&out.stdout, &chunk_targets, base)
                    .context("scan parser output")?;
                log_unmatched(&scanned);
                all.records.extend(scanned.records);
                all.unmatched.extend(scanned.unmatched);
            }
            Ok(all)
        }
        InvocationMode::PerFile => {
            let mut all = ScanOutput::default();
            for target in targets {
                let mut args = cfg.parser_args.clone();
                args.push(target.as_str().to_string());
                let out = runner.run(&Invocation {
                    program: cfg.parser.clone(),
                    args,
                    cwd: cwd.to_owned(),
                })?;
                debug!("parser exited with {:?} for {}", out.status, target);

                let scanned = scan_single(&out.stdout, target, base)
                    .with_context(|| format!("scan parser output for {target}"))?;
                log_unmatched(&scanned);
                all.records.extend(scanned.records);
                all.unmatched.extend(scanned.unmatched);
            }
            Ok(all)
        }
    }
}

/// Split `targets` into runs whose full command line stays within `budget` bytes.
///
/// Each argument is charged its length plus quoting and a separator. A run always holds at
/// least one target, however long.
fn batch_chunks<'a>(
    program: &str,
    parser_args: &[String],
    targets: &'a FileSet,
    budget: usize,
) -> Vec<Vec<&'a RepoPath>> {
    let cost = |arg: &str| arg.len() + 3;
    let fixed = cost(program) + parser_args.iter().map(|a| cost(a.as_str())).sum::<usize>();

    let mut chunks: Vec<Vec<&RepoPath>> = Vec::new();
    let mut current: Vec<&RepoPath> = Vec::new();
    let mut used = fixed;
    for target in targets {
        let c = cost(target.as_str());
        if !current.is_empty() && used + c > budget {
            chunks.push(std::mem::take(&mut current));
            used = fixed;
        }
        current.push(target);
        used += c;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn log_unmatched(scanned: &ScanOutput) {
    for line in &scanned.unmatched {
        if split_path_token(line).1.ends_with(')') {
            warn!("parser reported an error node for a file that was not checked: {line}");
        } else {
            debug!("ignoring parser output line: {line}");
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers invocations from canned stdout keyed by the last argument.
    #[derive(Default)]
    pub struct FakeRunner {
        pub batch_stdout: String,
        pub per_file: HashMap<String, String>,
        pub calls: RefCell<Vec<Invocation>>,
    }

    impl ParserRunner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> anyhow::Result<RunnerOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            let key = invocation.args.last().cloned().unwrap_or_default();
            let stdout = self
                .per_file
                .get(&key)
                .cloned()
                .unwrap_or_else(|| self.batch_stdout.clone());
            Ok(RunnerOutput {
                stdout,
                status: Some(1),
            })
        }
    }
}
