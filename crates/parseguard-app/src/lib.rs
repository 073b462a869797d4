//! Use case orchestration for parseguard.
//!
//! This crate provides the application layer: use cases that coordinate the repo, domain, and
//! render layers, plus the two IO seams the domain stays away from (running the parser and
//! publishing results to the CI host).
//!
//! The CLI crate depends on this; it only handles argument parsing and process setup.

#![forbid(unsafe_code)]

mod check;
mod publish;
mod render;
mod report;
mod resolve;
mod runner;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use publish::{GithubActionsSink, RunEnvironment};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use resolve::{ResolveInput, ResolveTarget, run_resolve};
pub use runner::{Invocation, ParserRunner, ProcessRunner, RunnerOutput};
