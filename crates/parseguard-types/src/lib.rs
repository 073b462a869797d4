//! Stable DTOs and IDs used across the parseguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs and codes
//! - canonical repo-relative path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod receipt;

pub use path::RepoPath;

/// A deduplicated set of canonical paths. Iteration order is lexicographic.
pub type FileSet = std::collections::BTreeSet<RepoPath>;

pub use receipt::{
    Finding, Location, ParseguardData, ParseguardReport, RunMeta, SCHEMA_REPORT_V1, Severity,
    ToolMeta, Verdict, VerdictCounts, VerdictStatus,
};
