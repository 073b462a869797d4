//! Pure reconciliation of parser output against the known-invalid allowlist (no IO).
//!
//! Input: raw parser stdout plus resolved file sets built elsewhere.
//! Output: per-file outcomes, findings, verdict and summary counts.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod classify;
pub mod grammar;
pub mod model;
pub mod report;
pub mod scan;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use aggregate::{RunSummary, aggregate};
pub use classify::{Outcome, classify};
pub use engine::evaluate;
pub use grammar::{LineFormatError, parse_line, parse_line_from};
pub use model::{ErrorRegion, ParseRecord};
pub use scan::{ScanError, ScanOutput, scan_batch, scan_single};
