//! Fuzz target for the parser output line grammar.
//!
//! Goal: line parsing and stdout scanning should **never panic** on any input.
//! Malformed error nodes must come back as errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_output_line
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use parseguard_repo::{FileSet, RepoPath};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for line in text.lines().take(64) {
        if let Ok(record) = parseguard_domain::parse_line(line) {
            if let Some(region) = &record.region {
                // Coordinates are shifted to 1-based, so never zero.
                assert!(region.start_line >= 1 && region.start_col >= 1);
                assert!(!region.label.is_empty());
            }
        }
    }

    // Attribute every path token in the input so error-node lines reach the grammar.
    let targets: FileSet = text
        .lines()
        .take(64)
        .filter_map(|l| l.split([' ', '\t']).next())
        .filter(|t| !t.is_empty())
        .map(|t| RepoPath::normalize(t, "/repo"))
        .collect();
    let _ = parseguard_domain::scan_batch(text, &targets, "/repo");
});
