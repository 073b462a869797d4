//! Fuzz target for file-set pattern compilation and path normalization.
//!
//! Goal: compiling patterns and matching candidates should **never panic**.
//! Invalid globs may return errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_glob_patterns
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parseguard_repo::{PatternSet, RepoPath};

#[derive(Arbitrary, Debug)]
struct GlobInput {
    /// Patterns, optionally `!`-prefixed (e.g. "test/**/*.txt", "!test/skip/*").
    patterns: Vec<String>,
    /// Candidate paths, possibly absolute or with `./` and `..` segments.
    candidates: Vec<String>,
}

fuzz_target!(|input: GlobInput| {
    if input.patterns.len() > 20 || input.candidates.len() > 100 {
        return;
    }

    let patterns: Vec<String> = input
        .patterns
        .into_iter()
        .filter(|p| p.len() <= 256)
        .collect();

    let Ok(set) = PatternSet::compile(&patterns, "/repo") else {
        return;
    };

    for candidate in input.candidates.iter().filter(|c| c.len() <= 512) {
        let path = RepoPath::normalize(candidate, "/repo");
        // Normalization is idempotent.
        assert_eq!(RepoPath::normalize(path.as_str(), "/repo"), path);
        let _ = set.is_match(&path);
    }
});
