use crate::model::ParseRecord;
use parseguard_types::FileSet;

/// Per-file classification relative to the known-invalid allowlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Not allowlisted, parsed cleanly.
    Success,
    /// Allowlisted, reported an error node.
    ExpectedInvalid,
    /// Not allowlisted, reported an error node. Fails the run.
    UnexpectedFailure,
    /// Allowlisted, but parsed cleanly. Surfaced as a warning only.
    AllowlistViolation,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::ExpectedInvalid => "expected_invalid",
            Outcome::UnexpectedFailure => "unexpected_failure",
            Outcome::AllowlistViolation => "allowlist_violation",
        }
    }

    pub fn is_failure(self) -> bool {
        self == Outcome::UnexpectedFailure
    }
}

/// Membership × has-region truth table.
pub fn classify(record: &ParseRecord, invalid: &FileSet) -> Outcome {
    match (invalid.contains(&record.file), record.has_error()) {
        (false, false) => Outcome::Success,
        (false, true) => Outcome::UnexpectedFailure,
        (true, true) => Outcome::ExpectedInvalid,
        (true, false) => Outcome::AllowlistViolation,
    }
}
