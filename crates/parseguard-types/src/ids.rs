//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_SYNTAX_PARSE: &str = "syntax.parse";

// Codes: syntax.parse
pub const CODE_PARSE_ERROR: &str = "parse_error";
pub const CODE_EXPECTED_INVALID: &str = "expected_invalid";
pub const CODE_ALLOWLIST_VIOLATION: &str = "allowlist_violation";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
pub const CODE_UNRECOGNIZED_OUTPUT: &str = "unrecognized_output";

// Verdict reasons
pub const REASON_PARSE_ERRORS: &str = "parse_errors";
pub const REASON_ALLOWLIST_STALE: &str = "allowlist_stale";
pub const REASON_NO_FILES: &str = "no_files";
pub const REASON_TOOL_ERROR: &str = "tool_error";
