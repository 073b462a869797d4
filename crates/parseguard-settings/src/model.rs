use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `parseguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParseguardConfigV1 {
    /// Optional schema string for tooling (`parseguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Syntax checker executable (name on `PATH` or a path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    /// Arguments placed before the file paths. Defaults to `parse -q -t`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_args: Option<Vec<String>>,

    /// Invocation strategy: `batch` (default) or `per-file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Glob patterns for the files to check.
    #[serde(default)]
    pub files: Vec<String>,

    /// Newline-delimited list of additional patterns/paths for the files to check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_list: Option<String>,

    /// How `files_list` entries are read: `patterns` (default) or `paths`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_list_kind: Option<String>,

    /// Glob patterns for files whose syntax errors are expected.
    #[serde(default)]
    pub invalid_files: Vec<String>,

    /// Newline-delimited allowlist file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_files_list: Option<String>,

    /// How `invalid_files_list` entries are read: `patterns` (default) or `paths`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_files_list_kind: Option<String>,

    /// How many annotations to emit before truncating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_annotations: Option<u32>,
}
