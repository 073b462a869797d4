use parseguard_repo::FileSetSource;

/// Arguments used when none are configured: tree-sitter's quiet batch parse with timing.
pub const DEFAULT_PARSER_ARGS: &[&str] = &["parse", "-q", "-t"];

/// Default cap on emitted annotations; GitHub drops annotations past 50 per job.
pub const DEFAULT_MAX_ANNOTATIONS: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvocationMode {
    /// One parser process covering every file.
    #[default]
    Batch,
    /// One parser process per file, strictly in sequence.
    PerFile,
}

impl InvocationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InvocationMode::Batch => "batch",
            InvocationMode::PerFile => "per-file",
        }
    }
}

/// Configuration problems detected before any parsing is attempted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no parser configured (pass --parser or set `parser` in the config)")]
    MissingParser,
    #[error("no files to check (pass --files/--files-list or set `files`/`files_list`)")]
    NoFileInputs,
    #[error("unknown mode: {0} (expected 'batch' or 'per-file')")]
    UnknownMode(String),
    #[error("unknown list kind: {0} (expected 'patterns' or 'paths')")]
    UnknownListKind(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub parser: String,
    pub parser_args: Vec<String>,
    pub mode: InvocationMode,
    pub files: FileSetSource,
    pub invalid_files: FileSetSource,
    pub max_annotations: usize,
}
