use parseguard_types::{Location, RepoPath};

/// Region of an error node reported by the parser.
///
/// Coordinates are 1-based (the tool emits 0-based rows/columns; conversion happens once, at
/// parse time).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorRegion {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    /// Node description, e.g. `ERROR` or `MISSING ";"`.
    pub label: String,
}

impl ErrorRegion {
    /// Build a region from the tool's 0-based `(row, column)` points.
    pub fn from_zero_based(label: &str, start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start_line: start.0.saturating_add(1),
            start_col: start.1.saturating_add(1),
            end_line: end.0.saturating_add(1),
            end_col: end.1.saturating_add(1),
            label: label.to_string(),
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.start_line != self.end_line
    }

    /// Location for reporting. Columns are dropped for multi-line regions since the tool's
    /// column boundaries are not meaningful across lines.
    pub fn location(&self, path: RepoPath) -> Location {
        let (col, end_col) = if self.is_multiline() {
            (None, None)
        } else {
            (Some(self.start_col), Some(self.end_col))
        };
        Location {
            path,
            line: Some(self.start_line),
            col,
            end_line: Some(self.end_line),
            end_col,
        }
    }

    /// Label and full 1-based coordinates; stable across runs, unlike the raw line (which may
    /// carry timing columns).
    pub fn identity(&self) -> String {
        format!(
            "{} [{}, {}] - [{}, {}]",
            self.label, self.start_line, self.start_col, self.end_line, self.end_col
        )
    }

    /// Human-readable span: `6:3-6:11` for one line, `lines 6-9` otherwise.
    pub fn span(&self) -> String {
        if self.is_multiline() {
            format!("lines {}-{}", self.start_line, self.end_line)
        } else {
            format!(
                "{}:{}-{}:{}",
                self.start_line, self.start_col, self.end_line, self.end_col
            )
        }
    }
}

/// One line of parser output, attributed to a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseRecord {
    pub file: RepoPath,
    /// `None` means the file parsed cleanly.
    pub region: Option<ErrorRegion>,
    /// The trimmed output line this record came from (synthesized records carry the path).
    pub raw: String,
}

impl ParseRecord {
    /// Record for a file that produced no error node.
    pub fn clean(file: RepoPath) -> Self {
        let raw = file.as_str().to_string();
        Self {
            file,
            region: None,
            raw,
        }
    }

    pub fn has_error(&self) -> bool {
        self.region.is_some()
    }
}
