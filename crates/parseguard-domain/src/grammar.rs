//! Grammar for one line of the parser's quiet batch output.
//!
//! ```text
//! line       := path [ ws rest ]
//! rest       := anything not ending in ')'            -- clean parse
//!             | prefix '(' label ws point ' - ' point ')'   -- error node
//! point      := '[' row ',' column ']'               -- 0-based, whitespace allowed
//! ```
//!
//! The path is the token up to the first space or tab. Anything between the path and the first
//! `(` (for example timing columns) is ignored. A `rest` ending in `)` that does not match the
//! error-node production is a [`LineFormatError`]; it is never treated as a clean parse.

use crate::model::{ErrorRegion, ParseRecord};
use parseguard_types::RepoPath;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LineFormatError {
    #[error("empty output line")]
    Empty,
    #[error("error node is missing its opening parenthesis")]
    MissingOpenParen,
    #[error("error node is missing the ` - ` range separator")]
    MissingRangeSeparator,
    #[error("malformed point `{0}` (expected `[row, column]`)")]
    MalformedPoint(String),
    #[error("invalid coordinate `{0}` (expected a non-negative integer)")]
    InvalidCoordinate(String),
    #[error("error node has an empty label")]
    EmptyLabel,
}

/// Split a line into its leading path token and the trimmed remainder.
pub fn split_path_token(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.find([' ', '\t']) {
        Some(i) => (&line[..i], line[i..].trim()),
        None => (line, ""),
    }
}

/// Every way to split a line into a path and the trimmed remainder, longest path first.
///
/// Splits happen only at spaces or tabs, so a path containing spaces can still be recovered
/// when the caller knows which paths to expect. The last candidate is the first-token split
/// of [`split_path_token`].
pub fn path_candidates(line: &str) -> impl Iterator<Item = (&str, &str)> {
    let line = line.trim();
    let mut cuts: Vec<usize> = line
        .char_indices()
        .filter(|(_, c)| *c == ' ' || *c == '\t')
        .map(|(i, _)| i)
        .collect();
    if !line.is_empty() {
        cuts.push(line.len());
    }
    cuts.into_iter()
        .rev()
        .map(move |i| (line[..i].trim_end(), line[i..].trim()))
}

/// Parse one output line. The path is cleaned but not relativized.
pub fn parse_line(line: &str) -> Result<ParseRecord, LineFormatError> {
    parse_line_from(line, "")
}

/// Parse one output line, normalizing its path against `base_dir`.
pub fn parse_line_from(line: &str, base_dir: &str) -> Result<ParseRecord, LineFormatError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(LineFormatError::Empty);
    }

    let (path, rest) = split_path_token(trimmed);
    parse_parts(path, rest, trimmed, base_dir)
}

/// Build a record from a line already split into its path and remainder.
///
/// `raw` is the whole trimmed line, kept for reporting.
pub fn parse_parts(
    path: &str,
    rest: &str,
    raw: &str,
    base_dir: &str,
) -> Result<ParseRecord, LineFormatError> {
    if path.is_empty() {
        return Err(LineFormatError::Empty);
    }
    let region = if rest.ends_with(')') {
        Some(parse_error_node(rest)?)
    } else {
        None
    };

    Ok(ParseRecord {
        file: RepoPath::normalize(path, base_dir),
        region,
        raw: raw.to_string(),
    })
}

fn parse_error_node(rest: &str) -> Result<ErrorRegion, LineFormatError> {
    let open = rest.find('(').ok_or(LineFormatError::MissingOpenParen)?;
    // `rest` ends with ')' and `open` < that index, so the slice is well-formed.
    let inner = &rest[open + 1..rest.len() - 1];

    let (head, end) = inner
        .rsplit_once(" - ")
        .ok_or(LineFormatError::MissingRangeSeparator)?;

    let bracket = head
        .rfind('[')
        .ok_or_else(|| LineFormatError::MalformedPoint(head.trim().to_string()))?;
    let label = head[..bracket].trim();
    if label.is_empty() {
        return Err(LineFormatError::EmptyLabel);
    }

    let start = parse_point(&head[bracket..])?;
    let end = parse_point(end)?;
    Ok(ErrorRegion::from_zero_based(label, start, end))
}

fn parse_point(text: &str) -> Result<(u32, u32), LineFormatError> {
    let text = text.trim();
    let malformed = || LineFormatError::MalformedPoint(text.to_string());

    let inner = text
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let (row, col) = inner.split_once(',').ok_or_else(malformed)?;
    Ok((coordinate(row)?, coordinate(col)?))
}

fn coordinate(text: &str) -> Result<u32, LineFormatError> {
    let text = text.trim();
    text.parse::<u32>()
        .map_err(|_| LineFormatError::InvalidCoordinate(text.to_string()))
}
