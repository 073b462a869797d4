use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical repo-relative path used as the identity key for every file.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`, no `.` segments, no repeated separators
/// - relative to the base directory when the input is absolute and lives under it
/// - absolute paths outside the base are preserved (with forward slashes)
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(clean(&Split::of(s.as_ref()), None))
    }

    /// Normalize `path` against `base_dir`.
    ///
    /// Absolute inputs under an absolute `base_dir` become relative to it; everything else is
    /// only cleaned. The result is stable: normalizing an already normalized path is a no-op.
    pub fn normalize<P: AsRef<str>, B: AsRef<str>>(path: P, base_dir: B) -> Self {
        let path = Split::of(path.as_ref());
        let base = Split::of(base_dir.as_ref());
        Self(clean(&path, Some(&base)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    pub fn join(&self, segment: &str) -> RepoPath {
        let base = Utf8Path::new(self.as_str());
        RepoPath::new(base.join(segment).as_str())
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}

/// A path split into its root kind and meaningful segments.
struct Split<'a> {
    root: Root<'a>,
    segments: Vec<&'a str>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Root<'a> {
    Relative,
    Slash,
    /// Windows drive letter, e.g. `C:`.
    Drive(&'a str),
}

impl<'a> Split<'a> {
    fn of(raw: &'a str) -> Self {
        // Backslashes are only separators; splitting on both avoids allocating a copy.
        let mut parts = raw
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .peekable();

        let root = if raw.starts_with(['/', '\\']) {
            Root::Slash
        } else if let Some(first) = parts.peek().copied()
            && is_drive(first)
            && raw.starts_with(first)
        {
            parts.next();
            Root::Drive(first)
        } else {
            Root::Relative
        };

        Split {
            root,
            segments: parts.collect(),
        }
    }

    fn is_absolute(&self) -> bool {
        self.root != Root::Relative
    }
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn same_root(a: Root<'_>, b: Root<'_>) -> bool {
    match (a, b) {
        (Root::Slash, Root::Slash) => true,
        (Root::Drive(x), Root::Drive(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

fn clean(path: &Split<'_>, base: Option<&Split<'_>>) -> String {
    if let Some(base) = base
        && path.is_absolute()
        && base.is_absolute()
        && same_root(path.root, base.root)
        && path.segments.starts_with(&base.segments)
    {
        let rest = &path.segments[base.segments.len()..];
        return if rest.is_empty() {
            ".".to_string()
        } else {
            rest.join("/")
        };
    }

    let joined = path.segments.join("/");
    match path.root {
        Root::Relative if joined.is_empty() => ".".to_string(),
        Root::Relative => joined,
        Root::Slash => format!("/{joined}"),
        Root::Drive(d) => format!("{d}/{joined}"),
    }
}
