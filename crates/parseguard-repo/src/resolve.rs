use crate::list::read_list_file;
use crate::pattern::PatternSet;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use parseguard_types::{FileSet, RepoPath};
use tracing::{debug, info};
use walkdir::WalkDir;

/// How the entries of a list file are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListKind {
    /// Raw glob patterns, expanded like any other pattern.
    #[default]
    Patterns,
    /// Already-resolved paths (e.g. written by `write_list_file`), merged as-is.
    Paths,
}

/// Inputs describing one file set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSetSource {
    pub patterns: Vec<String>,
    pub list_file: Option<Utf8PathBuf>,
    pub list_kind: ListKind,
}

impl FileSetSource {
    /// True when neither patterns nor a list file were supplied.
    pub fn is_empty(&self) -> bool {
        self.patterns.iter().all(|p| p.trim().is_empty()) && self.list_file.is_none()
    }
}

/// Resolve `source` into a deduplicated set of files under `base_dir`.
///
/// Behavior:
/// - Patterns (plus list-file patterns) are expanded against the tree under `base_dir`. Only
///   files are returned; a pattern naming a directory selects the files beneath it, and
///   patterns without matches are silently dropped.
/// - List-file paths are normalized and merged without touching the filesystem.
/// - Relative list-file locations are resolved against `base_dir`.
pub fn resolve_file_set(base_dir: &Utf8Path, source: &FileSetSource) -> anyhow::Result<FileSet> {
    let base = base_dir.as_str();
    let mut patterns: Vec<String> = source.patterns.clone();
    let mut files = FileSet::new();

    if let Some(list) = &source.list_file {
        let list_path = base_dir.join(list);
        if let Some(entries) = read_list_file(&list_path)? {
            match source.list_kind {
                ListKind::Patterns => patterns.extend(entries),
                ListKind::Paths => {
                    files.extend(entries.iter().map(|e| RepoPath::normalize(e.trim(), base)))
                }
            }
        }
    }

    let set = PatternSet::compile(&patterns, base)?;
    if set.has_includes() {
        let matched = expand(base_dir, &set).context("expand glob patterns")?;
        debug!("{} pattern(s) matched {} file(s)", patterns.len(), matched.len());
        files.extend(matched);
    }

    info!("resolved {} file(s) under {}", files.len(), base_dir);
    Ok(files)
}

fn expand(base_dir: &Utf8Path, set: &PatternSet) -> anyhow::Result<Vec<RepoPath>> {
    let mut out = Vec::new();

    let walker = WalkDir::new(base_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                continue;
            }
        };
        // Follows symlinks so linked files count; directories never match.
        if !entry.path().is_file() {
            continue;
        }
        let Some(abs) = Utf8Path::from_path(entry.path()) else {
            debug!("skipping non-UTF-8 path: {}", entry.path().display());
            continue;
        };

        let rel = RepoPath::normalize(abs.as_str(), base_dir.as_str());
        if set.is_match(&rel) {
            out.push(rel);
        }
    }

    Ok(out)
}
