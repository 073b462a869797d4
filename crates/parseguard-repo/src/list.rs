use anyhow::Context;
use camino::Utf8Path;
use parseguard_types::FileSet;
use tracing::{debug, warn};

/// Read a newline-delimited list file.
///
/// Trailing whitespace (including `\r`) is trimmed per line and blank lines are dropped.
/// A missing file yields `Ok(None)`; the caller decides whether that matters.
pub fn read_list_file(path: &Utf8Path) -> anyhow::Result<Option<Vec<String>>> {
    if !path.is_file() {
        warn!("list file not found: {}", path);
        return Ok(None);
    }

    let text = std::fs::read_to_string(path).with_context(|| format!("read list file: {path}"))?;
    let entries: Vec<String> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect();

    debug!("read {} entries from {}", entries.len(), path);
    Ok(Some(entries))
}

/// Materialize a resolved set, one path per line, so it can be merged later without re-globbing.
pub fn write_list_file(path: &Utf8Path, files: &FileSet) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }

    let mut text = String::new();
    for f in files {
        text.push_str(f.as_str());
        text.push('\n');
    }

    std::fs::write(path, text).with_context(|| format!("write list file: {path}"))?;
    debug!("wrote {} entries to {}", files.len(), path);
    Ok(())
}
