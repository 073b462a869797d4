//! The `resolve` use case: expand one file set and optionally materialize it as a list file.

use anyhow::Context;
use camino::Utf8Path;
use parseguard_settings::{FileSources, Overrides};
use parseguard_types::FileSet;
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveTarget {
    /// The files to check.
    #[default]
    Files,
    /// The known-invalid allowlist.
    InvalidFiles,
}

#[derive(Clone, Debug)]
pub struct ResolveInput<'a> {
    pub workspace: &'a Utf8Path,
    pub config_text: &'a str,
    pub overrides: Overrides,
    pub target: ResolveTarget,
    /// Where to write the resolved paths (one per line), relative to the workspace.
    pub out: Option<&'a Utf8Path>,
}

/// Resolve the selected file set. A written list can be fed back with list kind `paths`.
pub fn run_resolve(input: ResolveInput<'_>) -> anyhow::Result<FileSet> {
    let cfg = if input.config_text.trim().is_empty() {
        parseguard_settings::ParseguardConfigV1::default()
    } else {
        parseguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let FileSources {
        files,
        invalid_files,
    } = parseguard_settings::resolve_file_sources(&cfg, &input.overrides)
        .context("resolve config")?;

    let source = match input.target {
        ResolveTarget::Files => files,
        ResolveTarget::InvalidFiles => invalid_files,
    };
    let set = parseguard_repo::resolve_file_set(input.workspace, &source)?;

    if let Some(out) = input.out {
        let path = input.workspace.join(out);
        parseguard_repo::write_list_file(&path, &set)?;
        info!("wrote {} path(s) to {}", set.len(), path);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use parseguard_repo::{FileSetSource, ListKind};

    fn root(tmp: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn materialized_list_resolves_to_the_same_set() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = root(&tmp);
        for f in ["bad/a.txt", "bad/b.txt", "good.txt"] {
            let p = root.join(f);
            std::fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
            std::fs::write(&p, "x").expect("write");
        }

        let set = run_resolve(ResolveInput {
            workspace: &root,
            config_text: "invalid_files = [\"bad/*.txt\"]\n",
            overrides: Overrides::default(),
            target: ResolveTarget::InvalidFiles,
            out: Some(Utf8Path::new("out/invalid.txt")),
        })
        .expect("resolve");
        assert_eq!(set.len(), 2);

        let written = std::fs::read_to_string(root.join("out/invalid.txt")).expect("read");
        assert_eq!(written, "bad/a.txt\nbad/b.txt\n");

        let again = parseguard_repo::resolve_file_set(
            &root,
            &FileSetSource {
                patterns: Vec::new(),
                list_file: Some(Utf8PathBuf::from("out/invalid.txt")),
                list_kind: ListKind::Paths,
            },
        )
        .expect("re-resolve");
        assert_eq!(again, set);
    }

    #[test]
    fn cli_patterns_select_files() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = root(&tmp);
        std::fs::write(root.join("a.js"), "x").expect("write");

        let set = run_resolve(ResolveInput {
            workspace: &root,
            config_text: "",
            overrides: Overrides {
                files: vec!["*.js".to_string()],
                ..Overrides::default()
            },
            target: ResolveTarget::Files,
            out: None,
        })
        .expect("resolve");
        assert_eq!(set.iter().map(|p| p.as_str()).collect::<Vec<_>>(), vec!["a.js"]);
    }
}
