use crate::model::ParseguardConfigV1;
use crate::policy::{
    ConfigError, DEFAULT_MAX_ANNOTATIONS, DEFAULT_PARSER_ARGS, EffectiveConfig, InvocationMode,
};
use anyhow::Context;
use camino::Utf8PathBuf;
use globset::Glob;
use parseguard_repo::{FileSetSource, ListKind};

/// CLI overrides. Non-empty pattern lists replace the config's lists.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub parser: Option<String>,
    pub parser_args: Option<Vec<String>>,
    pub mode: Option<String>,
    pub files: Vec<String>,
    pub files_list: Option<String>,
    pub files_list_kind: Option<String>,
    pub invalid_files: Vec<String>,
    pub invalid_files_list: Option<String>,
    pub invalid_files_list_kind: Option<String>,
    pub max_annotations: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

/// Both file-set sources, resolved without requiring a parser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSources {
    pub files: FileSetSource,
    pub invalid_files: FileSetSource,
}

pub fn resolve_file_sources(
    cfg: &ParseguardConfigV1,
    overrides: &Overrides,
) -> anyhow::Result<FileSources> {
    let files = source(
        pick(&overrides.files, &cfg.files),
        overrides.files_list.as_ref().or(cfg.files_list.as_ref()),
        overrides
            .files_list_kind
            .as_deref()
            .or(cfg.files_list_kind.as_deref()),
    )
    .context("resolve files")?;

    let invalid_files = source(
        pick(&overrides.invalid_files, &cfg.invalid_files),
        overrides
            .invalid_files_list
            .as_ref()
            .or(cfg.invalid_files_list.as_ref()),
        overrides
            .invalid_files_list_kind
            .as_deref()
            .or(cfg.invalid_files_list_kind.as_deref()),
    )
    .context("resolve invalid_files")?;

    Ok(FileSources {
        files,
        invalid_files,
    })
}

pub fn resolve_config(
    cfg: ParseguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let parser = overrides
        .parser
        .as_deref()
        .or(cfg.parser.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingParser)?;

    let parser_args = overrides
        .parser_args
        .clone()
        .or(cfg.parser_args.clone())
        .unwrap_or_else(|| DEFAULT_PARSER_ARGS.iter().map(|s| s.to_string()).collect());

    let mode = match overrides.mode.as_deref().or(cfg.mode.as_deref()) {
        Some(m) => parse_mode(m)?,
        None => InvocationMode::default(),
    };

    let FileSources {
        files,
        invalid_files,
    } = resolve_file_sources(&cfg, &overrides)?;
    if files.is_empty() {
        return Err(ConfigError::NoFileInputs.into());
    }

    let max_annotations = overrides
        .max_annotations
        .or(cfg.max_annotations)
        .map(|m| m as usize)
        .unwrap_or(DEFAULT_MAX_ANNOTATIONS);

    Ok(ResolvedConfig {
        effective: EffectiveConfig {
            parser,
            parser_args,
            mode,
            files,
            invalid_files,
            max_annotations,
        },
    })
}

fn pick<'a>(cli: &'a [String], cfg: &'a [String]) -> &'a [String] {
    if cli.iter().any(|p| !p.trim().is_empty()) {
        cli
    } else {
        cfg
    }
}

/// Build a source from raw inputs. Multi-line values (as passed by CI inputs) are split per line.
fn source(
    patterns: &[String],
    list_file: Option<&String>,
    kind: Option<&str>,
) -> anyhow::Result<FileSetSource> {
    let patterns: Vec<String> = patterns
        .iter()
        .flat_map(|p| p.lines())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    validate_patterns(&patterns)?;

    let list_kind = match kind {
        Some(k) => parse_list_kind(k)?,
        None => ListKind::default(),
    };

    Ok(FileSetSource {
        patterns,
        list_file: list_file
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .map(Utf8PathBuf::from),
        list_kind,
    })
}

fn validate_patterns(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        let body = pattern.strip_prefix('!').unwrap_or(pattern);
        Glob::new(body).with_context(|| format!("invalid glob pattern: {pattern}"))?;
    }
    Ok(())
}

fn parse_mode(v: &str) -> Result<InvocationMode, ConfigError> {
    match v {
        "batch" => Ok(InvocationMode::Batch),
        "per-file" | "per_file" | "single" => Ok(InvocationMode::PerFile),
        other => Err(ConfigError::UnknownMode(other.to_string())),
    }
}

fn parse_list_kind(v: &str) -> Result<ListKind, ConfigError> {
    match v {
        "patterns" | "globs" => Ok(ListKind::Patterns),
        "paths" | "resolved" => Ok(ListKind::Paths),
        other => Err(ConfigError::UnknownListKind(other.to_string())),
    }
}
