//! Config parsing and effective configuration resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod policy;
mod resolve;

pub use model::ParseguardConfigV1;
pub use policy::{
    ConfigError, DEFAULT_MAX_ANNOTATIONS, DEFAULT_PARSER_ARGS, EffectiveConfig, InvocationMode,
};
pub use resolve::{FileSources, Overrides, ResolvedConfig, resolve_file_sources};

/// Parse `parseguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ParseguardConfigV1> {
    let cfg: ParseguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the check (config file + CLI overrides).
pub fn resolve_config(
    cfg: ParseguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
