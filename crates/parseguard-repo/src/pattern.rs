use anyhow::Context;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use parseguard_types::RepoPath;

/// Compiled include/exclude globs, matched against normalized repo paths.
///
/// Patterns follow the usual CI glob conventions:
/// - `*` and `?` never cross `/`; `**` matches any number of directories
/// - a leading `!` turns the pattern into an exclusion
/// - a pattern that matches a directory also matches everything under it
/// - patterns are normalized like paths first, so `./src/*.js` and absolute patterns under the
///   base directory work
#[derive(Clone, Debug)]
pub struct PatternSet {
    include: GlobSet,
    exclude: GlobSet,
    include_count: usize,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S], base_dir: &str) -> anyhow::Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut include_count = 0;

        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }

            let (negated, body) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, raw),
            };
            let normalized = RepoPath::normalize(body, base_dir);
            let target = if negated { &mut exclude } else { &mut include };

            // A pattern naming a directory also covers every file beneath it.
            let descendants = match normalized.as_str() {
                "." => "**".to_string(),
                p => format!("{p}/**"),
            };
            for glob in [normalized.as_str(), descendants.as_str()] {
                target.add(
                    GlobBuilder::new(glob)
                        .literal_separator(true)
                        .build()
                        .with_context(|| format!("invalid glob pattern: {raw}"))?,
                );
            }

            if !negated {
                include_count += 1;
            }
        }

        Ok(Self {
            include: include.build().context("compile include globset")?,
            exclude: exclude.build().context("compile exclude globset")?,
            include_count,
        })
    }

    /// True when at least one non-negated pattern was supplied.
    pub fn has_includes(&self) -> bool {
        self.include_count > 0
    }

    pub fn is_match(&self, path: &RepoPath) -> bool {
        self.include.is_match(path.as_str()) && !self.exclude.is_match(path.as_str())
    }
}
