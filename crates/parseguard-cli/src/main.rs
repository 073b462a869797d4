//! CLI entry point for parseguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `parseguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use parseguard_app::{
    CheckInput, GithubActionsSink, ProcessRunner, ResolveInput, ResolveTarget, RunEnvironment,
    parse_report_json, render_annotations, render_markdown, run_check, run_resolve,
    runtime_error_report, serialize_report, to_renderable, verdict_exit_code,
};
use parseguard_settings::Overrides;
use parseguard_types::ParseguardReport;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    name = "parseguard",
    version,
    about = "Syntax check guard: run a parser over files and reconcile errors against a known-invalid allowlist"
)]
struct Cli {
    /// Workspace root; file patterns and list files are resolved against it.
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to parseguard config TOML (relative to the workspace root).
    #[arg(long, default_value = "parseguard.toml")]
    config: Utf8PathBuf,

    /// Log progress at info level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log at debug level (includes raw parser output handling).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// File set inputs shared by `check` and `resolve`.
#[derive(Args, Debug, Clone, Default)]
struct FileArgs {
    /// Glob patterns for files to check (repeatable; `!` excludes).
    #[arg(long = "files")]
    files: Vec<String>,

    /// File listing patterns or paths to check, one per line.
    #[arg(long)]
    files_list: Option<String>,

    /// How to read --files-list entries (patterns|paths).
    #[arg(long)]
    files_list_kind: Option<String>,

    /// Glob patterns for files expected to have syntax errors (repeatable).
    #[arg(long = "invalid-files")]
    invalid_files: Vec<String>,

    /// File listing known-invalid patterns or paths, one per line.
    #[arg(long)]
    invalid_files_list: Option<String>,

    /// How to read --invalid-files-list entries (patterns|paths).
    #[arg(long)]
    invalid_files_list_kind: Option<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Parser executable (e.g. `tree-sitter`).
    #[arg(long)]
    parser: Option<String>,

    /// Parser arguments placed before the file paths (repeatable; replaces the default
    /// `parse -q -t`).
    #[arg(long = "parser-arg", allow_hyphen_values = true)]
    parser_args: Vec<String>,

    /// Invocation strategy (batch|per-file).
    #[arg(long)]
    mode: Option<String>,

    #[command(flatten)]
    files: FileArgs,

    /// Maximum number of annotations to emit.
    #[arg(long)]
    max_annotations: Option<u32>,

    /// Runner OS label used to qualify annotation titles.
    #[arg(long, env = "RUNNER_OS")]
    os_name: Option<String>,

    /// File receiving job outputs.
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<Utf8PathBuf>,

    /// File receiving the Markdown step summary.
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    step_summary: Option<Utf8PathBuf>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/parseguard/report.json")]
    report_out: Utf8PathBuf,

    /// Write a Markdown report alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown report (if enabled).
    #[arg(long, default_value = "artifacts/parseguard/summary.md")]
    markdown_out: Utf8PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TargetArg {
    Files,
    InvalidFiles,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the parser over the configured files and write artifacts.
    Check(CheckArgs),

    /// Resolve a file set and print it (or write it as a list file).
    Resolve {
        /// Which file set to resolve.
        #[arg(long, value_enum, default_value_t = TargetArg::Files)]
        target: TargetArg,

        #[command(flatten)]
        files: FileArgs,

        /// Write the resolved paths here (one per line) instead of printing them.
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/parseguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/parseguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "50")]
        max: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    match &cli.cmd {
        Commands::Check(args) => cmd_check(&cli, args),
        Commands::Resolve {
            target,
            files,
            output,
        } => cmd_resolve(&cli, *target, files, output.as_deref()),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
    }
}

fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn workspace_root(cli: &Cli) -> Utf8PathBuf {
    cli.repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone())
}

/// Load config if present; a missing file is allowed (CLI flags then carry everything).
fn read_config(root: &Utf8Path, config: &Utf8Path) -> String {
    let path = root.join(config);
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            debug!("loaded config from {}", path);
            text
        }
        Err(_) => {
            debug!("no config at {}; using flags only", path);
            String::new()
        }
    }
}

fn overrides_from(files: &FileArgs) -> Overrides {
    Overrides {
        files: files.files.clone(),
        files_list: files.files_list.clone(),
        files_list_kind: files.files_list_kind.clone(),
        invalid_files: files.invalid_files.clone(),
        invalid_files_list: files.invalid_files_list.clone(),
        invalid_files_list_kind: files.invalid_files_list_kind.clone(),
        ..Overrides::default()
    }
}

fn cmd_check(cli: &Cli, args: &CheckArgs) -> anyhow::Result<()> {
    let env = RunEnvironment {
        workspace: workspace_root(cli),
        os_name: args.os_name.clone().filter(|s| !s.trim().is_empty()),
        github_output: args.github_output.clone(),
        step_summary: args.step_summary.clone(),
    };

    let result = (|| -> anyhow::Result<i32> {
        if !env.workspace.is_dir() {
            anyhow::bail!("repo root does not exist: {}", env.workspace);
        }
        let cfg_text = read_config(&env.workspace, &cli.config);

        let overrides = Overrides {
            parser: args.parser.clone(),
            parser_args: (!args.parser_args.is_empty()).then(|| args.parser_args.clone()),
            mode: args.mode.clone(),
            max_annotations: args.max_annotations,
            ..overrides_from(&args.files)
        };

        let input = CheckInput {
            env: &env,
            config_text: &cfg_text,
            overrides,
        };
        let output = run_check(input, &ProcessRunner)?;

        write_report_file(&args.report_out, &output.report).context("write report json")?;
        info!("wrote report to {}", args.report_out);

        if args.write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        let stdout = std::io::stdout();
        GithubActionsSink::new(
            &env,
            output.resolved_config.effective.max_annotations,
            stdout.lock(),
        )
        .publish(&output.report)
        .context("publish results")?;

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            error!("{err:#}");
            let report = runtime_error_report(&err, env.os_name.clone());
            let _ = write_report_file(&args.report_out, &report);
            eprintln!("parseguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_resolve(
    cli: &Cli,
    target: TargetArg,
    files: &FileArgs,
    output: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let root = workspace_root(cli);
    let cfg_text = read_config(&root, &cli.config);

    let set = run_resolve(ResolveInput {
        workspace: &root,
        config_text: &cfg_text,
        overrides: overrides_from(files),
        target: match target {
            TargetArg::Files => ResolveTarget::Files,
            TargetArg::InvalidFiles => ResolveTarget::InvalidFiles,
        },
        out: output,
    })?;

    if output.is_none() {
        for path in &set {
            println!("{path}");
        }
    }
    Ok(())
}

fn write_report_file(path: &Utf8Path, report: &ParseguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let annotations = render_annotations(&to_renderable(&report), max);

    for annotation in annotations {
        println!("{}", annotation);
    }

    Ok(())
}
