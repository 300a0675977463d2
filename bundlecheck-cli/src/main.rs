mod config;
mod explain;

use anyhow::Context;
use bundlecheck_core::adapters::{FsConfigSource, FsWritePort};
use bundlecheck_core::pipeline::{ToolError, exit_codes, run_validate, write_report_artifacts};
use bundlecheck_core::settings::{RunMode, ValidateSettings};
use bundlecheck_core::{CancelToken, CheckPolicy};
use bundlecheck_render::render_summary_text;
use bundlecheck_types::finding::Severity;
use bundlecheck_types::report::ToolInfo;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{CliOverrides, ConfigMerger};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "bundlecheck",
    version,
    about = "Schema validator and artifact-wiring checker for infrastructure bundles."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate every bundle under a layout root and write a report.
    Validate(ValidateArgs),
    /// Explain what a finding code means and how to fix it.
    Explain(ExplainArgs),
    /// List all finding codes with their default severity.
    ListCodes(ListCodesArgs),
}

#[derive(Debug, Parser)]
struct ValidateArgs {
    /// Layout root (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Output directory for report artifacts (default: <root>/artifacts/bundlecheck).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Terminal output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Severity of SCHEMA_SHAPE_MISMATCH findings.
    #[arg(long, value_enum)]
    shape_mismatch: Option<SeverityArg>,

    /// Load-phase timeout in seconds. 0 disables the limit.
    #[arg(long)]
    load_timeout_secs: Option<u64>,

    /// Check bundles one at a time instead of on a thread pool.
    #[arg(long, default_value_t = false)]
    no_parallel: bool,

    /// Exit 0 whenever a report was written; the verdict lives in the report.
    #[arg(long, default_value_t = false)]
    report_only: bool,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Finding code to explain (e.g., "MISSING_EMISSION", "namespace-collision").
    code: String,
}

#[derive(Debug, Parser)]
struct ListCodesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SeverityArg {
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(exit_codes::TOOL_ERROR as u8)
        }
    }
}

fn real_main() -> anyhow::Result<u8> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Argument errors are tool errors (exit 1), not check failures.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().context("print usage")?;
            let code = if e.use_stderr() {
                exit_codes::TOOL_ERROR
            } else {
                exit_codes::PASSED
            };
            return Ok(code as u8);
        }
    };
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Explain(args) => cmd_explain(args).map(|()| 0),
        Command::ListCodes(args) => cmd_list_codes(args).map(|()| 0),
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<u8> {
    let root = args.root;
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| root.join("artifacts").join("bundlecheck"));

    // Load config file and merge with CLI arguments
    let file_config = config::load_or_default(&root).context("load bundlecheck.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_validate_args(&CliOverrides {
        shape_mismatch: args.shape_mismatch.map(Severity::from),
        load_timeout_secs: args.load_timeout_secs,
        no_parallel: args.no_parallel,
        report_only: args.report_only,
    });
    debug!(?merged, "merged config");

    let settings = ValidateSettings {
        root,
        out_dir,
        layout: merged.layout,
        policy: CheckPolicy {
            shape_mismatch: merged.shape_mismatch,
        },
        load_timeout: merged.load_timeout,
        parallel: merged.parallel,
        mode: if merged.report_only {
            RunMode::ReportOnly
        } else {
            RunMode::Standalone
        },
    };

    let source = FsConfigSource::new(settings.root.clone(), settings.layout.clone());
    let outcome = match run_validate(&settings, &source, tool_info(), &CancelToken::new()) {
        Ok(outcome) => outcome,
        Err(ToolError::Cancelled) => anyhow::bail!("validation cancelled"),
        Err(ToolError::Internal(e)) => return Err(e),
    };

    write_report_artifacts(&outcome, &settings.out_dir, &FsWritePort)
        .with_context(|| format!("write report artifacts to {}", settings.out_dir))?;
    info!("wrote report artifacts to {}", settings.out_dir);

    let wire = outcome.report.to_wire();
    match args.format {
        OutputFormat::Text => print!("{}", render_summary_text(&wire)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&wire)?),
    }

    let code = outcome.exit_code(settings.mode);
    Ok(u8::try_from(code).unwrap_or(exit_codes::TOOL_ERROR as u8))
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "bundlecheck".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: option_env!("BUNDLECHECK_GIT_SHA").map(str::to_string),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{format_phase, list_codes, lookup_code, phase_meaning};

    let Some(entry) = lookup_code(&args.code) else {
        let available = list_codes().join(", ");
        anyhow::bail!(
            "Unknown finding code: '{}'\n\nAvailable codes: {}",
            args.code,
            available
        );
    };
    let phase = entry.code.phase();

    println!("================================================================================");
    println!("{}: {}", entry.code, entry.title);
    println!("================================================================================");
    println!();
    println!("Code:      {}", entry.code);
    println!("Severity:  {}", entry.code.default_severity());
    println!("Phase:     {}", format_phase(phase));
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.description);
    println!();

    println!("PHASE: {}", format_phase(phase));
    println!("--------------------------------------------------------------------------------");
    println!("{}", phase_meaning(phase));
    println!();

    println!("REMEDIATION GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.remediation);
    println!();

    Ok(())
}

fn cmd_list_codes(args: ListCodesArgs) -> anyhow::Result<()> {
    use explain::{CODE_REGISTRY, format_phase};

    match args.format {
        OutputFormat::Text => {
            println!("Finding codes:\n");
            println!("  {:<26} {:<9} {:<8} TITLE", "CODE", "SEVERITY", "PHASE");
            println!("  {:<26} {:<9} {:<8} -----", "----", "--------", "-----");
            for entry in CODE_REGISTRY {
                println!(
                    "  {:<26} {:<9} {:<8} {}",
                    entry.code.as_str(),
                    entry.code.default_severity().as_str(),
                    format_phase(entry.code.phase()),
                    entry.title
                );
            }
            println!();
            println!("Use 'bundlecheck explain <CODE>' for details.");
        }
        OutputFormat::Json => {
            let codes: Vec<_> = CODE_REGISTRY
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "code": e.code,
                        "title": e.title,
                        "severity": e.code.default_severity(),
                        "phase": e.code.phase(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&codes)?);
        }
    }
    Ok(())
}
