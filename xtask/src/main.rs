use anyhow::Context;
use bundlecheck_loader::{GENERATED_MARKER, LayoutConfig, sha256_hex};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by bundlecheck.
    PrintSchemas,
    /// Create an empty layout (bundles/, artifact-definitions/, bundlecheck.toml).
    InitLayout {
        #[arg(long, default_value = ".")]
        dir: Utf8PathBuf,
    },
    /// Write or refresh the generated-file marker at the top of a file.
    Stamp { file: Utf8PathBuf },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
    /// Run bundlecheck validate against a layout root.
    Validate {
        #[arg(long, default_value = ".")]
        root: Utf8PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", bundlecheck_types::schema::BUNDLECHECK_REPORT_V1);
        }
        Command::InitLayout { dir } => {
            let created = init_layout(&dir)?;
            for path in created {
                println!("created {path}");
            }
        }
        Command::Stamp { file } => {
            let contents =
                fs::read_to_string(&file).with_context(|| format!("read {file}"))?;
            fs::write(&file, stamp(&contents)).with_context(|| format!("write {file}"))?;
            println!("stamped {file}");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "bundlecheck-core", "--test", "golden_fixtures"])
                .env("BUNDLECHECK_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::Validate { root } => {
            let status = ProcessCommand::new("cargo")
                .args(["run", "-p", "bundlecheck", "--", "validate", "--root"])
                .arg(root.as_str())
                .status()
                .context("run bundlecheck validate")?;
            if !status.success() {
                anyhow::bail!("validate failed");
            }
        }
    }
    Ok(())
}

/// First path segment of a layout glob, i.e. the directory to scaffold.
fn glob_dir(pattern: &str) -> Option<&str> {
    pattern
        .split('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(['*', '?', '[']))
}

/// Scaffolds the default layout under `dir`. Existing files are left alone.
fn init_layout(dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let layout = LayoutConfig::default();
    let mut created = Vec::new();

    for pattern in [&layout.bundles, &layout.definitions] {
        if let Some(sub) = glob_dir(pattern) {
            let path = dir.join(sub);
            if !path.exists() {
                fs::create_dir_all(&path).with_context(|| format!("create {path}"))?;
                created.push(path);
            }
        }
    }

    let config = dir.join("bundlecheck.toml");
    if !config.exists() {
        let types = layout
            .artifact_resource_types
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let contents = format!(
            "[layout]\n\
             bundles = \"{}\"\n\
             definitions = \"{}\"\n\
             emissions_manifest = \"{}\"\n\
             implementation = \"{}\"\n\
             artifact_resource_types = [{types}]\n\
             \n\
             [policy]\n\
             shape_mismatch = \"warning\"\n\
             \n\
             [run]\n\
             load_timeout_secs = 30\n\
             parallel = true\n",
            layout.bundles, layout.definitions, layout.emissions_manifest, layout.implementation,
        );
        fs::create_dir_all(dir).with_context(|| format!("create {dir}"))?;
        fs::write(&config, contents).with_context(|| format!("write {config}"))?;
        created.push(config);
    }

    Ok(created)
}

/// Prepends a fresh marker line, replacing any existing one.
fn stamp(contents: &str) -> String {
    let body = match contents.split_once('\n') {
        Some((first, rest)) if first.starts_with(GENERATED_MARKER) => rest,
        None if contents.starts_with(GENERATED_MARKER) => "",
        _ => contents,
    };
    format!(
        "{GENERATED_MARKER} sha256:{}\n{body}",
        sha256_hex(body.as_bytes())
    )
}
