//! reportkit - build test reports from launch results
//!
//! ## Commands
//!
//! - `generate`: run every registered aggregator and write the report
//! - `plugins`: list the built-in catalog and extension capabilities
//! - `version`: print the resolved generator version

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use reportkit_core::metrics::METRICS;
use reportkit_core::{
    BootstrapContext, Catalog, Configuration, ConfigurationBuilder, FsReportStorage,
    GenerateSettings, GenerationReport, LaunchResults,
};

#[derive(Parser)]
#[command(name = "reportkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plugin-driven test report generator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report from launch result files or directories
    Generate {
        /// Launch JSON files, or directories of them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (env: REPORTKIT_OUTPUT)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report name (env: REPORTKIT_REPORT_NAME)
        #[arg(short, long)]
        name: Option<String>,

        /// Run aggregators concurrently (env: REPORTKIT_CONCURRENT)
        #[arg(long)]
        concurrent: bool,

        /// Stop at the first failing aggregator (env: REPORTKIT_FAIL_FAST)
        #[arg(long)]
        fail_fast: bool,

        /// Cap on aggregators running at once in concurrent mode
        /// (env: REPORTKIT_MAX_PARALLEL)
        #[arg(long)]
        max_parallel: Option<usize>,

        /// Directory holding report-version.txt (env: REPORTKIT_RESOURCES)
        #[arg(long)]
        resources: Option<PathBuf>,
    },

    /// List built-in plugins and the capabilities of their extensions
    Plugins,

    /// Print the resolved generator version
    Version {
        /// Directory holding report-version.txt (env: REPORTKIT_RESOURCES)
        #[arg(long)]
        resources: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    reportkit_core::telemetry::init_tracing(cli.json, level);

    let mut settings =
        GenerateSettings::from_env().context("Failed to read REPORTKIT_* settings")?;

    match cli.command {
        Commands::Generate {
            inputs,
            output,
            name,
            concurrent,
            fail_fast,
            max_parallel,
            resources,
        } => {
            apply_overrides(&mut settings, output, name, concurrent, fail_fast, resources);
            if max_parallel.is_some() {
                settings.max_parallel = max_parallel;
            }
            cmd_generate(&settings, &inputs).await.map(|_| ())
        }
        Commands::Plugins => cmd_plugins(&settings),
        Commands::Version { resources } => {
            if resources.is_some() {
                settings.resources = resources;
            }
            cmd_version(&settings)
        }
    }
}

/// Command-line values win over environment settings; flags only switch on.
fn apply_overrides(
    settings: &mut GenerateSettings,
    output: Option<PathBuf>,
    name: Option<String>,
    concurrent: bool,
    fail_fast: bool,
    resources: Option<PathBuf>,
) {
    if let Some(output) = output {
        settings.output = output;
    }
    if name.is_some() {
        settings.report_name = name;
    }
    settings.concurrent |= concurrent;
    settings.fail_fast |= fail_fast;
    if resources.is_some() {
        settings.resources = resources;
    }
}

/// Expand inputs into launch files. Directories contribute every `*.json`
/// file they contain, sorted by path. `manifest.json` is never a launch.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_launch_file(p))
                .collect();
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("Input not found: {}", input.display());
        }
    }
    Ok(files)
}

fn is_launch_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path.file_name().is_some_and(|name| name != "manifest.json")
}

fn load_launches(files: &[PathBuf]) -> Result<Vec<LaunchResults>> {
    files
        .iter()
        .map(|path| {
            LaunchResults::from_json_file(path)
                .with_context(|| format!("Failed to load launch {}", path.display()))
        })
        .collect()
}

fn build_configuration(settings: &GenerateSettings) -> Configuration {
    let ctx = BootstrapContext::new(settings.version_resolver().resolve());
    let mut builder = ConfigurationBuilder::new();
    builder.use_catalog(&Catalog::builtin(), &ctx);
    if let Some(name) = &settings.report_name {
        builder.with_report_name(name.clone());
    }
    builder.build()
}

async fn cmd_generate(
    settings: &GenerateSettings,
    inputs: &[PathBuf],
) -> Result<GenerationReport> {
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        bail!("No launch files found in the given inputs");
    }
    let launches = load_launches(&files)?;
    info!(launches = launches.len(), output = %settings.output.display(), "launches loaded");

    let config = build_configuration(settings);
    let storage = Arc::new(
        FsReportStorage::new(&settings.output)
            .with_context(|| format!("Failed to create {}", settings.output.display()))?,
    );

    let report = settings
        .generator()
        .run(&config, Arc::new(launches), storage.clone())
        .await;

    let manifest = storage
        .flush()
        .with_context(|| format!("Failed to write report to {}", settings.output.display()))?;
    METRICS.flush();

    println!("Report: {}", report.report_name);
    println!("Launches: {}", files.len());
    for outcome in &report.outcomes {
        match &outcome.error {
            None => println!(
                "  ✓ {} ({} ms, {} artifact(s))",
                outcome.name,
                outcome.duration_ms,
                outcome.artifacts.len()
            ),
            Some(e) => println!("  ✗ {}: {}", outcome.name, e),
        }
    }
    for name in &report.skipped {
        println!("  - {} (skipped)", name);
    }
    println!(
        "Wrote {} artifact(s) to {}",
        manifest.len(),
        storage.root().display()
    );

    if report.is_success() {
        println!("\n✓ Report generated");
    } else {
        println!("\n✗ Report generated with failures");
    }
    report.into_result()
}

fn cmd_plugins(settings: &GenerateSettings) -> Result<()> {
    let config = build_configuration(settings);

    println!("Catalog:");
    for name in Catalog::builtin().names() {
        println!("  {}", name);
    }
    println!("\nExtensions:");
    for extension in config.extensions() {
        let caps: Vec<String> = extension
            .capabilities()
            .iter()
            .map(|c| c.to_string())
            .collect();
        let caps = if caps.is_empty() {
            "-".to_string()
        } else {
            caps.join(", ")
        };
        println!("  {:<14} {}", extension.name(), caps);
    }
    Ok(())
}

fn cmd_version(settings: &GenerateSettings) -> Result<()> {
    println!("{}", settings.version_resolver().resolve());
    Ok(())
}
