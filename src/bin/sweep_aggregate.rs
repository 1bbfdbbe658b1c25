//! Aggregate a directory of simulation runs.
//!
//! Usage:
//!   cargo run --bin sweep-aggregate -- analysis/data
//!   cargo run --bin sweep-aggregate -- analysis/data --json aggregates.json --parquet out/
//!
//! With no export target the aggregated series are printed to stdout.
//! Logging goes to stderr; set `RUST_LOG=debug` to trace every loaded file.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;
use sweep_aggregate::pipeline::DEFAULT_FAMILIES;
use sweep_aggregate::{storage, Pipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sweep-aggregate", author, version, about = "Cross-run mean/std of epidemic simulation sweeps")]
struct Args {
    /// Data root holding one subdirectory per experiment family
    #[arg(value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// Experiment family to aggregate (repeatable). Defaults to transmission, period and mortality
    #[arg(short, long = "family", value_name = "NAME", conflicts_with = "all")]
    families: Vec<String>,

    /// Aggregate every subdirectory of the data root
    #[arg(long, action = ArgAction::SetTrue)]
    all: bool,

    /// Data-file extension; files with other extensions are ignored
    #[arg(short, long, default_value = "txt")]
    extension: String,

    /// Write the aggregate store as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    json: Option<PathBuf>,

    /// Write one Parquet file per series under this directory
    #[arg(long, value_hint = ValueHint::DirPath)]
    parquet: Option<PathBuf>,

    /// Reduce groups on the current thread only
    #[arg(long, action = ArgAction::SetTrue)]
    sequential: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut builder = Pipeline::builder()
        .extension(args.extension.as_str())
        .parallel(!args.sequential);
    if !args.all {
        builder = if args.families.is_empty() {
            builder.families(DEFAULT_FAMILIES)
        } else {
            builder.families(args.families.iter().cloned())
        };
    }
    let pipeline = builder.build().context("Invalid configuration")?;

    let store = pipeline
        .run(&args.root)
        .with_context(|| format!("Failed to aggregate {}", args.root.display()))?;

    if let Some(path) = &args.json {
        store
            .write_json(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote aggregate store");
    }

    if let Some(dir) = &args.parquet {
        let written = storage::export_store(&store, dir)
            .with_context(|| format!("Failed to export Parquet to {}", dir.display()))?;
        info!(dir = %dir.display(), files = written.len(), "wrote parquet files");
    }

    if args.json.is_none() && args.parquet.is_none() {
        print!("{store}");
    }

    Ok(())
}
