use crate::engine;
use crate::model::{DatasetReport, PipelineConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "headroom-plot",
    version,
    about = "Render a latency-vs-throughput headroom plot from load-test logs"
)]
pub struct Cli {
    /// Performance results file produced by the load-test harness
    pub input: PathBuf,

    /// Overlay an older results file for before/after comparison
    #[arg(long)]
    pub compare: Option<PathBuf>,

    /// Output image path (defaults to `<input stem>Plot.png` next to the input)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the dataset report as JSON and skip rendering
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and skip rendering
    #[arg(long)]
    pub text: bool,

    /// Export the dataset report as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export the enriched samples as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,
}

pub fn run(args: Cli) -> Result<()> {
    let cfg = PipelineConfig::default();
    let current = process_dataset(&args.input, "current", &cfg)?;
    let comparison = args
        .compare
        .as_deref()
        .map(|path| process_dataset(path, "comparison", &cfg))
        .transpose()?;

    handle_exports(&args, &current)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&current)?);
        return Ok(());
    }
    if args.text {
        let summary = crate::text_summary::build_text_summary(&current, comparison.as_ref())?;
        for line in summary.lines {
            println!("{line}");
        }
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| crate::plot::derive_plot_path(&args.input));
    crate::plot::render(&current, comparison.as_ref(), &output)?;
    println!("saving graph to {}", output.display());
    Ok(())
}

/// Read and process one dataset; `which` names it in error messages so
/// operators can tell the current input apart from the comparison one.
fn process_dataset(path: &Path, which: &str, cfg: &PipelineConfig) -> Result<DatasetReport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("missing performance results file {}", path.display()))?;
    engine::run_pipeline(&raw, cfg)
        .with_context(|| format!("failed to process the {which} dataset ({})", path.display()))
}

/// Handle export operations (JSON and CSV) for the current dataset.
fn handle_exports(args: &Cli, report: &DatasetReport) -> Result<()> {
    if let Some(path) = args.export_json.as_deref() {
        crate::storage::export_json(path, report)?;
    }
    if let Some(path) = args.export_csv.as_deref() {
        crate::storage::export_csv(path, report)?;
    }
    Ok(())
}
