//! Machine-readable exports of a processed dataset.

use crate::model::DatasetReport;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use time::format_description::well_known::Rfc3339;

/// Write the full dataset report as pretty-printed JSON.
pub fn export_json(path: &Path, report: &DatasetReport) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report).context("failed to serialize dataset report")?;
    Ok(())
}

/// Write the enriched samples as `start-time,latency,throughput` CSV.
pub fn export_csv(path: &Path, report: &DatasetReport) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = std::io::BufWriter::new(file);
    writeln!(out, "start-time,latency,throughput")?;
    for sample in &report.samples {
        let ts = sample
            .start_time
            .format(&Rfc3339)
            .context("failed to format sample timestamp")?;
        writeln!(out, "{ts},{},{}", sample.latency_s, sample.throughput)?;
    }
    Ok(())
}
