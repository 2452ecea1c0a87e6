//! Text summary builder for CLI output.
//!
//! This module computes metrics and formats human-readable lines for text mode.

use crate::metrics;
use crate::model::DatasetReport;
use anyhow::{Context, Result};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from one or two processed datasets.
pub(crate) fn build_text_summary(
    current: &DatasetReport,
    comparison: Option<&DatasetReport>,
) -> Result<TextSummary> {
    let mut lines = Vec::new();
    summarize_dataset(&mut lines, "Current", current)?;
    if let Some(report) = comparison {
        lines.push(String::new());
        summarize_dataset(&mut lines, "Comparison", report)?;
    }
    Ok(TextSummary { lines })
}

fn summarize_dataset(lines: &mut Vec<String>, label: &str, report: &DatasetReport) -> Result<()> {
    lines.push(format!(
        "{label}: {} of {} runs retained, {} samples over {} buckets",
        report.runs_retained,
        report.runs_found,
        report.samples.len(),
        report.buckets.len()
    ));

    let latencies: Vec<f64> = report.samples.iter().map(|s| s.latency_s).collect();
    let (mean, median, p25, p75) = metrics::compute_metrics(&latencies)
        .context("insufficient latency data to compute metrics")?;
    lines.push(format!(
        "Latency (s):        avg {mean:.3} med {median:.3} p25 {p25:.3} p75 {p75:.3}"
    ));

    let rates: Vec<f64> = report
        .buckets
        .iter()
        .map(|b| b.throughput as f64)
        .collect();
    let (mean, median, p25, p75) = metrics::compute_metrics(&rates)
        .context("insufficient throughput data to compute metrics")?;
    lines.push(format!(
        "Throughput (req/s): avg {mean:.1} med {median:.1} p25 {p25:.1} p75 {p75:.1}"
    ));

    lines.push(format!(
        "Throughput ceiling: {} req/s",
        report.max_throughput
    ));
    if let (Some(first), Some(last)) = (report.fit.first(), report.fit.last()) {
        lines.push(format!(
            "Fitted latency:     {:.3} s at {} req/s up to {:.3} s at {} req/s",
            first.latency_s, first.throughput, last.latency_s, last.throughput
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_pipeline;
    use crate::model::PipelineConfig;

    fn report() -> DatasetReport {
        let mut text = String::from("start-time,response-time\n");
        for s in 0..4 {
            for r in 0..=s {
                text.push_str(&format!("2018-01-01T00:00:{s:02}.{r:03}Z,0.{:03}\n", 100 + r));
            }
        }
        run_pipeline(&text, &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn summary_names_counts_and_ceiling() {
        let summary = build_text_summary(&report(), None).unwrap();
        assert!(summary.lines[0].contains("1 of 1 runs retained"));
        assert!(summary
            .lines
            .iter()
            .any(|l| l.contains("Throughput ceiling: 3 req/s")));
    }

    #[test]
    fn comparison_dataset_gets_its_own_block() {
        let r = report();
        let summary = build_text_summary(&r, Some(&r)).unwrap();
        assert!(summary.lines.iter().any(|l| l.starts_with("Current:")));
        assert!(summary.lines.iter().any(|l| l.starts_with("Comparison:")));
    }
}
