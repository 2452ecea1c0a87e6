//! Headroom plot rendering.
//!
//! Draws the latency-vs-throughput scatter with the fitted trend line
//! overlaid, one color per dataset, and writes a PNG.

use crate::model::DatasetReport;
use anyhow::{anyhow, Context, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

const PLOT_SIZE: (u32, u32) = (1080, 720);

/// Derive `<stem>Plot.png` next to the input file.
pub fn derive_plot_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("headroom");
    input.with_file_name(format!("{stem}Plot.png"))
}

/// Render one or two datasets to `output`.
pub fn render(
    current: &DatasetReport,
    comparison: Option<&DatasetReport>,
    output: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output, PLOT_SIZE).into_drawing_area();
    draw(&root, current, comparison).map_err(|e| anyhow!("plotting error: {e}"))?;
    root.present()
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), "rendered headroom plot");
    Ok(())
}

type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw(
    root: &DrawingArea<BitMapBackend, Shift>,
    current: &DatasetReport,
    comparison: Option<&DatasetReport>,
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&WHITE)?;

    let x_max = comparison
        .map(|r| r.max_throughput)
        .unwrap_or(0)
        .max(current.max_throughput) as f64;
    let y_max = std::iter::once(current)
        .chain(comparison)
        .flat_map(|r| r.samples.iter().map(|s| s.latency_s))
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(root)
        .caption("Headroom plot", ("sans-serif", 28).into_font())
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(0.0..x_max * 1.02, 0.0..y_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Throughput (requests/sec)")
        .y_desc("Latency (sec)")
        .draw()?;

    let labelled = comparison.is_some();
    draw_dataset(&mut chart, current, BLUE, labelled.then_some("after"))?;
    if let Some(report) = comparison {
        draw_dataset(&mut chart, report, RED, Some("before"))?;
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_dataset(
    chart: &mut Chart,
    report: &DatasetReport,
    color: RGBColor,
    label: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    chart.draw_series(report.samples.iter().map(|s| {
        Circle::new(
            (s.throughput as f64, s.latency_s),
            2,
            color.mix(0.2).filled(),
        )
    }))?;

    let line = chart.draw_series(LineSeries::new(
        report
            .fit
            .iter()
            .map(|p| (p.throughput as f64, p.latency_s)),
        color.stroke_width(2),
    ))?;
    if let Some(name) = label {
        line.label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_path_is_derived_from_the_input_stem() {
        let path = derive_plot_path(Path::new("/tmp/perfResults.csv"));
        assert_eq!(path, Path::new("/tmp/perfResultsPlot.png"));
    }

    #[test]
    fn plot_path_without_extension_still_works() {
        let path = derive_plot_path(Path::new("results"));
        assert_eq!(path, Path::new("resultsPlot.png"));
    }
}
