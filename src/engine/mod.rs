//! The headroom data pipeline.
//!
//! One invocation turns the raw text of a results file into a
//! [`DatasetReport`]: split on header markers, parse each run, trim the
//! edge buckets, concatenate what survives, aggregate throughput, and
//! fit the latency curve. Every stage is a pure transformation of its
//! input; invocations are independent and deterministic.

mod fit;
mod parse;
mod split;
mod throughput;
mod trim;

use crate::error::PipelineError;
use crate::model::{DatasetReport, PipelineConfig, Sample};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Run the whole pipeline over one dataset's raw text.
pub fn run_pipeline(
    raw_text: &str,
    cfg: &PipelineConfig,
) -> Result<DatasetReport, PipelineError> {
    let mut retained: Vec<Sample> = Vec::new();
    let mut runs_found = 0;
    let mut runs_retained = 0;

    for section in split::split_runs(raw_text) {
        runs_found += 1;
        let header_line = line_number_at(raw_text, section.offset);
        let samples = parse::parse_run(section.text, header_line)?;
        let trimmed = trim::trim_edges(&samples);
        if trimmed.is_empty() {
            debug!(
                run = runs_found,
                samples = samples.len(),
                "run trimmed to nothing, dropping"
            );
            continue;
        }
        runs_retained += 1;
        retained.extend(trimmed);
    }

    if runs_found == 0 {
        return Err(PipelineError::NoRunsFound);
    }

    let distinct_buckets: BTreeSet<i64> = retained.iter().map(Sample::bucket).collect();
    if distinct_buckets.len() < 2 {
        return Err(PipelineError::InsufficientData);
    }

    let aggregated = throughput::aggregate(&retained);
    let fit = fit::fit_curve(&aggregated.samples, cfg)?;
    let max_throughput = aggregated
        .samples
        .iter()
        .map(|s| s.throughput)
        .max()
        .unwrap_or(0);

    info!(
        runs_found,
        runs_retained,
        samples = aggregated.samples.len(),
        buckets = aggregated.buckets.len(),
        max_throughput,
        "pipeline complete"
    );

    Ok(DatasetReport {
        samples: aggregated.samples,
        buckets: aggregated.buckets,
        fit,
        max_throughput,
        runs_found,
        runs_retained,
    })
}

/// 1-based line number of the byte at `offset`.
fn line_number_at(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A run whose rows spread over `seconds` distinct seconds starting
    /// at minute `minute`, `per_second` rows in each.
    fn run_section(minute: u8, seconds: u8, per_second: u32) -> String {
        let mut out = String::from("start-time,response-time\n");
        for s in 0..seconds {
            for r in 0..per_second {
                out.push_str(&format!(
                    "2018-01-01T00:{minute:02}:{s:02}.{r:03}Z,0.{:03}\n",
                    100 + r
                ));
            }
        }
        out
    }

    #[test]
    fn missing_header_is_no_runs_found() {
        let err = run_pipeline("nothing,here\n1,2\n", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoRunsFound));
    }

    #[test]
    fn wrong_header_name_is_no_runs_found_not_a_row_error() {
        let text = "bad-header,response-time\ngarbage row that must never be parsed\n";
        let err = run_pipeline(text, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoRunsFound));
    }

    #[test]
    fn one_second_runs_are_dropped_and_the_rest_survive() {
        // Three 4-second runs trim to 2 seconds each; the 1-second run
        // trims to nothing and is dropped, not fatal.
        let text = format!(
            "{}{}{}{}",
            run_section(0, 4, 1),
            run_section(1, 4, 2),
            run_section(2, 4, 3),
            run_section(3, 1, 5),
        );
        let report = run_pipeline(&text, &PipelineConfig::default()).unwrap();
        assert_eq!(report.runs_found, 4);
        assert_eq!(report.runs_retained, 3);
        assert_eq!(report.samples.len(), 2 + 4 + 6);
    }

    #[test]
    fn four_single_rate_runs_retain_six_samples_after_trimming() {
        // The historical fixture: three 4-row runs each trim to their two
        // middle seconds, the 1-second run contributes nothing.
        let text = format!(
            "{}{}{}{}",
            run_section(0, 4, 1),
            run_section(1, 4, 1),
            run_section(2, 4, 1),
            run_section(3, 1, 4),
        );
        let mut retained = 0;
        for section in split::split_runs(&text) {
            let samples = parse::parse_run(section.text, 1).unwrap();
            retained += trim::trim_edges(&samples).len();
        }
        assert_eq!(retained, 6);
    }

    #[test]
    fn run_spanning_two_seconds_is_insufficient_data() {
        let text = run_section(0, 2, 3);
        let err = run_pipeline(&text, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData));
    }

    #[test]
    fn uniform_rate_runs_fail_as_singular_not_insufficient() {
        let text = format!("{}{}", run_section(0, 4, 2), run_section(1, 4, 2));
        let err = run_pipeline(&text, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::SingularFit(_)));
    }

    #[test]
    fn malformed_row_reports_its_absolute_line() {
        let mut text = run_section(0, 4, 1);
        text.push_str("start-time,response-time\n2018-01-01T00:01:00Z,not-a-number\n");
        let err = run_pipeline(&text, &PipelineConfig::default()).unwrap_err();
        match err {
            PipelineError::MalformedRow { line, .. } => assert_eq!(line, 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_are_deterministic() {
        let text = format!("{}{}", run_section(0, 4, 2), run_section(1, 6, 5));
        let cfg = PipelineConfig::default();
        assert_eq!(
            run_pipeline(&text, &cfg).unwrap(),
            run_pipeline(&text, &cfg).unwrap()
        );
    }

    #[test]
    fn end_to_end_report_shape() {
        let text = format!("{}{}", run_section(0, 4, 2), run_section(1, 6, 5));
        let report = run_pipeline(&text, &PipelineConfig::default()).unwrap();
        // Retained: 2 middle seconds of run one, 4 of run two.
        assert_eq!(report.samples.len(), 2 * 2 + 4 * 5);
        assert_eq!(report.max_throughput, 5);
        assert_eq!(report.fit.first().map(|p| p.throughput), Some(2));
        assert_eq!(report.fit.last().map(|p| p.throughput), Some(4));
        // The two retained windows are a minute apart, so the series
        // bridges the gap with forward-filled buckets.
        assert!(report.buckets.iter().any(|b| !b.observed));
        assert!(report.buckets.len() > report.samples.len() / 5);
    }
}
