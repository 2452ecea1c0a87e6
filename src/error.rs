use thiserror::Error;

/// Fatal conditions that abort a dataset's pipeline invocation.
///
/// There is no partial or degraded output; the CLI layer adds which
/// dataset (current vs. comparison) was being processed.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The `start-time,response-time` header never appears in the input.
    #[error("no load-test runs found (missing 'start-time,response-time' header)")]
    NoRunsFound,
    /// A data row failed to parse. `line` is 1-based in the input file.
    /// Rows are never skipped; a dropped row would corrupt the throughput
    /// count of every other row in its bucket.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error(
        "not enough data to build a headroom plot; increase the number of requests or the run duration"
    )]
    InsufficientData,
    #[error("cannot fit the latency curve: the regression design is degenerate ({0})")]
    SingularFit(&'static str),
    #[error("cannot fit the latency curve: latency {0} is not positive")]
    NonPositiveLatency(f64),
}
