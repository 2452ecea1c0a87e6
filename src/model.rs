use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Header line that opens every run section in a raw log file.
pub const HEADER_MARKER: &str = "start-time,response-time";

/// One request as recorded by the load-test harness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub start_time: OffsetDateTime,
    pub latency_s: f64,
}

impl Sample {
    /// Bucket key: the timestamp truncated to the whole second.
    pub fn bucket(&self) -> i64 {
        self.start_time.unix_timestamp()
    }
}

/// A sample joined with the request count of its own bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSample {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub latency_s: f64,
    pub throughput: u64,
}

/// One second of the gapless throughput series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    /// Unix second the bucket starts at.
    pub bucket: i64,
    pub throughput: u64,
    /// False when the count was forward-filled into an unobserved second.
    pub observed: bool,
}

/// A point of the fitted latency-vs-throughput curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitPoint {
    pub throughput: u64,
    pub latency_s: f64,
}

/// Everything the pipeline derives from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub samples: Vec<EnrichedSample>,
    pub buckets: Vec<BucketCount>,
    pub fit: Vec<FitPoint>,
    /// Highest per-sample throughput observed; the plot's x-axis ceiling.
    pub max_throughput: u64,
    pub runs_found: usize,
    /// Runs that still had samples after edge trimming.
    pub runs_retained: usize,
}

/// Knobs for one pipeline invocation. Bucket width is fixed at one second;
/// only the fit loop is tunable so tests can tighten it.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub max_fit_iterations: usize,
    pub fit_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_fit_iterations: 50,
            fit_tolerance: 1e-8,
        }
    }
}
