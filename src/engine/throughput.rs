//! Throughput aggregation over one-second buckets.

use crate::model::{BucketCount, EnrichedSample, Sample};
use std::collections::BTreeMap;

/// The enriched table plus the gapless per-second series behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregated {
    pub samples: Vec<EnrichedSample>,
    pub buckets: Vec<BucketCount>,
}

/// Derive throughput from a trimmed sample set.
///
/// Samples are counted per bucket; the series then covers every second
/// between the first and last observed bucket. A second with no samples
/// starts as zero and takes the nearest earlier bucket's count instead:
/// an unobserved second is an instrumentation gap, and a hard zero there
/// would drag the regression down. Observed buckets are never altered
/// and nothing is filled backward. Each sample is finally joined to its
/// own bucket's count, preserving input order.
pub fn aggregate(samples: &[Sample]) -> Aggregated {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.bucket()).or_insert(0) += 1;
    }

    let buckets = fill_series(&counts);
    let samples = samples
        .iter()
        .map(|s| EnrichedSample {
            start_time: s.start_time,
            latency_s: s.latency_s,
            throughput: counts.get(&s.bucket()).copied().unwrap_or(0),
        })
        .collect();

    Aggregated { samples, buckets }
}

fn fill_series(counts: &BTreeMap<i64, u64>) -> Vec<BucketCount> {
    let (first, last) = match (counts.first_key_value(), counts.last_key_value()) {
        (Some((&first, _)), Some((&last, _))) => (first, last),
        _ => return Vec::new(),
    };

    let mut series = Vec::with_capacity((last - first + 1) as usize);
    let mut carry = 0;
    for bucket in first..=last {
        match counts.get(&bucket) {
            Some(&count) => {
                carry = count;
                series.push(BucketCount {
                    bucket,
                    throughput: count,
                    observed: true,
                });
            }
            None => series.push(BucketCount {
                bucket,
                throughput: carry,
                observed: false,
            }),
        }
    }
    series
}
