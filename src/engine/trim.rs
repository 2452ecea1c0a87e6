//! Steady-state trimming.

use crate::model::Sample;

/// Drop every sample whose bucket is the first or last observed bucket
/// of the run.
///
/// The edge buckets of a load test are systematically biased: ramp-up,
/// ramp-down, and partial seconds. Exactly one bucket comes off each end
/// regardless of run length, so a run spanning two buckets or fewer
/// trims to nothing and the caller decides whether that is fatal.
pub fn trim_edges(samples: &[Sample]) -> Vec<Sample> {
    let (first, last) = match bucket_range(samples) {
        Some(range) => range,
        None => return Vec::new(),
    };
    samples
        .iter()
        .filter(|s| {
            let bucket = s.bucket();
            bucket != first && bucket != last
        })
        .copied()
        .collect()
}

fn bucket_range(samples: &[Sample]) -> Option<(i64, i64)> {
    let first = samples.iter().map(Sample::bucket).min()?;
    let last = samples.iter().map(Sample::bucket).max()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    fn sample_at(secs: i64) -> Sample {
        Sample {
            start_time: datetime!(2018-01-01 00:00:00 UTC) + Duration::seconds(secs),
            latency_s: 0.1,
        }
    }

    #[test]
    fn four_buckets_keep_the_middle_two() {
        let run: Vec<_> = (0..4).map(sample_at).collect();
        let trimmed = trim_edges(&run);
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[0].bucket(), run[1].bucket());
        assert_eq!(trimmed[1].bucket(), run[2].bucket());
    }

    #[test]
    fn two_buckets_trim_to_nothing() {
        let run = vec![sample_at(0), sample_at(0), sample_at(1)];
        assert!(trim_edges(&run).is_empty());
    }

    #[test]
    fn single_bucket_trims_to_nothing() {
        let run = vec![sample_at(0), sample_at(0)];
        assert!(trim_edges(&run).is_empty());
    }

    #[test]
    fn empty_run_trims_to_nothing() {
        assert!(trim_edges(&[]).is_empty());
    }

    #[test]
    fn never_grows_and_strictly_shrinks_the_span() {
        let run: Vec<_> = (0..5).flat_map(|s| [sample_at(s), sample_at(s)]).collect();
        let trimmed = trim_edges(&run);
        assert!(trimmed.len() <= run.len());
        let (first, last) = bucket_range(&trimmed).unwrap();
        assert!(last - first < 4);
    }

    #[test]
    fn retrimming_peels_another_bucket_off_each_end() {
        let run: Vec<_> = (0..6).map(sample_at).collect();
        let once = trim_edges(&run);
        let twice = trim_edges(&once);
        assert_eq!(once.len(), 4);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn unsorted_input_still_trims_by_bucket() {
        let run = vec![sample_at(3), sample_at(0), sample_at(1), sample_at(2)];
        let trimmed = trim_edges(&run);
        assert_eq!(trimmed.len(), 2);
        // Input order is preserved for the survivors.
        assert_eq!(trimmed[0].bucket(), sample_at(1).bucket());
        assert_eq!(trimmed[1].bucket(), sample_at(2).bucket());
    }
}
