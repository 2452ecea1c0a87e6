//! Parsing one run section into latency samples.

use crate::error::PipelineError;
use crate::model::Sample;
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

// `hey`-style harnesses write RFC 3339; older ones drop the offset or use
// a space separator. The offset-free forms are assumed UTC.
const T_SEPARATED: &[BorrowedFormatItem<'static>] = format_description!(
    version = 2,
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const SPACE_SEPARATED: &[BorrowedFormatItem<'static>] = format_description!(
    version = 2,
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Parse a section's data rows into samples, in input order.
///
/// The first line is the schema header and is skipped; blank lines are
/// tolerated. Any other unparseable line is fatal: `line_offset` is the
/// 1-based line number of the section's header within the whole input,
/// so errors name absolute positions.
pub fn parse_run(section: &str, line_offset: usize) -> Result<Vec<Sample>, PipelineError> {
    let mut samples = Vec::new();
    for (idx, line) in section.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_row(line, line_offset + idx)?);
    }
    Ok(samples)
}

fn parse_row(line: &str, line_no: usize) -> Result<Sample, PipelineError> {
    let malformed = |reason: String| PipelineError::MalformedRow {
        line: line_no,
        reason,
    };

    let mut fields = line.split(',');
    let (Some(raw_time), Some(raw_latency), None) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(format!(
            "expected 2 comma-separated fields, got {}",
            line.split(',').count()
        )));
    };

    let start_time = parse_timestamp(raw_time.trim()).map_err(malformed)?;
    let latency_s = raw_latency
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(format!("unparseable latency '{}'", raw_latency.trim())))?;

    Ok(Sample {
        start_time,
        latency_s,
    })
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, String> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    PrimitiveDateTime::parse(raw, T_SEPARATED)
        .or_else(|_| PrimitiveDateTime::parse(raw, SPACE_SEPARATED))
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| format!("unparseable timestamp '{raw}'"))
}
