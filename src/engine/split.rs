//! Splitting a raw multi-run log into per-run sections.
//!
//! A log file holds one CSV section per load-test run, each opened by the
//! literal `start-time,response-time` header. Sections are found by
//! scanning for that marker; everything before the first marker (if any)
//! is ignored.

use crate::model::HEADER_MARKER;

/// One run's raw text, from its header line (inclusive) to the next
/// header (exclusive) or end of input.
#[derive(Debug, Clone, Copy)]
pub struct RunSection<'a> {
    /// Byte offset of the section within the full input.
    pub offset: usize,
    pub text: &'a str,
}

/// Lazy iterator over the run sections of `text`, in document order.
///
/// Yields nothing when the header marker never occurs; that is a valid
/// "no usable data" outcome, not a parse failure. Concatenating the
/// yielded sections reconstructs the input from the first header on.
pub fn split_runs(text: &str) -> Runs<'_> {
    Runs {
        text,
        next: find_marker(text, 0),
    }
}

pub struct Runs<'a> {
    text: &'a str,
    next: Option<usize>,
}

fn find_marker(text: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(HEADER_MARKER).map(|i| from + i)
}

impl<'a> Iterator for Runs<'a> {
    type Item = RunSection<'a>;

    fn next(&mut self) -> Option<RunSection<'a>> {
        let start = self.next?;
        self.next = find_marker(self.text, start + HEADER_MARKER.len());
        let text = match self.next {
            Some(end) => &self.text[start..end],
            None => &self.text[start..],
        };
        Some(RunSection {
            offset: start,
            text,
        })
    }
}
