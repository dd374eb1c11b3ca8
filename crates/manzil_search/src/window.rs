//! Requested scan window and its minute-cadence sampling grid.

use std::ops::Range;

use chrono::{DateTime, TimeDelta, Utc};

use crate::crossing_types::{CHUNK_SPAN_MINUTES, SAMPLE_CADENCE_SECS};
use crate::error::SearchError;

/// A closed UTC interval `[start, end]` sampled every minute from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ScanWindow {
    /// Create a window. `end` must be strictly after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SearchError> {
        if end <= start {
            return Err(SearchError::InvalidWindow(
                "end time must be after start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Reject windows longer than `max_span`. A span equal to the limit is
    /// accepted.
    pub fn validate_span(&self, max_span: TimeDelta) -> Result<(), SearchError> {
        if self.span() > max_span {
            return Err(SearchError::InvalidWindow(format!(
                "time span cannot exceed {}",
                describe_span(max_span)
            )));
        }
        Ok(())
    }

    /// Number of grid instants in the window, both ends included when the
    /// span is a whole number of minutes.
    pub fn sample_count(&self) -> usize {
        let step_ms = SAMPLE_CADENCE_SECS * 1000;
        (self.span().num_milliseconds() / step_ms) as usize + 1
    }

    /// Grid instant with index `i`.
    pub fn instant(&self, i: usize) -> DateTime<Utc> {
        self.start + TimeDelta::seconds(SAMPLE_CADENCE_SECS * i as i64)
    }

    /// Grid instants for a range of sample indices.
    pub fn instants(&self, range: Range<usize>) -> Vec<DateTime<Utc>> {
        range.map(|i| self.instant(i)).collect()
    }

    pub fn chunk_count(&self) -> usize {
        self.sample_count().div_ceil(CHUNK_SPAN_MINUTES)
    }

    /// Sample index ranges of the one-day chunks, in order.
    pub fn chunks(&self) -> impl Iterator<Item = Range<usize>> + use<> {
        let n = self.sample_count();
        (0..n)
            .step_by(CHUNK_SPAN_MINUTES)
            .map(move |lo| lo..(lo + CHUNK_SPAN_MINUTES).min(n))
    }
}

/// Largest whole unit that expresses `span` exactly, e.g. `31 days` or
/// `36 hours`.
fn describe_span(span: TimeDelta) -> String {
    let unit = |n: i64, name: &str| {
        if n == 1 {
            format!("1 {name}")
        } else {
            format!("{n} {name}s")
        }
    };
    let secs = span.num_seconds();
    if secs % 86_400 == 0 {
        unit(secs / 86_400, "day")
    } else if secs % 3_600 == 0 {
        unit(secs / 3_600, "hour")
    } else if secs % 60 == 0 {
        unit(secs / 60, "minute")
    } else {
        unit(secs, "second")
    }
}
