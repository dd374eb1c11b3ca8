//! Error types for the crossing search.

use std::time::Duration;

use manzil_ephem::ProviderError;
use thiserror::Error;

use crate::sequence::SequenceGap;

/// Failure of a crossing scan.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Scan configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Observer location failed validation.
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),
    /// Empty, reversed, or oversized time window.
    #[error("{0}")]
    InvalidWindow(String),
    /// Position provider failed.
    #[error("calculation error: {0}")]
    Provider(#[from] ProviderError),
    /// Resident memory rose above the configured ceiling.
    #[error("calculation error: memory usage {used_mb:.0} MB exceeded the {limit_mb:.0} MB limit")]
    MemoryExceeded { used_mb: f64, limit_mb: f64 },
    /// Wall-clock budget exhausted.
    #[error(
        "calculation timed out after {:.1} s (budget {} s); try a shorter time range",
        .elapsed.as_secs_f64(),
        .budget.as_secs()
    )]
    TimedOut { elapsed: Duration, budget: Duration },
    /// Detected stations skip part of the cycle.
    #[error("station sequence validation failed: {}", format_gaps(.0))]
    SequenceGaps(Vec<SequenceGap>),
}

fn format_gaps(gaps: &[SequenceGap]) -> String {
    gaps.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
