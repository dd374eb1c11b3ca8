//! Error types for station table construction.

use thiserror::Error;

/// Errors raised while building a [`StationTable`](crate::StationTable).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StationError {
    #[error("station table must contain at least one station")]
    EmptyTable,
    #[error("threshold {threshold_deg} deg of station {id} is outside [0, 360)")]
    ThresholdOutOfRange { id: u8, threshold_deg: f64 },
    #[error("stations {first} and {second} share threshold {threshold_deg} deg")]
    DuplicateThreshold {
        first: u8,
        second: u8,
        threshold_deg: f64,
    },
    #[error("station id {0} appears more than once")]
    DuplicateId(u8),
    #[error("station id {0} is outside 1..=28")]
    IdOutOfRange(u8),
}
