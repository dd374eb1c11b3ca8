//! Position provider errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::location::GeoLocation;

/// Failure to produce Moon positions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("ephemeris data unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable ephemeris table: {0}")]
    Csv(#[from] csv::Error),
    #[error("ephemeris table contains no rows")]
    EmptyTable,
    #[error("ephemeris table rows are not strictly increasing in time at row {row}")]
    Unsorted { row: usize },
    #[error("non-finite position in ephemeris table at row {row}")]
    NonFinite { row: usize },
    #[error("instant {instant} is outside ephemeris coverage {first} .. {last}")]
    OutOfRange {
        instant: DateTime<Utc>,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
    },
    #[error("provider returned {got} positions for {expected} instants")]
    LengthMismatch { expected: usize, got: usize },
    #[error("invalid observer location: {0}")]
    InvalidLocation(&'static str),
    #[error("malformed site header in ephemeris table: {0}")]
    BadSiteHeader(String),
    #[error("ephemeris table was computed for {table}, not for the observer at {requested}")]
    SiteMismatch {
        table: GeoLocation,
        requested: GeoLocation,
    },
    #[error("requested instants are not strictly increasing at index {index}")]
    UnorderedInstants { index: usize },
    #[error("provider returned a non-finite position at index {index}")]
    NonFinitePosition { index: usize },
}
