//! Lunar station crossing search.
//!
//! This crate provides:
//! - The station crossing detector: a minute-resolution sweep of Moon
//!   longitudes against the station boundaries, emitting one event at the
//!   closest approach of every run inside the tolerance band
//! - A chunked scan driver that bounds memory and wall-clock cost by
//!   querying the position provider one day at a time, carrying per-station
//!   run state across chunk boundaries
//! - A post-hoc validator that the detected stations form the cycle
//!   1 -> 2 -> ... -> 28 -> 1

pub mod crossing;
pub mod crossing_types;
pub mod driver;
pub mod error;
pub mod monitor;
pub mod sequence;
pub mod window;

pub use crossing::{CrossingScanner, detect_crossings};
pub use crossing_types::{
    CHUNK_SPAN_MINUTES, CrossingEvent, DEFAULT_TOLERANCE_DEG, MAX_LUNAR_RATE_DEG_PER_DAY,
    MissedPass, SAMPLE_CADENCE_SECS, ScanConfig,
};
pub use driver::{search_station_crossings, search_station_crossings_with_monitor};
pub use error::SearchError;
pub use monitor::{ProcessMonitor, ScanMonitor};
pub use sequence::{SequenceGap, find_sequence_gaps, validate_sequence};
pub use window::ScanWindow;
