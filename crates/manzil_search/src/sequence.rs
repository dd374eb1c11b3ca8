//! Station sequence validation.
//!
//! Over any window the Moon passes the station boundaries in ascending id
//! order, wrapping from the last station back to 1. Each adjacent pair of
//! detected events must therefore step by exactly one station.

use std::fmt;

use manzil_stations::StationId;

use crate::crossing_types::CrossingEvent;
use crate::error::SearchError;

/// A break in the expected station cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGap {
    /// Station of the earlier event.
    pub from: StationId,
    /// Station of the later event.
    pub to: StationId,
    /// Index of the earlier event in the checked sequence.
    pub position: usize,
}

impl fmt::Display for SequenceGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing station between {} and {}",
            self.from.get(),
            self.to.get()
        )
    }
}

fn successor(id: StationId, station_count: u8) -> u8 {
    if id.get() >= station_count {
        1
    } else {
        id.get() + 1
    }
}

/// All adjacent pairs in `ids` that do not step to the next station.
pub fn find_sequence_gaps(ids: &[StationId], station_count: u8) -> Vec<SequenceGap> {
    ids.windows(2)
        .enumerate()
        .filter(|(_, w)| w[1].get() != successor(w[0], station_count))
        .map(|(position, w)| SequenceGap {
            from: w[0],
            to: w[1],
            position,
        })
        .collect()
}

/// Check that `events` follow the station cycle. Fewer than two events
/// always pass.
pub fn validate_sequence(events: &[CrossingEvent], station_count: u8) -> Result<(), SearchError> {
    if events.len() < 2 {
        return Ok(());
    }
    let ids: Vec<StationId> = events.iter().map(|e| e.station).collect();
    let gaps = find_sequence_gaps(&ids, station_count);
    if gaps.is_empty() {
        Ok(())
    } else {
        Err(SearchError::SequenceGaps(gaps))
    }
}
