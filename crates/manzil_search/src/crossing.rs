//! Station crossing detector.
//!
//! For every station boundary T the series is swept in time order and each
//! maximal run of samples with `angular_distance(lon, T) < tolerance` is
//! reduced to one event at the sample of minimum distance (closest
//! approach). Ties keep the earliest sample. A run closes on the first
//! sample back outside the band; a run still open at the end of the series
//! is emitted by [`CrossingScanner::finish`].
//!
//! Stations do not interact. Events of all stations are merged by a stable
//! sort on time, so equal instants keep table order.
//!
//! Run state lives in the scanner, not in the feed loop: feeding a series in
//! arbitrary contiguous pieces yields exactly the events of one pass over
//! the whole series.

use chrono::{DateTime, Utc};
use manzil_ephem::Sample;
use manzil_stations::{StationTable, angular_distance, normalize_to_pm180};

use crate::crossing_types::{CrossingEvent, MissedPass};

/// Per-station scan state.
#[derive(Debug, Clone, Copy)]
struct RunState {
    /// Closest sample of the current inside-run.
    best: Option<Sample>,
    best_distance: f64,
    /// Distance of the previous sample; infinite before the first one.
    last_distance: f64,
    /// Signed offset (-180, 180] of the previous sample from the boundary.
    last_offset: Option<f64>,
}

impl RunState {
    fn new() -> Self {
        Self {
            best: None,
            best_distance: f64::INFINITY,
            last_distance: f64::INFINITY,
            last_offset: None,
        }
    }

    fn reset_run(&mut self) {
        self.best = None;
        self.best_distance = f64::INFINITY;
    }
}

/// A genuine sign change of the boundary offset, not the +180/-180 flip on
/// the far side of the circle.
fn straddles(prev_offset: f64, offset: f64) -> bool {
    prev_offset * offset < 0.0 && (prev_offset - offset).abs() < 270.0
}

/// Streaming crossing detector.
#[derive(Debug, Clone)]
pub struct CrossingScanner<'a> {
    table: &'a StationTable,
    tolerance_deg: f64,
    /// Parallel to `table.stations()`.
    runs: Vec<RunState>,
    /// Events per station, in time order.
    events: Vec<Vec<CrossingEvent>>,
    missed: Vec<MissedPass>,
    last_utc: Option<DateTime<Utc>>,
    samples_seen: usize,
}

impl<'a> CrossingScanner<'a> {
    pub fn new(table: &'a StationTable, tolerance_deg: f64) -> Self {
        Self {
            table,
            tolerance_deg,
            runs: vec![RunState::new(); table.len()],
            events: vec![Vec::new(); table.len()],
            missed: Vec::new(),
            last_utc: None,
            samples_seen: 0,
        }
    }

    /// Scan the next contiguous piece of the series.
    ///
    /// Samples must be strictly increasing in time and continue after
    /// everything fed so far, with longitudes in [0, 360). Only debug builds
    /// assert this; out-of-order input in release builds yields unspecified
    /// events. Series built by [`manzil_ephem::sample_series`] satisfy the
    /// contract.
    pub fn feed(&mut self, samples: &[Sample]) {
        let Some(last) = samples.last() else {
            return;
        };
        debug_assert!(
            samples.windows(2).all(|w| w[0].utc < w[1].utc)
                && self.last_utc.is_none_or(|t| t < samples[0].utc),
            "samples must be strictly increasing in time"
        );

        let tol = self.tolerance_deg;
        for (k, station) in self.table.iter().enumerate() {
            let run = &mut self.runs[k];
            let mut prev_utc = self.last_utc;

            for sample in samples {
                let distance = angular_distance(sample.longitude_deg, station.threshold_deg);
                let offset = normalize_to_pm180(sample.longitude_deg - station.threshold_deg);

                if distance < tol {
                    if distance < run.best_distance {
                        run.best_distance = distance;
                        run.best = Some(*sample);
                    }
                } else if run.last_distance < tol {
                    if let Some(best) = run.best {
                        self.events[k].push(CrossingEvent {
                            utc: best.utc,
                            station: station.id,
                            longitude_deg: best.longitude_deg,
                            latitude_deg: best.latitude_deg,
                        });
                    }
                    run.reset_run();
                } else if let (Some(prev_offset), Some(before)) = (run.last_offset, prev_utc) {
                    if straddles(prev_offset, offset) {
                        self.missed.push(MissedPass {
                            station: station.id,
                            before,
                            after: sample.utc,
                        });
                    }
                }

                run.last_distance = distance;
                run.last_offset = Some(offset);
                prev_utc = Some(sample.utc);
            }
        }

        self.last_utc = Some(last.utc);
        self.samples_seen += samples.len();
    }

    /// Boundary passes stepped over without a sample inside the band.
    pub fn missed_passes(&self) -> &[MissedPass] {
        &self.missed
    }

    /// Total number of samples fed so far.
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    /// Close any open runs and return all events ordered by time.
    pub fn finish(mut self) -> Vec<CrossingEvent> {
        for (k, station) in self.table.iter().enumerate() {
            if let Some(best) = self.runs[k].best.take() {
                self.events[k].push(CrossingEvent {
                    utc: best.utc,
                    station: station.id,
                    longitude_deg: best.longitude_deg,
                    latitude_deg: best.latitude_deg,
                });
            }
        }

        let mut merged: Vec<CrossingEvent> = self.events.into_iter().flatten().collect();
        merged.sort_by_key(|e| e.utc);
        merged
    }
}

/// Detect all crossings in a complete series (single pass).
pub fn detect_crossings(
    series: &[Sample],
    table: &StationTable,
    tolerance_deg: f64,
) -> Vec<CrossingEvent> {
    let mut scanner = CrossingScanner::new(table, tolerance_deg);
    scanner.feed(series);
    scanner.finish()
}
