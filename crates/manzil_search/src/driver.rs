//! Chunked scan driver.
//!
//! The window is walked one day of minute samples at a time. Before each
//! chunk the wall-clock and memory guards are checked; the chunk's
//! positions are then requested from the provider and fed to a single
//! [`CrossingScanner`], whose per-station run state spans chunk
//! boundaries. Only one chunk of samples is alive at any moment.

use manzil_ephem::{GeoLocation, PositionProvider, sample_series};
use manzil_stations::StationTable;
use tracing::{debug, info, warn};

use crate::crossing::CrossingScanner;
use crate::crossing_types::{CrossingEvent, ScanConfig};
use crate::error::SearchError;
use crate::monitor::{ProcessMonitor, ScanMonitor};
use crate::sequence::validate_sequence;
use crate::window::ScanWindow;

/// Find all station crossings in `window`, timed by the process clock and
/// resident set size.
pub fn search_station_crossings<P: PositionProvider + ?Sized>(
    provider: &P,
    location: &GeoLocation,
    window: &ScanWindow,
    table: &StationTable,
    config: &ScanConfig,
) -> Result<Vec<CrossingEvent>, SearchError> {
    let monitor = ProcessMonitor::start();
    search_station_crossings_with_monitor(provider, location, window, table, config, &monitor)
}

/// Find all station crossings in `window` with an explicit resource monitor.
///
/// Fails before any provider call on an invalid config, location or span.
/// Mid-scan, a tripped guard aborts the whole request and no partial
/// events are returned.
pub fn search_station_crossings_with_monitor<P, M>(
    provider: &P,
    location: &GeoLocation,
    window: &ScanWindow,
    table: &StationTable,
    config: &ScanConfig,
    monitor: &M,
) -> Result<Vec<CrossingEvent>, SearchError>
where
    P: PositionProvider + ?Sized,
    M: ScanMonitor + ?Sized,
{
    config.validate().map_err(SearchError::InvalidConfig)?;
    location.validate().map_err(SearchError::InvalidLocation)?;
    window.validate_span(config.max_span)?;

    let chunk_count = window.chunk_count();
    info!(
        start = %window.start(),
        end = %window.end(),
        location = %location,
        stations = table.len(),
        samples = window.sample_count(),
        chunks = chunk_count,
        "starting station crossing scan"
    );

    let mut scanner = CrossingScanner::new(table, config.tolerance_deg);

    for (k, range) in window.chunks().enumerate() {
        check_guards(config, monitor)?;

        let instants = window.instants(range);
        let samples = sample_series(provider, location, &instants)?;
        scanner.feed(&samples);
        debug!(chunk = k + 1, of = chunk_count, samples = samples.len(), "chunk scanned");
    }

    for miss in scanner.missed_passes() {
        warn!(
            station = %miss.station,
            before = %miss.before,
            after = %miss.after,
            "boundary passed between samples without entering the tolerance band"
        );
    }

    let events = scanner.finish();
    info!(
        events = events.len(),
        elapsed_ms = monitor.elapsed().as_millis() as u64,
        "scan complete"
    );

    if config.validate_sequence {
        validate_sequence(&events, table.station_count())?;
    }
    Ok(events)
}

fn check_guards<M: ScanMonitor + ?Sized>(config: &ScanConfig, monitor: &M) -> Result<(), SearchError> {
    let elapsed = monitor.elapsed();
    if elapsed > config.timeout {
        return Err(SearchError::TimedOut {
            elapsed,
            budget: config.timeout,
        });
    }
    if let Some(used_mb) = monitor.resident_memory_mb() {
        if used_mb > config.memory_ceiling_mb {
            return Err(SearchError::MemoryExceeded {
                used_mb,
                limit_mb: config.memory_ceiling_mb,
            });
        }
    }
    Ok(())
}
