//! Request validation and resource guards of the chunked driver.

use std::cell::Cell;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use manzil_ephem::{EclipticPosition, GeoLocation, PositionProvider, ProviderError};
use manzil_search::{
    ScanConfig, ScanMonitor, ScanWindow, SearchError, search_station_crossings,
    search_station_crossings_with_monitor,
};
use manzil_stations::{Station, StationId, StationTable};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn location() -> GeoLocation {
    GeoLocation::new(21.42, 39.83, 277.0)
}

/// Provider that counts calls and returns a fixed longitude.
#[derive(Default)]
struct Counting {
    calls: Cell<usize>,
}

impl PositionProvider for Counting {
    fn moon_positions(
        &self,
        _location: &GeoLocation,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<EclipticPosition>, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![
            EclipticPosition {
                longitude_deg: 90.0,
                latitude_deg: 0.0,
            };
            instants.len()
        ])
    }
}

struct Failing;

impl PositionProvider for Failing {
    fn moon_positions(
        &self,
        _location: &GeoLocation,
        _instants: &[DateTime<Utc>],
    ) -> Result<Vec<EclipticPosition>, ProviderError> {
        Err(ProviderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "de440s.csv",
        )))
    }
}

/// Monitor whose readings advance a fixed step per query.
struct Scripted {
    elapsed_step: Duration,
    queries: Cell<u32>,
    memory_mb: Option<f64>,
}

impl Scripted {
    fn new(elapsed_step: Duration, memory_mb: Option<f64>) -> Self {
        Self {
            elapsed_step,
            queries: Cell::new(0),
            memory_mb,
        }
    }
}

impl ScanMonitor for Scripted {
    fn elapsed(&self) -> Duration {
        let n = self.queries.get();
        self.queries.set(n + 1);
        self.elapsed_step * n
    }

    fn resident_memory_mb(&self) -> Option<f64> {
        self.memory_mb
    }
}

fn window_days(days: i64) -> ScanWindow {
    ScanWindow::new(t0(), t0() + TimeDelta::days(days)).unwrap()
}

#[test]
fn oversized_span_is_rejected_before_scanning() {
    let provider = Counting::default();
    let config = ScanConfig::default();
    let window = ScanWindow::new(t0(), t0() + config.max_span + TimeDelta::minutes(1)).unwrap();

    let err = search_station_crossings(
        &provider,
        &location(),
        &window,
        &StationTable::hamade(),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::InvalidWindow(_)));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn span_at_limit_is_scanned() {
    let provider = Counting::default();
    let config = ScanConfig::default();
    let window = ScanWindow::new(t0(), t0() + config.max_span).unwrap();

    let events = search_station_crossings(
        &provider,
        &location(),
        &window,
        &StationTable::hamade(),
        &config,
    )
    .unwrap();
    assert!(events.is_empty());
    assert_eq!(provider.calls.get(), window.chunk_count());
}

#[test]
fn invalid_config_is_rejected() {
    let provider = Counting::default();
    let config = ScanConfig {
        tolerance_deg: 0.001,
        ..ScanConfig::default()
    };
    let err = search_station_crossings(
        &provider,
        &location(),
        &window_days(1),
        &StationTable::hamade(),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::InvalidConfig(_)));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn invalid_location_is_rejected() {
    let provider = Counting::default();
    let err = search_station_crossings(
        &provider,
        &GeoLocation::new(91.0, 0.0, 0.0),
        &window_days(1),
        &StationTable::hamade(),
        &ScanConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::InvalidLocation(_)));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn timeout_trips_between_chunks() {
    let provider = Counting::default();
    let config = ScanConfig {
        timeout: Duration::from_secs(100),
        ..ScanConfig::default()
    };
    // Readings 0, 60, 120 s: the third chunk is refused.
    let monitor = Scripted::new(Duration::from_secs(60), None);

    let err = search_station_crossings_with_monitor(
        &provider,
        &location(),
        &window_days(10),
        &StationTable::hamade(),
        &config,
        &monitor,
    )
    .unwrap_err();
    match err {
        SearchError::TimedOut { elapsed, budget } => {
            assert_eq!(elapsed, Duration::from_secs(120));
            assert_eq!(budget, Duration::from_secs(100));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
    assert_eq!(provider.calls.get(), 2);
}

#[test]
fn memory_ceiling_trips_before_first_chunk() {
    let provider = Counting::default();
    let monitor = Scripted::new(Duration::ZERO, Some(1500.0));

    let err = search_station_crossings_with_monitor(
        &provider,
        &location(),
        &window_days(3),
        &StationTable::hamade(),
        &ScanConfig::default(),
        &monitor,
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::MemoryExceeded { .. }));
    assert!(err.to_string().starts_with("calculation error:"));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn unknown_memory_reading_skips_the_guard() {
    let provider = Counting::default();
    let monitor = Scripted::new(Duration::ZERO, None);

    let events = search_station_crossings_with_monitor(
        &provider,
        &location(),
        &window_days(3),
        &StationTable::hamade(),
        &ScanConfig::default(),
        &monitor,
    )
    .unwrap();
    assert!(events.is_empty());
}

#[test]
fn provider_failure_is_a_calculation_error() {
    let err = search_station_crossings(
        &Failing,
        &location(),
        &window_days(1),
        &StationTable::hamade(),
        &ScanConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::Provider(_)));
    assert!(err.to_string().starts_with("calculation error: ephemeris data unavailable"));
}

#[test]
fn sequence_gap_fails_the_scan() {
    // Two stations with a third id in between that is never crossed.
    let table = StationTable::new(vec![
        Station::new(89.995, StationId::new(1).unwrap(), ""),
        Station::new(90.0, StationId::new(3).unwrap(), ""),
    ])
    .unwrap();
    let provider = Counting::default();

    let err = search_station_crossings(
        &provider,
        &location(),
        &window_days(1),
        &table,
        &ScanConfig::default(),
    )
    .unwrap_err();
    match err {
        SearchError::SequenceGaps(gaps) => {
            assert_eq!(gaps.len(), 1);
            assert_eq!(gaps[0].to_string(), "missing station between 1 and 3");
        }
        other => panic!("expected SequenceGaps, got {other:?}"),
    }

    let relaxed = ScanConfig {
        validate_sequence: false,
        ..ScanConfig::default()
    };
    let events =
        search_station_crossings(&provider, &location(), &window_days(1), &table, &relaxed)
            .unwrap();
    assert_eq!(events.len(), 2);
}
