//! File-based tests for the ephemeris table provider.

use std::io::Write;
use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use manzil_ephem::{GeoLocation, ProviderError, TablePositionProvider, sample_series};

#[test]
fn loads_table_from_disk_and_samples_minutes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "utc,longitude_deg,latitude_deg").unwrap();
    writeln!(file, "2025-02-04T00:00:00Z,100.0,2.0").unwrap();
    writeln!(file, "2025-02-04T01:00:00Z,100.6,2.06").unwrap();
    file.flush().unwrap();

    let provider = TablePositionProvider::load(file.path()).unwrap();
    let start = Utc.with_ymd_and_hms(2025, 2, 4, 0, 0, 0).unwrap();
    let instants: Vec<_> = (0..=60).map(|m| start + Duration::minutes(m)).collect();
    let location = GeoLocation::new(51.5, -0.12, 0.0);

    let series = sample_series(&provider, &location, &instants).unwrap();
    assert_eq!(series.len(), 61);
    assert!((series[30].longitude_deg - 100.3).abs() < 1e-9);
    assert!(series.windows(2).all(|w| w[0].utc < w[1].utc));
}

#[test]
fn missing_file_is_a_provider_error() {
    let err = TablePositionProvider::load(Path::new("/nonexistent/moon_table.csv")).unwrap_err();
    assert!(matches!(err, ProviderError::Io(_)));
    assert!(err.to_string().starts_with("ephemeris data unavailable"));
}

#[test]
fn site_table_only_serves_its_observer() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# Moon, topocentric apparent ecliptic of date").unwrap();
    writeln!(file, "# site: 21.42, 39.83, 277").unwrap();
    writeln!(file, "utc,longitude_deg,latitude_deg").unwrap();
    writeln!(file, "2025-02-04T00:00:00Z,10.0,1.0").unwrap();
    writeln!(file, "2025-02-04T01:00:00Z,10.1,1.0").unwrap();
    file.flush().unwrap();

    let provider = TablePositionProvider::load(file.path()).unwrap();
    let at = [Utc.with_ymd_and_hms(2025, 2, 4, 0, 30, 0).unwrap()];

    let mecca = GeoLocation::new(21.42, 39.83, 277.0);
    assert_eq!(sample_series(&provider, &mecca, &at).unwrap().len(), 1);

    let sydney = GeoLocation::new(-33.87, 151.21, 0.0);
    let err = sample_series(&provider, &sydney, &at).unwrap_err();
    assert!(matches!(err, ProviderError::SiteMismatch { .. }));
    assert!(err.to_string().contains("33.8700 S 151.2100 E"));
}
