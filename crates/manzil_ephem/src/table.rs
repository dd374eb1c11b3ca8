//! Position provider backed by a precomputed ephemeris table.
//!
//! The table is a CSV file with columns `utc,longitude_deg,latitude_deg`,
//! typically an observer-centred apparent ecliptic-of-date export for the
//! observer's site produced by an ephemeris service. Lines starting with `#`
//! are comments, except a `# site: <lat>, <lon>[, <alt_m>]` line, which
//! declares the observer location the positions were computed for. A table
//! with a declared site only answers queries for that site. Requested
//! instants between two rows are linearly interpolated; the longitude is
//! unwrapped across the 0/360 seam first.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use manzil_stations::{normalize_360, normalize_to_pm180};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::location::GeoLocation;
use crate::provider::{EclipticPosition, PositionProvider};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct TableRow {
    utc: DateTime<Utc>,
    longitude_deg: f64,
    latitude_deg: f64,
}

/// Largest latitude or longitude difference, in degrees, between the
/// declared table site and the requested observer (about 1 km).
pub const SITE_TOLERANCE_DEG: f64 = 0.01;

/// Provider over an in-memory ephemeris table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePositionProvider {
    rows: Vec<TableRow>,
    site: Option<GeoLocation>,
}

/// Parse `# site: lat, lon[, alt]` from the comment lines of a table.
fn parse_site(text: &str) -> Result<Option<GeoLocation>, ProviderError> {
    for line in text.lines() {
        let Some(comment) = line.trim_start().strip_prefix('#') else {
            continue;
        };
        let Some(value) = comment.trim().strip_prefix("site:") else {
            continue;
        };
        let bad = || ProviderError::BadSiteHeader(value.trim().to_string());
        let parts = value
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| bad())?;
        let site = match parts[..] {
            [lat, lon] => GeoLocation::new(lat, lon, 0.0),
            [lat, lon, alt] => GeoLocation::new(lat, lon, alt),
            _ => return Err(bad()),
        };
        site.validate().map_err(|_| bad())?;
        return Ok(Some(site));
    }
    Ok(None)
}

impl TablePositionProvider {
    /// Load a table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let file = std::fs::File::open(path)?;
        let provider = Self::from_reader(file)?;
        match provider.site {
            Some(site) => debug!(
                path = %path.display(),
                rows = provider.rows.len(),
                site = %site,
                "loaded ephemeris table"
            ),
            None => warn!(
                path = %path.display(),
                "ephemeris table declares no site; observer location is not checked"
            ),
        }
        Ok(provider)
    }

    /// Parse a table from CSV text.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ProviderError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let site = parse_site(&text)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let rows = csv_reader
            .deserialize::<TableRow>()
            .collect::<Result<Vec<_>, _>>()?;
        let table = Self::from_rows(rows)?;
        Ok(match site {
            Some(site) => table.with_site(site),
            None => table,
        })
    }

    /// Build from `(utc, longitude_deg, latitude_deg)` triples.
    pub fn from_points(points: &[(DateTime<Utc>, f64, f64)]) -> Result<Self, ProviderError> {
        let rows = points
            .iter()
            .map(|&(utc, longitude_deg, latitude_deg)| TableRow {
                utc,
                longitude_deg,
                latitude_deg,
            })
            .collect();
        Self::from_rows(rows)
    }

    fn from_rows(mut rows: Vec<TableRow>) -> Result<Self, ProviderError> {
        if rows.is_empty() {
            return Err(ProviderError::EmptyTable);
        }
        for (row, r) in rows.iter_mut().enumerate() {
            if !r.longitude_deg.is_finite() || !r.latitude_deg.is_finite() {
                return Err(ProviderError::NonFinite { row });
            }
            r.longitude_deg = normalize_360(r.longitude_deg);
        }
        if let Some(row) = rows.windows(2).position(|w| w[1].utc <= w[0].utc) {
            return Err(ProviderError::Unsorted { row: row + 1 });
        }
        Ok(Self { rows, site: None })
    }

    /// Bind the table to the observer location it was computed for.
    pub fn with_site(mut self, site: GeoLocation) -> Self {
        self.site = Some(site);
        self
    }

    /// Declared observer location, if any.
    pub fn site(&self) -> Option<&GeoLocation> {
        self.site.as_ref()
    }

    /// First and last instants covered by the table.
    pub fn coverage(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.rows[0].utc, self.rows[self.rows.len() - 1].utc)
    }

    fn position_at(&self, instant: DateTime<Utc>) -> Result<EclipticPosition, ProviderError> {
        let (first, last) = self.coverage();
        if instant < first || instant > last {
            return Err(ProviderError::OutOfRange {
                instant,
                first,
                last,
            });
        }

        let pos = self.rows.partition_point(|r| r.utc <= instant);
        let a = &self.rows[pos - 1];
        if a.utc == instant || pos == self.rows.len() {
            return Ok(EclipticPosition {
                longitude_deg: a.longitude_deg,
                latitude_deg: a.latitude_deg,
            });
        }
        let b = &self.rows[pos];

        let span_ms = (b.utc - a.utc).num_milliseconds() as f64;
        let frac = (instant - a.utc).num_milliseconds() as f64 / span_ms;
        let dlon = normalize_to_pm180(b.longitude_deg - a.longitude_deg);

        Ok(EclipticPosition {
            longitude_deg: normalize_360(a.longitude_deg + dlon * frac),
            latitude_deg: a.latitude_deg + (b.latitude_deg - a.latitude_deg) * frac,
        })
    }
}

impl PositionProvider for TablePositionProvider {
    fn moon_positions(
        &self,
        location: &GeoLocation,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<EclipticPosition>, ProviderError> {
        location.validate().map_err(ProviderError::InvalidLocation)?;
        if let Some(site) = self.site {
            if !site.same_site(location, SITE_TOLERANCE_DEG) {
                return Err(ProviderError::SiteMismatch {
                    table: site,
                    requested: *location,
                });
            }
        }
        instants.iter().map(|&t| self.position_at(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 4, h, m, 0).unwrap()
    }

    fn origin() -> GeoLocation {
        GeoLocation::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn exact_rows_are_returned_verbatim() {
        let p = TablePositionProvider::from_points(&[(t(0, 0), 10.0, 1.0), (t(1, 0), 10.5, 1.1)])
            .unwrap();
        let out = p.moon_positions(&origin(), &[t(0, 0), t(1, 0)]).unwrap();
        assert!((out[0].longitude_deg - 10.0).abs() < 1e-12);
        assert!((out[1].longitude_deg - 10.5).abs() < 1e-12);
        assert!((out[1].latitude_deg - 1.1).abs() < 1e-12);
    }

    #[test]
    fn interpolates_between_rows() {
        let p = TablePositionProvider::from_points(&[(t(0, 0), 10.0, 1.0), (t(1, 0), 10.6, 1.6)])
            .unwrap();
        let out = p.moon_positions(&origin(), &[t(0, 30)]).unwrap();
        assert!((out[0].longitude_deg - 10.3).abs() < 1e-9);
        assert!((out[0].latitude_deg - 1.3).abs() < 1e-9);
    }

    #[test]
    fn interpolates_across_seam() {
        let p = TablePositionProvider::from_points(&[(t(0, 0), 359.8, 0.0), (t(1, 0), 0.2, 0.0)])
            .unwrap();
        let out = p
            .moon_positions(&origin(), &[t(0, 15), t(0, 45)])
            .unwrap();
        assert!((out[0].longitude_deg - 359.9).abs() < 1e-9);
        assert!((out[1].longitude_deg - 0.1).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_instant() {
        let p = TablePositionProvider::from_points(&[(t(0, 0), 10.0, 0.0), (t(1, 0), 10.5, 0.0)])
            .unwrap();
        let err = p
            .moon_positions(&origin(), &[t(1, 0) + Duration::minutes(1)])
            .unwrap_err();
        assert!(matches!(err, ProviderError::OutOfRange { .. }));
    }

    #[test]
    fn rejects_unsorted_rows() {
        let err = TablePositionProvider::from_points(&[(t(1, 0), 10.0, 0.0), (t(0, 0), 10.5, 0.0)])
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unsorted { row: 1 }));
    }

    #[test]
    fn rejects_empty_table() {
        let err = TablePositionProvider::from_points(&[]).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyTable));
    }

    #[test]
    fn rejects_invalid_location() {
        let p = TablePositionProvider::from_points(&[(t(0, 0), 10.0, 0.0)]).unwrap();
        let err = p
            .moon_positions(&GeoLocation::new(95.0, 0.0, 0.0), &[t(0, 0)])
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidLocation(_)));
    }

    #[test]
    fn parses_csv_with_comments() {
        let text = "# Moon, apparent ecliptic of date\n\
                    utc,longitude_deg,latitude_deg\n\
                    2025-02-04T00:00:00Z, 370.0, -4.9\n\
                    2025-02-04T01:00:00Z, 10.55, -4.95\n";
        let p = TablePositionProvider::from_reader(text.as_bytes()).unwrap();
        let (first, last) = p.coverage();
        assert_eq!(first, t(0, 0));
        assert_eq!(last, t(1, 0));
        let out = p.moon_positions(&origin(), &[t(0, 0)]).unwrap();
        assert!((out[0].longitude_deg - 10.0).abs() < 1e-9);
    }

    #[test]
    fn site_header_binds_table_to_observer() {
        let text = "# site: 21.42, 39.83, 277\n\
                    utc,longitude_deg,latitude_deg\n\
                    2025-02-04T00:00:00Z,10.0,1.0\n\
                    2025-02-04T01:00:00Z,10.1,1.0\n";
        let p = TablePositionProvider::from_reader(text.as_bytes()).unwrap();
        let mecca = GeoLocation::new(21.42, 39.83, 277.0);
        assert_eq!(p.site(), Some(&mecca));

        let out = p.moon_positions(&mecca, &[t(0, 30)]).unwrap();
        assert!((out[0].longitude_deg - 10.05).abs() < 1e-9);

        let sydney = GeoLocation::new(-33.87, 151.21, 0.0);
        let err = p.moon_positions(&sydney, &[t(0, 30)]).unwrap_err();
        match err {
            ProviderError::SiteMismatch { table, requested } => {
                assert_eq!(table, mecca);
                assert_eq!(requested, sydney);
            }
            other => panic!("expected SiteMismatch, got {other:?}"),
        }
    }

    #[test]
    fn table_without_site_answers_any_observer() {
        let p = TablePositionProvider::from_points(&[(t(0, 0), 10.0, 1.0)]).unwrap();
        assert!(p.site().is_none());
        assert!(p.moon_positions(&origin(), &[t(0, 0)]).is_ok());
    }

    #[test]
    fn malformed_site_header_is_rejected() {
        for header in ["# site: north, 39.83", "# site: 21.42", "# site: 95.0, 10.0"] {
            let text = format!("{header}\nutc,longitude_deg,latitude_deg\n2025-02-04T00:00:00Z,1,2\n");
            let err = TablePositionProvider::from_reader(text.as_bytes()).unwrap_err();
            assert!(matches!(err, ProviderError::BadSiteHeader(_)), "{header}");
        }
    }

    #[test]
    fn malformed_csv_is_a_csv_error() {
        let text = "utc,longitude_deg,latitude_deg\nnot-a-date,1,2\n";
        let err = TablePositionProvider::from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ProviderError::Csv(_)));
    }
}
