//! Lunar station boundary table.
//!
//! The ecliptic is divided into 27-28 stations. Unlike the uniform 13 deg 20'
//! nakshatra grid, the boundaries used here are a fixed, non-uniform list of
//! longitudes: most gaps are 13.3334 deg, but the 21/22/23 region is
//! compressed (9.8334, 5.0 and 11.8333 deg).
//!
//! The table is built once at startup and passed explicitly to the detector.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::StationError;
use crate::util::normalize_360;

/// Largest station identifier.
pub const MAX_STATION_ID: u8 = 28;

/// Station identifier in 1..=28, rendered as `"N#LS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u8);

impl StationId {
    /// Create an identifier, rejecting values outside 1..=28.
    pub const fn new(id: u8) -> Option<Self> {
        if id >= 1 && id <= MAX_STATION_ID {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Numeric value, 1-based.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Display label, e.g. `"3#LS"`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl Display for StationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#LS", self.0)
    }
}

/// One boundary of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Ecliptic longitude at which the Moon enters this station, in [0, 360).
    pub threshold_deg: f64,
    /// Station identifier.
    pub id: StationId,
    /// Free-text description (asterism name, notes).
    #[serde(default)]
    pub description: String,
}

impl Station {
    pub fn new(threshold_deg: f64, id: StationId, description: impl Into<String>) -> Self {
        Self {
            threshold_deg,
            id,
            description: description.into(),
        }
    }
}

/// Result of a sector lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationInfo {
    /// Station whose boundary was most recently passed moving prograde.
    pub station: StationId,
    /// Boundary longitude of that station.
    pub threshold_deg: f64,
    /// Degrees travelled since the boundary, in [0, span_deg).
    pub degrees_in_station: f64,
    /// Width of the station up to the next boundary.
    pub span_deg: f64,
}

/// Built-in boundaries, in station order 1..=28.
const HAMADE_TABLE: [(f64, &str); 28] = [
    (24.1167, "Al-Sharatain"),
    (37.45, "Al-Butain"),
    (50.7833, "Al-Thurayya"),
    (64.1167, "Al-Dabaran"),
    (77.45, "Al-Haq'a"),
    (90.7833, "Al-Han'a"),
    (104.1167, "Al-Dhira"),
    (117.45, "Al-Nathra"),
    (130.7833, "Al-Tarf"),
    (144.1167, "Al-Jabha"),
    (157.45, "Al-Zubra"),
    (170.7833, "Al-Sarfa"),
    (184.1167, "Al-Awwa"),
    (197.45, "Al-Simak"),
    (210.7833, "Al-Ghafr"),
    (224.1167, "Al-Zubana"),
    (237.45, "Al-Iklil"),
    (250.7833, "Al-Qalb"),
    (264.1167, "Al-Shawla"),
    (277.45, "Al-Na'aim"),
    (290.7833, "Al-Balda"),
    (300.6167, "Sa'd al-Dhabih"),
    (305.6167, "Sa'd Bula"),
    (317.45, "Sa'd al-Su'ud"),
    (330.7833, "Sa'd al-Akhbiya"),
    (344.1166, "Al-Fargh al-Muqaddam"),
    (357.45, "Al-Fargh al-Mu'akhkhar"),
    (10.7833, "Batn al-Hut"),
];

/// Immutable, validated station table.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTable {
    stations: Vec<Station>,
    /// Indices into `stations`, sorted by ascending threshold.
    ascending: Vec<usize>,
}

impl StationTable {
    /// Build a table, checking that thresholds lie in [0, 360) and that
    /// thresholds and identifiers are pairwise distinct.
    pub fn new(stations: Vec<Station>) -> Result<Self, StationError> {
        if stations.is_empty() {
            return Err(StationError::EmptyTable);
        }
        for s in &stations {
            if StationId::new(s.id.get()).is_none() {
                return Err(StationError::IdOutOfRange(s.id.get()));
            }
            if !s.threshold_deg.is_finite() || s.threshold_deg < 0.0 || s.threshold_deg >= 360.0 {
                return Err(StationError::ThresholdOutOfRange {
                    id: s.id.get(),
                    threshold_deg: s.threshold_deg,
                });
            }
        }
        for (i, a) in stations.iter().enumerate() {
            for b in &stations[i + 1..] {
                if a.id == b.id {
                    return Err(StationError::DuplicateId(a.id.get()));
                }
                if a.threshold_deg == b.threshold_deg {
                    return Err(StationError::DuplicateThreshold {
                        first: a.id.get(),
                        second: b.id.get(),
                        threshold_deg: a.threshold_deg,
                    });
                }
            }
        }

        let mut ascending: Vec<usize> = (0..stations.len()).collect();
        ascending.sort_by(|&a, &b| stations[a].threshold_deg.total_cmp(&stations[b].threshold_deg));

        Ok(Self {
            stations,
            ascending,
        })
    }

    /// The built-in 28-station table (J.M. Hamade, *The Procession of the
    /// Night Theatre*), listed in station order.
    pub fn hamade() -> Self {
        let stations = HAMADE_TABLE
            .iter()
            .zip(1..=MAX_STATION_ID)
            .map(|(&(threshold_deg, name), id)| Station {
                threshold_deg,
                id: StationId(id),
                description: name.to_string(),
            })
            .collect();
        // Thresholds and ids above are distinct and in range.
        match Self::new(stations) {
            Ok(table) => table,
            Err(e) => unreachable!("built-in station table is invalid: {e}"),
        }
    }

    /// Stations in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Look up a station by identifier.
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Description of a station, empty when unknown.
    pub fn description(&self, id: StationId) -> &str {
        self.get(id).map(|s| s.description.as_str()).unwrap_or("")
    }

    /// Largest identifier in the table; the station cycle wraps from this
    /// value back to 1.
    pub fn station_count(&self) -> u8 {
        self.stations.iter().map(|s| s.id.get()).max().unwrap_or(0)
    }

    /// Determine the station containing an ecliptic longitude.
    pub fn station_at(&self, longitude_deg: f64) -> StationInfo {
        let lon = normalize_360(longitude_deg);
        let n = self.ascending.len();
        let pos = self
            .ascending
            .partition_point(|&i| self.stations[i].threshold_deg <= lon);
        let k = if pos == 0 { n - 1 } else { pos - 1 };
        let current = &self.stations[self.ascending[k]];
        let next = &self.stations[self.ascending[(k + 1) % n]];

        let span_deg = if n == 1 {
            360.0
        } else {
            normalize_360(next.threshold_deg - current.threshold_deg)
        };

        StationInfo {
            station: current.id,
            threshold_deg: current.threshold_deg,
            degrees_in_station: normalize_360(lon - current.threshold_deg),
            span_deg,
        }
    }
}

impl<'a> IntoIterator for &'a StationTable {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}
