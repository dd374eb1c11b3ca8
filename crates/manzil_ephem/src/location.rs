//! Observer location on Earth's surface.

use std::fmt::{Display, Formatter};

use manzil_stations::normalize_to_pm180;
use serde::{Deserialize, Serialize};

/// Hemisphere marker used when a provider wants unsigned magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

/// Geographic location of the observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive. Range: [-90, 90].
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive. Range: [-180, 180].
    pub longitude_deg: f64,
    /// Altitude above mean sea level in meters.
    #[serde(default)]
    pub altitude_m: f64,
}

impl GeoLocation {
    /// Create a new geographic location.
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Validate coordinate ranges.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.latitude_deg.is_finite() || !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err("latitude must be within [-90, 90]");
        }
        if !self.longitude_deg.is_finite() || !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err("longitude must be within [-180, 180]");
        }
        if !self.altitude_m.is_finite() {
            return Err("altitude must be finite");
        }
        Ok(())
    }

    /// North for latitudes >= 0, south otherwise.
    pub fn latitude_hemisphere(&self) -> Hemisphere {
        if self.latitude_deg >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }

    /// East for longitudes >= 0, west otherwise.
    pub fn longitude_hemisphere(&self) -> Hemisphere {
        if self.longitude_deg >= 0.0 {
            Hemisphere::East
        } else {
            Hemisphere::West
        }
    }

    /// Unsigned latitude magnitude, to pair with [`Self::latitude_hemisphere`].
    pub fn latitude_abs(&self) -> f64 {
        self.latitude_deg.abs()
    }

    /// Unsigned longitude magnitude, to pair with [`Self::longitude_hemisphere`].
    pub fn longitude_abs(&self) -> f64 {
        self.longitude_deg.abs()
    }

    /// Whether `other` lies within `tolerance_deg` in both latitude and
    /// longitude. Longitudes compare across the antimeridian. Altitude is
    /// not compared.
    pub fn same_site(&self, other: &GeoLocation, tolerance_deg: f64) -> bool {
        (self.latitude_deg - other.latitude_deg).abs() <= tolerance_deg
            && normalize_to_pm180(self.longitude_deg - other.longitude_deg).abs() <= tolerance_deg
    }
}

impl Display for GeoLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4} {} {:.4} {}",
            self.latitude_abs(),
            self.latitude_hemisphere().letter(),
            self.longitude_abs(),
            self.longitude_hemisphere().letter()
        )
    }
}
