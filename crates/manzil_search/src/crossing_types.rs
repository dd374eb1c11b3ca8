//! Types and configuration for the station crossing scan.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use manzil_stations::StationId;

/// Half-width of the proximity band around each boundary, in degrees
/// (~0.48 arcminutes).
pub const DEFAULT_TOLERANCE_DEG: f64 = 0.008;

/// Sample cadence in seconds. Fixed regardless of span.
pub const SAMPLE_CADENCE_SECS: i64 = 60;

/// Samples per chunk: one calendar day.
pub const CHUNK_SPAN_MINUTES: usize = 1440;

/// Upper bound on the Moon's apparent topocentric longitude rate.
///
/// The geocentric rate peaks near 15.4 deg/day at perigee, where the
/// horizontal parallax reaches ~1.02 deg. Its diurnal cycle adds at most
/// 2 pi x 1.02 ~ 6.4 deg/day, for a worst case near 21.8 deg/day.
pub const MAX_LUNAR_RATE_DEG_PER_DAY: f64 = 22.0;

/// One detected boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingEvent {
    /// Closest-approach instant within the crossing run.
    pub utc: DateTime<Utc>,
    /// Station whose boundary was crossed.
    pub station: StationId,
    /// Ecliptic longitude at `utc` in degrees [0, 360).
    pub longitude_deg: f64,
    /// Ecliptic latitude at `utc` in degrees.
    pub latitude_deg: f64,
}

/// Two consecutive samples on opposite sides of a boundary with neither
/// inside the tolerance band. The crossing between them is not reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissedPass {
    pub station: StationId,
    pub before: DateTime<Utc>,
    pub after: DateTime<Utc>,
}

/// Configuration for a chunked crossing scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Proximity band half-width in degrees (default 0.008).
    pub tolerance_deg: f64,
    /// Longest accepted window (default 31 days).
    pub max_span: TimeDelta,
    /// Wall-clock budget for the whole scan (default 300 s).
    pub timeout: Duration,
    /// Resident memory ceiling in MiB (default 1000).
    pub memory_ceiling_mb: f64,
    /// Fail the scan when detected stations skip part of the cycle.
    pub validate_sequence: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
            max_span: TimeDelta::days(31),
            timeout: Duration::from_secs(300),
            memory_ceiling_mb: 1000.0,
            validate_sequence: true,
        }
    }
}

impl ScanConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.tolerance_deg.is_finite() || self.tolerance_deg <= 0.0 {
            return Err("tolerance_deg must be positive");
        }
        if self.tolerance_deg >= 180.0 {
            return Err("tolerance_deg must be below 180");
        }
        // A band of half-width eps cannot be stepped over when the
        // per-sample motion stays below 2 * eps.
        let step_deg = MAX_LUNAR_RATE_DEG_PER_DAY * SAMPLE_CADENCE_SECS as f64 / 86_400.0;
        if 2.0 * self.tolerance_deg <= step_deg {
            return Err("tolerance_deg is too narrow for a one-minute cadence");
        }
        if self.max_span <= TimeDelta::zero() {
            return Err("max_span must be positive");
        }
        if self.timeout.is_zero() {
            return Err("timeout must be positive");
        }
        if !self.memory_ceiling_mb.is_finite() || self.memory_ceiling_mb <= 0.0 {
            return Err("memory_ceiling_mb must be positive");
        }
        Ok(())
    }
}
