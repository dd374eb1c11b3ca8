//! The position provider seam and the time-series sample type.

use chrono::{DateTime, Utc};
use manzil_stations::normalize_360;

use crate::error::ProviderError;
use crate::location::GeoLocation;

/// Apparent ecliptic-of-date position of the Moon as seen by the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    /// Ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Ecliptic latitude in degrees.
    pub latitude_deg: f64,
}

/// One element of the minute-cadence time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub utc: DateTime<Utc>,
    /// Ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Ecliptic latitude in degrees.
    pub latitude_deg: f64,
}

impl Sample {
    pub fn new(utc: DateTime<Utc>, longitude_deg: f64, latitude_deg: f64) -> Self {
        Self {
            utc,
            longitude_deg,
            latitude_deg,
        }
    }
}

/// Source of topocentric, apparent, ecliptic-of-date Moon positions.
///
/// Implementations return exactly one position per requested instant, in
/// the same order, with longitudes normalized to [0, 360).
pub trait PositionProvider {
    fn moon_positions(
        &self,
        location: &GeoLocation,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<EclipticPosition>, ProviderError>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn moon_positions(
        &self,
        location: &GeoLocation,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<EclipticPosition>, ProviderError> {
        (**self).moon_positions(location, instants)
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Box<P> {
    fn moon_positions(
        &self,
        location: &GeoLocation,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<EclipticPosition>, ProviderError> {
        (**self).moon_positions(location, instants)
    }
}

/// Query a provider and zip its output with the requested instants.
///
/// Instants must be strictly increasing. Provider output is checked for
/// length parity and finite values, and longitudes are brought into
/// [0, 360), so the resulting series is safe to feed to the scanner.
pub fn sample_series<P: PositionProvider + ?Sized>(
    provider: &P,
    location: &GeoLocation,
    instants: &[DateTime<Utc>],
) -> Result<Vec<Sample>, ProviderError> {
    if let Some(i) = instants.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ProviderError::UnorderedInstants { index: i + 1 });
    }
    let positions = provider.moon_positions(location, instants)?;
    if positions.len() != instants.len() {
        return Err(ProviderError::LengthMismatch {
            expected: instants.len(),
            got: positions.len(),
        });
    }
    if let Some(index) = positions
        .iter()
        .position(|p| !p.longitude_deg.is_finite() || !p.latitude_deg.is_finite())
    {
        return Err(ProviderError::NonFinitePosition { index });
    }
    Ok(instants
        .iter()
        .zip(positions)
        .map(|(&utc, p)| Sample::new(utc, normalize_360(p.longitude_deg), p.latitude_deg))
        .collect())
}
