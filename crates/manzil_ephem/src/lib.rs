//! Moon position inputs for the station crossing scan.
//!
//! The scan never computes ephemerides itself. Apparent, topocentric,
//! ecliptic-of-date Moon positions come from a [`PositionProvider`]; this
//! crate defines that seam, the observer [`GeoLocation`], the time-series
//! [`Sample`], and [`TablePositionProvider`], an adapter over a precomputed
//! ephemeris table.

pub mod error;
pub mod location;
pub mod provider;
pub mod table;

pub use error::ProviderError;
pub use location::{GeoLocation, Hemisphere};
pub use provider::{EclipticPosition, PositionProvider, Sample, sample_series};
pub use table::{SITE_TOLERANCE_DEG, TablePositionProvider};
