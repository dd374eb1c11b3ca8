//! Lunar station (manzil) boundary table and circular longitude arithmetic.
//!
//! This crate provides:
//! - The immutable [`StationTable`] of 27-28 fixed ecliptic-longitude
//!   boundaries, with the built-in 28-station table
//! - Circular angular distance and longitude normalization
//! - Sector lookup: which station the Moon is in at a given longitude

pub mod error;
pub mod station;
pub mod util;

pub use error::StationError;
pub use station::{MAX_STATION_ID, Station, StationId, StationInfo, StationTable};
pub use util::{angular_distance, normalize_360, normalize_to_pm180};
