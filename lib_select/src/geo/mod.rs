//! # Geographic Primitives
//!
//! Validated coordinates and great-circle distance. Everything in this module
//! is pure and synchronous; distances are always reported in statute miles.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Haversine great-circle distance.
pub mod haversine;

pub use haversine::{haversine_miles, EARTH_RADIUS_MILES};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Geographic center of the contiguous United States.
///
/// Used as the reference location when neither the config file nor the
/// command line supplies one.
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    latitude: 39.8283,
    longitude: -98.5795,
};

/// Errors raised while building a [`GeoPoint`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude outside -90..90 or longitude outside -180..180.
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },

    /// NaN or infinite component.
    #[error("coordinate is not a finite number")]
    NotFinite,

    /// Text that is not of the form `lat,lon`.
    #[error("malformed location '{0}', expected \"latitude,longitude\"")]
    Malformed(String),
}

/// A point on the Earth's surface in decimal degrees.
///
/// Values built through [`GeoPoint::new`] or [`FromStr`] are guaranteed to be
/// finite and inside the valid degree ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude, -90..=90.
    pub latitude: f64,
    /// Longitude, -180..=180.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::OutOfRange { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Great-circle distance to `other`, in miles.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_miles(self, other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for GeoPoint {
    type Err = GeoError;

    /// Parses `"lat,lon"`, e.g. `"40.7128, -74.0060"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GeoError::Malformed(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| malformed())?;
        GeoPoint::new(latitude, longitude)
    }
}
