//! Solar geometry for night shading.
//!
//! Sunrise and sunset come from the NOAA sunrise equation. The geometry is
//! behind the `solar` cargo feature; without it callers skip night shading.

#[cfg(feature = "solar")]
mod geometry;
#[cfg(feature = "solar")]
mod nights;

#[cfg(feature = "solar")]
pub use geometry::{SunEvents, sun_events};
#[cfg(feature = "solar")]
pub use nights::night_intervals;

use crate::error::{Error, Result};
use serde::Serialize;

/// Recording site coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteLocation {
    /// Latitude, north positive.
    pub latitude: f64,
    /// Longitude, east positive.
    pub longitude: f64,
}

impl SiteLocation {
    /// Create a validated location.
    ///
    /// # Errors
    ///
    /// Returns an error if latitude is outside -90..=90 or longitude outside
    /// -180..=180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidLatitude { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidLongitude { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Whether night shading can be computed in this build.
pub const fn is_available() -> bool {
    cfg!(feature = "solar")
}
