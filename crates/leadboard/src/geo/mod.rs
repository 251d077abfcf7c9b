//! Geographic helpers: distance, geocoding and coordinate backfill.

mod fallback;
mod fill;
mod geocoder;
mod provider;

pub use fill::{fill_missing_coordinates, FillLimits, FillReport};
pub use geocoder::Geocoder;
pub use provider::{GeocodeProvider, Nominatim, Photon};

use serde::Serialize;

use crate::lead::Coordinates;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

const MILES_PER_KM: f64 = 0.621_371;

/// A successful geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    /// Resolved location.
    pub coordinates: Coordinates,
    /// Human-readable name of the match.
    pub display_name: String,
}

/// Great-circle distance between two points in miles (Haversine formula).
#[must_use]
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let (phi1, phi2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let km = 2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt());

    km * MILES_PER_KM
}

/// Look up a place in the built-in common-cities table only.
#[must_use]
pub fn fallback_lookup(query: &str) -> Option<GeocodeResult> {
    fallback::lookup(query)
}
