//! Great-circle distance between coordinates.

#[cfg(test)]
#[path = "distance_test.rs"]
mod distance_test;

use crate::state::location::Coords;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
pub fn distance_km(a: Coords, b: Coords) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// `"3.2 km"`.
pub fn distance_label(km: f64) -> String {
    format!("{km:.1} km")
}
