//! Pure functions for distance and walking-time estimates.
//!
//! Walking time uses a flat 80 m/min pace over the straight-line
//! (haversine) distance; the view layer rounds up to whole minutes.

use super::Coordinates;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Assumed walking pace in meters per minute.
pub const WALK_SPEED_M_PER_MIN: f64 = 80.0;

/// Great-circle distance between two points, in meters.
pub fn haversine_m(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Estimated walking time for a distance, rounded up to whole minutes.
pub fn walk_minutes(distance_m: f64) -> u32 {
    (distance_m / WALK_SPEED_M_PER_MIN).ceil() as u32
}
