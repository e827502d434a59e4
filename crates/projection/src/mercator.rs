//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use map_common::Point;

/// Sphere radius used by Web Mercator (the WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which the square Web Mercator world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the width of the Web Mercator world in meters.
pub const HALF_WORLD: f64 = 20_037_508.342_789_244;

/// lon/lat degrees to meters. Latitude is clamped to ±[`MAX_LATITUDE`].
pub fn forward(lon_deg: f64, lat_deg: f64) -> Point {
    let lat = lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    Point::new(
        EARTH_RADIUS * lon_deg.to_radians(),
        EARTH_RADIUS * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    )
}

/// Meters to lon/lat degrees.
pub fn inverse(x: f64, y: f64) -> Point {
    Point::new(
        (x / EARTH_RADIUS).to_degrees(),
        (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
    )
}
