//! Implementation of the Haversine formula for calculating the distance
//! between two points on a sphere.
//!
//! See [Wikipedia](https://en.wikipedia.org/wiki/Haversine_formula) for
//! more.
//!
//! **Distance is returned in kilometers**.

use crate::coverage::coverage_types::point::Point;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the distance between two points on a sphere.
///
/// Points are validated on construction, so the result is always finite
/// and non-negative.
pub fn distance(start: &Point, end: &Point) -> f64 {
    let d_lat: f64 = (end.latitude() - start.latitude()).to_radians();
    let d_lon: f64 = (end.longitude() - start.longitude()).to_radians();
    let lat1: f64 = start.latitude().to_radians();
    let lat2: f64 = end.latitude().to_radians();

    let a: f64 = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();

    // rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c: f64 = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
