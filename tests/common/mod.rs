#![allow(dead_code)]

use approx::assert_relative_eq;
use geodesic_exact::geodesic_exact::GeodesicExact;
use geodesic_exact::geodesic_solution::{DirectSolution, InverseSolution};
use rand::rngs::StdRng;
use rand::Rng;

pub fn wgs84() -> &'static GeodesicExact {
    GeodesicExact::wgs84().unwrap()
}

/// Distance tolerance used against reference values (meters).
pub const DIST_TOL: f64 = 1e-5;

/// Angle tolerance used against reference values (degrees).
pub const ANGLE_TOL: f64 = 1e-9;

/// Compare the point, azimuth and distance of an inverse solution.
pub fn assert_inverse_close(sol: &InverseSolution, azi1: f64, azi2: f64, s12: f64) {
    assert_relative_eq!(sol.azi1, azi1, epsilon = ANGLE_TOL);
    assert_relative_eq!(sol.azi2, azi2, epsilon = ANGLE_TOL);
    assert_relative_eq!(sol.s12, s12, epsilon = DIST_TOL);
}

/// Compare the endpoint of a direct solution.
pub fn assert_direct_close(sol: &DirectSolution, lat2: f64, lon2: f64, azi2: f64) {
    assert_relative_eq!(sol.lat2, lat2, epsilon = ANGLE_TOL);
    assert_relative_eq!(sol.lon2, lon2, epsilon = ANGLE_TOL);
    assert_relative_eq!(sol.azi2, azi2, epsilon = ANGLE_TOL);
}

/// Random point uniformly distributed in latitude and longitude (not in area).
pub fn random_point(rng: &mut StdRng) -> (f64, f64) {
    (rng.random_range(-90.0..=90.0), rng.random_range(-180.0..180.0))
}

/// Difference of two azimuths folded into [-180, 180].
pub fn azimuth_diff(a: f64, b: f64) -> f64 {
    let d = (b - a).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}
