mod common;

use approx::assert_relative_eq;
use geodesic_exact::float_ops::{ang_diff, ang_normalize, sum};
use geodesic_exact::geodesic_exact::GeodesicExact;
use geodesic_exact::geodesic_mask::GeodesicMask;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{azimuth_diff, random_point, wgs84};

const SAMPLES: usize = 200;

#[test]
fn test_direct_inverse_round_trip() {
    let g = wgs84();
    let mut rng = StdRng::seed_from_u64(42_u64);
    for _ in 0..SAMPLES {
        let (lat1, lon1) = random_point(&mut rng);
        let azi1: f64 = rng.random_range(-180.0..180.0);
        let s12: f64 = rng.random_range(1.0..19_000_000.0);
        let dir = g.direct(lat1, lon1, azi1, s12);
        let inv = g.inverse(lat1, lon1, dir.lat2, dir.lon2).unwrap();
        // the direct geodesic may not be the shortest one past the conjugate point
        assert!(inv.s12 <= s12 + 1e-6);
        if (inv.s12 - s12).abs() < 1e-3 && dir.m12 > 0.0 {
            assert_relative_eq!(inv.s12, s12, epsilon = 1e-6);
            assert!(azimuth_diff(inv.azi1, azi1).abs() < 1e-8);
            assert!(azimuth_diff(inv.azi2, dir.azi2).abs() < 1e-8);
        }
    }
}

#[test]
fn test_inverse_symmetry() {
    let g = wgs84();
    let mut rng = StdRng::seed_from_u64(7_u64);
    for _ in 0..SAMPLES {
        let (lat1, lon1) = random_point(&mut rng);
        let (lat2, lon2) = random_point(&mut rng);
        let fwd = g.inverse(lat1, lon1, lat2, lon2).unwrap();
        let bwd = g.inverse(lat2, lon2, lat1, lon1).unwrap();
        assert_relative_eq!(fwd.s12, bwd.s12, epsilon = 1e-6);
        // reduced length is symmetric
        assert_relative_eq!(fwd.m12, bwd.m12, epsilon = 1e-6);
        assert_relative_eq!(fwd.scale12, bwd.scale21, epsilon = 1e-12);
        // azimuths swap and reverse
        assert!(azimuth_diff(fwd.azi1, bwd.azi2 + 180.0).abs() < 1e-8);
        assert!(azimuth_diff(fwd.azi2, bwd.azi1 + 180.0).abs() < 1e-8);
    }
}

#[test]
fn test_meridional_inverse() {
    let g = wgs84();
    let mut rng = StdRng::seed_from_u64(11_u64);
    for _ in 0..SAMPLES {
        let lat1: f64 = rng.random_range(-90.0..=90.0);
        let lat2: f64 = rng.random_range(-90.0..=90.0);
        let lon: f64 = rng.random_range(-180.0..180.0);
        let inv = g.inverse(lat1, lon, lat2, lon).unwrap();
        for azi in [inv.azi1, inv.azi2] {
            assert!(azi.abs() < 1e-12 || (azi.abs() - 180.0).abs() < 1e-12);
        }
        // distance is the difference of meridian arcs from the equator
        let m1 = g.inverse(0.0, lon, lat1, lon).unwrap().s12;
        let m2 = g.inverse(0.0, lon, lat2, lon).unwrap().s12;
        let expected = (m1 * lat1.signum() - m2 * lat2.signum()).abs();
        assert_relative_eq!(inv.s12, expected, epsilon = 1e-6);
    }
}

#[test]
fn test_equatorial_inverse() {
    let mut rng = StdRng::seed_from_u64(13_u64);
    for f in [0.0, 1.0 / 298.257_223_563, 1.0 / 150.0] {
        let g = GeodesicExact::new(6_378_137.0, f).unwrap();
        // beyond 180 (1 - f) degrees the shortest path leaves the equator
        let limit = 180.0 * (1.0 - f) - 1e-3;
        for _ in 0..50 {
            let lon1: f64 = rng.random_range(-180.0..180.0);
            let dlon: f64 = rng.random_range(-limit..limit);
            let inv = g.inverse(0.0, lon1, 0.0, lon1 + dlon).unwrap();
            let azi = if dlon >= 0.0 { 90.0 } else { -90.0 };
            assert_relative_eq!(inv.azi1, azi, epsilon = 1e-12);
            assert_relative_eq!(inv.azi2, azi, epsilon = 1e-12);
            let lam = ang_diff(lon1, lon1 + dlon).0.to_radians().abs();
            assert_relative_eq!(inv.s12, 6_378_137.0 * lam, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_clairaut_on_random_lines() {
    let g = wgs84();
    let f1 = 1.0 - g.flattening();
    let mut rng = StdRng::seed_from_u64(17_u64);
    for _ in 0..50 {
        let (lat1, lon1) = random_point(&mut rng);
        let azi1: f64 = rng.random_range(-180.0..180.0);
        let line = g.line(lat1, lon1, azi1, GeodesicMask::STANDARD);
        let (salp0, _) = line.equatorial_azimuth_sincos();
        for i in 0..8 {
            let p = line
                .arc_position(45.0 * i as f64 + 1.0, GeodesicMask::STANDARD)
                .unwrap();
            let bet = (f1 * p.lat2.to_radians().tan()).atan();
            let invariant = p.azi2.to_radians().sin() * bet.cos();
            assert!((invariant - salp0).abs() < 1e-13);
        }
    }
}

#[test]
fn test_long_unroll_consistency() {
    let g = wgs84();
    let mut rng = StdRng::seed_from_u64(19_u64);
    for _ in 0..SAMPLES {
        let (lat1, lon1) = random_point(&mut rng);
        let azi1: f64 = rng.random_range(-180.0..180.0);
        let s12: f64 = rng.random_range(-4e7..4e7);
        let plain = g.gen_direct(lat1, lon1, azi1, false, s12, GeodesicMask::STANDARD);
        let unrolled = g.gen_direct(
            lat1,
            lon1,
            azi1,
            false,
            s12,
            GeodesicMask::STANDARD | GeodesicMask::LONG_UNROLL,
        );
        assert!(plain.lon2.abs() <= 180.0);
        let turns = (unrolled.lon2 - plain.lon2) / 360.0;
        assert!((turns - turns.round()).abs() < 1e-10);
    }
}

#[test]
fn test_angle_helpers() {
    let mut rng = StdRng::seed_from_u64(23_u64);
    for _ in 0..SAMPLES {
        let x: f64 = rng.random_range(-1000.0..1000.0);
        let y: f64 = rng.random_range(-1000.0..1000.0);
        let (d, _) = ang_diff(x, y);
        assert!(d.abs() <= 180.0);
        let k = ((x + d - y) / 360.0).round();
        assert!((x + d - y - 360.0 * k).abs() < 1e-10);

        let n = ang_normalize(x);
        assert_eq!(ang_normalize(n), n);

        let u: f64 = rng.random_range(-1e10..1e10);
        let v: f64 = rng.random_range(-1e10..1e10);
        let (s, t) = sum(u, v);
        assert_eq!(s, u + v);
        // error-free: t recovers the rounding error exactly
        let (big, small) = if u.abs() >= v.abs() { (u, v) } else { (v, u) };
        assert_eq!((s - big) - small, -t);
    }
}
