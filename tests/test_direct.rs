mod common;

use approx::assert_relative_eq;
use geodesic_exact::geodesic_exact::GeodesicExact;
use geodesic_exact::geodesic_mask::GeodesicMask;

use crate::common::{assert_direct_close, wgs84, ANGLE_TOL, DIST_TOL};

#[test]
fn test_direct_mid_latitude() {
    let sol = wgs84().direct(30.0, 0.0, 45.0, 1e7);
    assert_direct_close(&sol, 37.90417384344856, 116.30313395167221, 129.12536576049615);
    assert_relative_eq!(sol.a12, 89.98019583023444, epsilon = ANGLE_TOL);
    assert_relative_eq!(sol.m12, 6_380_371.240_711_334, epsilon = DIST_TOL);
    assert_eq!(sol.s12, 1e7);
}

#[test]
fn test_direct_jfk_to_cdg() {
    let sol = wgs84().direct(40.63972222, -73.77888889, 53.5, 5850e3);
    assert_direct_close(&sol, 49.01466892888652, 2.561062258608075, 111.62946705296925);
}

#[test]
fn test_direct_from_north_pole() {
    let sol = wgs84().direct(90.0, 0.0, 0.0, 1000.0);
    assert_direct_close(&sol, 89.99104696596872, 180.0, 180.0);
    assert!(!sol.lat2.is_nan());
}

#[test]
fn test_direct_from_pole_with_negative_distance() {
    let sol = wgs84().direct(90.0, 10.0, 180.0, -1e6);
    assert_direct_close(&sol, 81.04623281595062, -170.0, 0.0);
}

#[test]
fn test_direct_tiny_negative_azimuth_unrolled() {
    let g = wgs84();
    let sol = g.gen_direct(
        45.0,
        0.0,
        -3e-18,
        false,
        1e7,
        GeodesicMask::STANDARD | GeodesicMask::LONG_UNROLL,
    );
    assert_direct_close(&sol, 45.30631909799039, -180.0, -180.0);
}

#[test]
fn test_direct_long_unroll() {
    let g = wgs84();
    let mask = GeodesicMask::STANDARD;
    let wrapped = g.gen_direct(40.0, -75.0, -10.0, false, 2e7, mask);
    let unrolled = g.gen_direct(40.0, -75.0, -10.0, false, 2e7, mask | GeodesicMask::LONG_UNROLL);
    assert_direct_close(
        &unrolled,
        -39.970412314864305,
        -254.9128946602603,
        -170.00435716533698,
    );
    assert_relative_eq!(wrapped.lon2, 105.08710533973968, epsilon = ANGLE_TOL);
    assert_eq!(wrapped.lat2, unrolled.lat2);
    let turns = ((unrolled.lon2 - wrapped.lon2) / 360.0).round();
    assert_eq!(turns, -1.0);
    assert_relative_eq!(unrolled.lon2 - wrapped.lon2, 360.0 * turns, epsilon = 1e-9);
}

#[test]
fn test_direct_area_prolate_and_oblate() {
    let prolate = GeodesicExact::new(6.4e6, -1.0 / 150.0).unwrap();
    let sol = prolate.gen_direct(1.0, 2.0, 3.0, false, 4.0, GeodesicMask::AREA);
    assert_relative_eq!(sol.area12, 23_699.563_430_928_58, max_relative = 1e-10);

    let oblate = GeodesicExact::new(6.4e6, 1.0 / 150.0).unwrap();
    let sol = oblate.gen_direct(1.0, 2.0, 3.0, false, 4.0, GeodesicMask::AREA);
    assert_relative_eq!(sol.area12, 23_075.960_298_647_96, max_relative = 1e-10);
}

#[test]
fn test_arc_direct_matches_distance_direct() {
    let g = wgs84();
    let by_dist = g.direct(30.0, 0.0, 45.0, 1e7);
    let by_arc = g.arc_direct(30.0, 0.0, 45.0, by_dist.a12);
    assert_relative_eq!(by_arc.s12, 1e7, epsilon = 1e-6);
    assert_relative_eq!(by_arc.lat2, by_dist.lat2, epsilon = 1e-12);
    assert_relative_eq!(by_arc.lon2, by_dist.lon2, epsilon = 1e-12);
    assert_relative_eq!(by_arc.azi2, by_dist.azi2, epsilon = 1e-12);
}

#[test]
fn test_direct_unrequested_outputs_are_nan() {
    let sol = wgs84().gen_direct(30.0, 0.0, 45.0, false, 1e7, GeodesicMask::LATITUDE);
    assert!(sol.lat2.is_finite());
    assert!(sol.lon2.is_nan());
    assert!(sol.azi2.is_nan());
    assert!(sol.m12.is_nan());
    assert!(sol.area12.is_nan());
    assert!(sol.a12.is_finite());
}

#[test]
fn test_direct_invalid_latitude() {
    let sol = wgs84().direct(91.0, 0.0, 0.0, 1000.0);
    assert!(sol.lat2.is_nan());
}
