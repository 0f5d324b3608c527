mod common;

use approx::assert_relative_eq;
use geodesic_exact::polygon_area::PolygonArea;

use crate::common::wgs84;

const ELLIPSOID_AREA: f64 = 510_065_621_724_088.44;

fn polygon_of<'a>(points: &[(f64, f64)]) -> PolygonArea<'a> {
    let mut poly = PolygonArea::new(wgs84(), false);
    for &(lat, lon) in points {
        poly.add_point(lat, lon).unwrap();
    }
    poly
}

#[test]
fn test_polar_cap() {
    let north = polygon_of(&[(89.0, 0.0), (89.0, 90.0), (89.0, 180.0), (89.0, 270.0)]);
    let res = north.compute(false, true).unwrap();
    assert_eq!(res.num, 4);
    assert_relative_eq!(res.perimeter, 631_819.874_528_007_7, epsilon = 1e-6);
    assert_relative_eq!(res.area, 24_952_305_678.0, epsilon = 1.0);

    let south = polygon_of(&[(-89.0, 0.0), (-89.0, 90.0), (-89.0, 180.0), (-89.0, 270.0)]);
    let res = south.compute(false, true).unwrap();
    assert_relative_eq!(res.area, -24_952_305_678.0, epsilon = 1.0);
}

#[test]
fn test_octant() {
    let poly = polygon_of(&[(90.0, 0.0), (0.0, 0.0), (0.0, 90.0)]);
    let res = poly.compute(false, true).unwrap();
    assert_relative_eq!(res.perimeter, 30_022_685.630_020_07, epsilon = 1e-5);
    assert_relative_eq!(res.area, 63_758_202_715_511.055, max_relative = 1e-12);
    assert_relative_eq!(res.area, ELLIPSOID_AREA / 8.0, max_relative = 1e-12);
}

#[test]
fn test_orientation_and_range() {
    // clockwise diamond around the origin
    let poly = polygon_of(&[(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)]);
    let area = 24_619_419_146.885_662;
    let signed = poly.compute(false, true).unwrap();
    assert_relative_eq!(signed.area, -area, epsilon = 1e-2);
    let reversed = poly.compute(true, true).unwrap();
    assert_relative_eq!(reversed.area, area, epsilon = 1e-2);
    let unsigned = poly.compute(false, false).unwrap();
    assert_relative_eq!(unsigned.area, ELLIPSOID_AREA - area, max_relative = 1e-14);
    assert_relative_eq!(signed.perimeter, 627_598.273_165_361, epsilon = 1e-6);
}

#[test]
fn test_point_and_edge_previews() {
    let g = wgs84();
    let mut poly = polygon_of(&[(0.0, -1.0), (-1.0, 0.0), (0.0, 1.0)]);

    let preview = poly.test_point(1.0, 0.0, false, true).unwrap();
    poly.add_point(1.0, 0.0).unwrap();
    let actual = poly.compute(false, true).unwrap();
    assert_eq!(preview.num, actual.num);
    assert_relative_eq!(preview.perimeter, actual.perimeter, epsilon = 1e-8);
    assert_relative_eq!(preview.area, actual.area, epsilon = 1e-4);

    // an edge ending at the same place gives the same polygon
    let mut by_edges = polygon_of(&[(0.0, -1.0), (-1.0, 0.0), (0.0, 1.0)]);
    let leg = g.inverse(0.0, 1.0, 1.0, 0.0).unwrap();
    let preview = by_edges.test_edge(leg.azi1, leg.s12, false, true).unwrap();
    by_edges.add_edge(leg.azi1, leg.s12);
    let res = by_edges.compute(false, true).unwrap();
    assert_eq!(res.num, 4);
    assert_relative_eq!(preview.area, res.area, epsilon = 1e-4);
    assert_relative_eq!(res.area, actual.area, epsilon = 1e-2);
    assert_relative_eq!(res.perimeter, actual.perimeter, epsilon = 1e-6);
}

#[test]
fn test_empty_polygon_previews() {
    let poly = PolygonArea::new(wgs84(), false);
    let res = poly.test_point(10.0, 10.0, false, true).unwrap();
    assert_eq!(res.num, 1);
    assert_eq!(res.perimeter, 0.0);
    assert_eq!(res.area, 0.0);

    let res = poly.test_edge(45.0, 1000.0, false, true).unwrap();
    assert_eq!(res.num, 0);
    assert!(res.perimeter.is_nan());
    assert!(res.area.is_nan());

    let mut poly = poly;
    poly.add_edge(45.0, 1000.0);
    assert_eq!(poly.num(), 0);
    let res = poly.compute(false, true).unwrap();
    assert_eq!(res.num, 0);
    assert_eq!(res.perimeter, 0.0);
    assert_eq!(res.area, 0.0);

    // the edge is kept once a vertex exists
    poly.add_point(10.0, 10.0).unwrap();
    poly.add_edge(45.0, 1000.0);
    assert_eq!(poly.num(), 2);
    let res = poly.compute(false, true).unwrap();
    assert_relative_eq!(res.perimeter, 2000.0, epsilon = 1e-5);
}

#[test]
fn test_polyline_length() {
    let g = wgs84();
    let mut line = PolygonArea::new(g, true);
    assert!(line.is_polyline());
    let points = [(40.6, -73.8), (49.01666667, 2.55), (1.4, 104.0)];
    for (lat, lon) in points {
        line.add_point(lat, lon).unwrap();
    }
    let expected = 5_853_226.255_613_288
        + g.inverse(49.01666667, 2.55, 1.4, 104.0).unwrap().s12;
    let res = line.compute(false, true).unwrap();
    assert_eq!(res.num, 3);
    assert_relative_eq!(res.perimeter, expected, epsilon = 1e-5);
    assert!(res.area.is_nan());
    assert_eq!(line.current_point(), (1.4, 104.0));

    let preview = line.test_edge(0.0, 1000.0, false, true).unwrap();
    assert_relative_eq!(preview.perimeter, expected + 1000.0, epsilon = 1e-5);
    assert!(preview.area.is_nan());
}

#[test]
fn test_many_short_edges_around_the_equator() {
    // a band between the equator and 1° north built from many small edges
    let mut poly = PolygonArea::new(wgs84(), false);
    for i in 0..360 {
        poly.add_point(0.0, i as f64).unwrap();
    }
    for i in (0..360).rev() {
        poly.add_point(1.0, i as f64).unwrap();
    }
    let res = poly.compute(false, true).unwrap();
    assert_eq!(res.num, 720);
    assert_relative_eq!(res.perimeter, 80_142_497.084_758_67, epsilon = 1e-3);
    assert_relative_eq!(res.area, 4_418_851_431_767.501, max_relative = 1e-9);
}
