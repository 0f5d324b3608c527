//! # Perimeter and area of geodesic polygons
//!
//! [`PolygonArea`] accumulates the edges of a polygon whose sides are geodesics and reports its
//! perimeter and enclosed area. Vertices are added with [`PolygonArea::add_point`], or edges
//! given by azimuth and length with [`PolygonArea::add_edge`]; the closing edge back to the first
//! vertex is added implicitly by [`PolygonArea::compute`].
//!
//! ## Area bookkeeping
//!
//! Each edge contributes its area `S12` to the equator. Summing these gives the polygon area up
//! to a multiple of the ellipsoid area `A = 4π c²`. The number of times the polygon crosses the
//! prime meridian fixes the ambiguity: an odd count means the polygon encircles a pole and the
//! sum is shifted by `A/2`. Sums are kept in an [`Accumulator`] so that large polygons built from
//! many short edges lose no precision.
//!
//! A polygon traversed counter-clockwise has positive area. With `reverse` the clockwise
//! orientation counts as positive. With `sign` the result lies in `(−A/2, A/2]`, otherwise in
//! `[0, A)`.
//!
//! In polyline mode only the length is tracked.
//!
//! ## Empty polygons
//!
//! An edge needs a starting vertex, so [`PolygonArea::add_edge`] on a polygon with no points
//! leaves it unchanged, and [`PolygonArea::test_edge`] returns a result with `num = 0` and NaN
//! perimeter and area. Start with [`PolygonArea::add_point`] before adding edges.
//!
//! ## Example
//!
//! ```rust
//! use geodesic_exact::geodesic_exact::GeodesicExact;
//! use geodesic_exact::polygon_area::PolygonArea;
//!
//! let geod = GeodesicExact::wgs84().unwrap();
//! let mut poly = PolygonArea::new(geod, false);
//! for (lat, lon) in [(89.0, 0.0), (89.0, 90.0), (89.0, 180.0), (89.0, 270.0)] {
//!     poly.add_point(lat, lon).unwrap();
//! }
//! let res = poly.compute(false, true).unwrap();
//! assert_eq!(res.num, 4);
//! assert!((res.area - 24_952_305_678.0).abs() < 1.0);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::ops::AddAssign;

use crate::constants::FULL_TURN_DEG;
use crate::float_ops::{ang_diff, ang_normalize, sum, FloatOps};
use crate::geodesic_errors::GeodesicError;
use crate::geodesic_exact::GeodesicExact;
use crate::geodesic_mask::GeodesicMask;

/// Running sum carried in double-double precision.
///
/// The value is `s + t` where `t` holds the rounding error of `s`. Adding `n` terms loses at
/// most one rounding overall instead of one per term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    s: f64,
    t: f64,
}

impl Accumulator {
    pub fn new(y: f64) -> Self {
        Accumulator { s: y, t: 0.0 }
    }

    /// Add `y` to the sum.
    pub fn add(&mut self, y: f64) {
        let (y, u) = sum(y, self.t);
        let (s, t) = sum(y, self.s);
        self.s = s;
        self.t = t;
        // keep s the best estimate of the sum; u is folded into t unless s vanished
        if self.s == 0.0 {
            self.s = u;
        } else {
            self.t += u;
        }
    }

    /// Value of `self + y` without modifying `self`.
    pub fn sum(&self, y: f64) -> f64 {
        let mut a = *self;
        a.add(y);
        a.s
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.s
    }

    pub fn negate(&mut self) {
        self.s = -self.s;
        self.t = -self.t;
    }

    /// Reduce the sum to `[-y/2, y/2]` with the IEEE remainder.
    pub fn remainder(&mut self, y: f64) {
        self.s = self.s.ieee_remainder(y);
        self.add(0.0);
    }
}

impl AddAssign<f64> for Accumulator {
    fn add_assign(&mut self, y: f64) {
        self.add(y);
    }
}

/// Result of [`PolygonArea::compute`] and of the `test_*` methods.
///
/// Fields
/// -----------------
/// * `num` – number of vertices.
/// * `perimeter` – length of the closed polygon, or of the polyline.
/// * `area` – signed area, NaN for a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonResult {
    pub num: usize,
    pub perimeter: f64,
    pub area: f64,
}

impl fmt::Display for PolygonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, perimeter = {:.6}, area = {:.3}",
            self.num, self.perimeter, self.area
        )
    }
}

/// Accumulator of the vertices of a geodesic polygon or polyline.
#[derive(Debug, Clone)]
pub struct PolygonArea<'a> {
    geod: &'a GeodesicExact,
    polyline: bool,
    mask: GeodesicMask,
    area0: f64,
    num: usize,
    crossings: i32,
    areasum: Accumulator,
    perimetersum: Accumulator,
    lat0: f64,
    lon0: f64,
    lat1: f64,
    lon1: f64,
}

/// +1 or −1 when the edge from `lon1` to `lon2` crosses the prime meridian eastward or westward.
fn transit(lon1: f64, lon2: f64) -> i32 {
    let (lon12, _) = ang_diff(lon1, lon2);
    let lon1 = ang_normalize(lon1);
    let lon2 = ang_normalize(lon2);
    if lon12 > 0.0 && ((lon1 < 0.0 && lon2 >= 0.0) || (lon1 > 0.0 && lon2 == 0.0)) {
        1
    } else if lon12 < 0.0 && lon1 >= 0.0 && lon2 < 0.0 {
        -1
    } else {
        0
    }
}

/// Parity change of `floor(lon / 360)` between two unrolled longitudes.
fn transit_direct(lon1: f64, lon2: f64) -> i32 {
    let lon1 = lon1.ieee_remainder(2.0 * FULL_TURN_DEG);
    let lon2 = lon2.ieee_remainder(2.0 * FULL_TURN_DEG);
    let in_lower = |lon: f64| i32::from(lon <= 0.0 && lon > -FULL_TURN_DEG);
    in_lower(lon2) - in_lower(lon1)
}

/// Bring a raw area sum into the requested range.
fn area_reduce(mut area: Accumulator, area0: f64, crossings: i32, reverse: bool, sign: bool) -> f64 {
    area.remainder(area0);
    if crossings & 1 != 0 {
        let half = if area.value() < 0.0 { area0 / 2.0 } else { -area0 / 2.0 };
        area += half;
    }
    // area is with the clockwise sense; flip unless reverse
    if !reverse {
        area.negate();
    }
    if sign {
        if area.value() > area0 / 2.0 {
            area += -area0;
        } else if area.value() <= -area0 / 2.0 {
            area += area0;
        }
    } else if area.value() >= area0 {
        area += -area0;
    } else if area.value() < 0.0 {
        area += area0;
    }
    0.0 + area.value()
}

impl<'a> PolygonArea<'a> {
    /// Empty polygon (or polyline when `polyline` is true) on `geod`.
    pub fn new(geod: &'a GeodesicExact, polyline: bool) -> Self {
        let mask = GeodesicMask::LATITUDE
            | GeodesicMask::LONGITUDE
            | GeodesicMask::DISTANCE
            | if polyline {
                GeodesicMask::NONE
            } else {
                GeodesicMask::AREA | GeodesicMask::LONG_UNROLL
            };
        PolygonArea {
            geod,
            polyline,
            mask,
            area0: geod.ellipsoid_area(),
            num: 0,
            crossings: 0,
            areasum: Accumulator::default(),
            perimetersum: Accumulator::default(),
            lat0: f64::NAN,
            lon0: f64::NAN,
            lat1: f64::NAN,
            lon1: f64::NAN,
        }
    }

    /// Remove every vertex.
    pub fn clear(&mut self) {
        self.num = 0;
        self.crossings = 0;
        self.areasum = Accumulator::default();
        self.perimetersum = Accumulator::default();
        self.lat0 = f64::NAN;
        self.lon0 = f64::NAN;
        self.lat1 = f64::NAN;
        self.lon1 = f64::NAN;
    }

    /// Number of vertices so far.
    pub fn num(&self) -> usize {
        self.num
    }

    pub fn is_polyline(&self) -> bool {
        self.polyline
    }

    /// Most recent vertex, `(NaN, NaN)` when empty.
    pub fn current_point(&self) -> (f64, f64) {
        (self.lat1, self.lon1)
    }

    /// Append a vertex.
    ///
    /// Return
    /// ----------
    /// * `Err(GeodesicError::ConvergenceFailure)` only with a strict engine.
    pub fn add_point(&mut self, lat: f64, lon: f64) -> Result<(), GeodesicError> {
        if self.num == 0 {
            self.lat0 = lat;
            self.lat1 = lat;
            self.lon0 = lon;
            self.lon1 = lon;
        } else {
            let inv = self
                .geod
                .gen_inverse(self.lat1, self.lon1, lat, lon, self.mask)?;
            self.perimetersum += inv.s12;
            if !self.polyline {
                self.areasum += inv.area12;
                self.crossings += transit(self.lon1, lon);
            }
            self.lat1 = lat;
            self.lon1 = lon;
        }
        self.num += 1;
        Ok(())
    }

    /// Append an edge of length `s` leaving the current vertex with azimuth `azi`.
    ///
    /// Does nothing on an empty polygon, which has no current vertex.
    pub fn add_edge(&mut self, azi: f64, s: f64) {
        if self.num == 0 {
            return;
        }
        let dir = self
            .geod
            .gen_direct(self.lat1, self.lon1, azi, false, s, self.mask);
        self.perimetersum += s;
        if !self.polyline {
            self.areasum += dir.area12;
            self.crossings += transit_direct(self.lon1, dir.lon2);
        }
        self.lat1 = dir.lat2;
        self.lon1 = dir.lon2;
        self.num += 1;
    }

    /// Perimeter and area of the polygon closed back to its first vertex.
    ///
    /// Arguments
    /// -----------------
    /// * `reverse` – count clockwise traversal as positive.
    /// * `sign` – return a signed area in `(−A/2, A/2]` instead of `[0, A)`.
    ///
    /// Return
    /// ----------
    /// * [`PolygonResult`]; fewer than two vertices give zero perimeter and area.
    pub fn compute(&self, reverse: bool, sign: bool) -> Result<PolygonResult, GeodesicError> {
        let area_if_polygon = |a: f64| if self.polyline { f64::NAN } else { a };
        if self.num < 2 {
            return Ok(PolygonResult {
                num: self.num,
                perimeter: 0.0,
                area: area_if_polygon(0.0),
            });
        }
        if self.polyline {
            return Ok(PolygonResult {
                num: self.num,
                perimeter: self.perimetersum.value(),
                area: f64::NAN,
            });
        }

        let inv = self
            .geod
            .gen_inverse(self.lat1, self.lon1, self.lat0, self.lon0, self.mask)?;
        let perimeter = self.perimetersum.sum(inv.s12);
        let mut tempsum = self.areasum;
        tempsum += inv.area12;
        let crossings = self.crossings + transit(self.lon1, self.lon0);
        Ok(PolygonResult {
            num: self.num,
            perimeter,
            area: area_reduce(tempsum, self.area0, crossings, reverse, sign),
        })
    }

    /// Result if the vertex `(lat, lon)` were appended, without modifying the polygon.
    pub fn test_point(
        &self,
        lat: f64,
        lon: f64,
        reverse: bool,
        sign: bool,
    ) -> Result<PolygonResult, GeodesicError> {
        if self.num == 0 {
            return Ok(PolygonResult {
                num: 1,
                perimeter: 0.0,
                area: if self.polyline { f64::NAN } else { 0.0 },
            });
        }

        let mut perimeter = self.perimetersum.value();
        let mut tempsum = if self.polyline {
            Accumulator::default()
        } else {
            self.areasum
        };
        let mut crossings = self.crossings;
        let mut legs: SmallVec<[(f64, f64, f64, f64); 2]> =
            smallvec![(self.lat1, self.lon1, lat, lon)];
        if !self.polyline {
            legs.push((lat, lon, self.lat0, self.lon0));
        }
        for (la1, lo1, la2, lo2) in legs {
            let inv = self.geod.gen_inverse(la1, lo1, la2, lo2, self.mask)?;
            perimeter += inv.s12;
            if !self.polyline {
                tempsum += inv.area12;
                crossings += transit(lo1, lo2);
            }
        }

        Ok(PolygonResult {
            num: self.num + 1,
            perimeter,
            area: if self.polyline {
                f64::NAN
            } else {
                area_reduce(tempsum, self.area0, crossings, reverse, sign)
            },
        })
    }

    /// Result if an edge with azimuth `azi` and length `s` were appended.
    ///
    /// An empty polygon has no vertex to start the edge from: the result then has `num = 0`
    /// and NaN perimeter and area.
    pub fn test_edge(
        &self,
        azi: f64,
        s: f64,
        reverse: bool,
        sign: bool,
    ) -> Result<PolygonResult, GeodesicError> {
        if self.num == 0 {
            return Ok(PolygonResult {
                num: 0,
                perimeter: f64::NAN,
                area: f64::NAN,
            });
        }
        let num = self.num + 1;
        let mut perimeter = self.perimetersum.value() + s;
        if self.polyline {
            return Ok(PolygonResult {
                num,
                perimeter,
                area: f64::NAN,
            });
        }

        let mut tempsum = self.areasum;
        let mut crossings = self.crossings;
        let dir = self
            .geod
            .gen_direct(self.lat1, self.lon1, azi, false, s, self.mask);
        tempsum += dir.area12;
        crossings += transit_direct(self.lon1, dir.lon2);
        let inv = self
            .geod
            .gen_inverse(dir.lat2, dir.lon2, self.lat0, self.lon0, self.mask)?;
        perimeter += inv.s12;
        tempsum += inv.area12;
        crossings += transit(dir.lon2, self.lon0);

        Ok(PolygonResult {
            num,
            perimeter,
            area: area_reduce(tempsum, self.area0, crossings, reverse, sign),
        })
    }
}
