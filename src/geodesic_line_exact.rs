//! # Geodesic lines
//!
//! A [`GeodesicLineExact`] caches everything that depends only on the starting point and
//! azimuth of a geodesic: the reduced latitude `β1`, the equatorial azimuth `α0`, the arcs `σ1`
//! and `ω1` from the equator crossing, and the complete elliptic integrals for `k² = e′² cos² α0`.
//! Points along the line are then obtained with [`GeodesicLineExact::gen_position`] at the cost
//! of a few incomplete integrals each.
//!
//! ## Capabilities
//!
//! The `caps` mask given at construction decides which integrals are prepared
//! (`CAP_E` for distance, `CAP_D` for reduced length and scales, `CAP_H` for longitude,
//! `CAP_C4` for area). Asking [`gen_position`](GeodesicLineExact::gen_position) for an output the
//! line was not built for returns [`GeodesicError::MissingCapability`].
//!
//! ## Reference point
//!
//! A line may carry a reference point 3 at distance `s13` / arc `a13` from point 1. It is set by
//! [`GeodesicExact::direct_line`](crate::geodesic_exact::GeodesicExact::direct_line),
//! [`GeodesicExact::inverse_line`](crate::geodesic_exact::GeodesicExact::inverse_line),
//! [`set_distance`](GeodesicLineExact::set_distance) or [`set_arc`](GeodesicLineExact::set_arc),
//! and evaluated with [`reference_position`](GeodesicLineExact::reference_position).
//!
//! ## Example
//!
//! ```rust
//! use geodesic_exact::geodesic_exact::GeodesicExact;
//! use geodesic_exact::geodesic_mask::GeodesicMask;
//!
//! let geod = GeodesicExact::wgs84().unwrap();
//! let line = geod
//!     .inverse_line(40.64, -73.78, 1.36, 103.99, GeodesicMask::STANDARD)
//!     .unwrap();
//! // ten equally spaced waypoints
//! for i in 0..=10 {
//!     let p = line.position(line.distance() * i as f64 / 10.0, GeodesicMask::STANDARD).unwrap();
//!     assert!(p.lat2.is_finite());
//! }
//! ```

use crate::constants::QUARTER_TURN;
use crate::elliptic_function::EllipticFunction;
use crate::float_ops::{ang_normalize, ang_round, atan2d, lat_fix, norm, sincosd, sq};
use crate::geodesic_errors::GeodesicError;
use crate::geodesic_exact::area::C4Coeffs;
use crate::geodesic_exact::GeodesicExact;
use crate::geodesic_mask::GeodesicMask;
use crate::geodesic_solution::DirectSolution;

/// A geodesic starting at a given point with a given azimuth.
///
/// The line borrows its engine; it is cheap to evaluate many times and can be shared
/// read-only between threads.
#[derive(Debug, Clone)]
pub struct GeodesicLineExact<'a> {
    geod: &'a GeodesicExact,
    caps: GeodesicMask,

    lat1: f64,
    lon1: f64,
    azi1: f64,
    salp1: f64,
    calp1: f64,

    dn1: f64,
    salp0: f64,
    calp0: f64,
    k2: f64,
    ssig1: f64,
    csig1: f64,
    somg1: f64,
    cchi1: f64,
    stau1: f64,
    ctau1: f64,
    ell: EllipticFunction,

    e0: f64,
    e1: f64,
    d0: f64,
    d1: f64,
    h0: f64,
    h1: f64,
    a4: f64,
    b41: f64,
    c4a: C4Coeffs,

    s13: f64,
    a13: f64,
    arc_reference: bool,
}

impl<'a> GeodesicLineExact<'a> {
    /// Line through `(lat1, lon1)` with azimuth `azi1`.
    ///
    /// Arguments
    /// -----------------
    /// * `geod` – the engine the line belongs to.
    /// * `lat1`, `lon1` – starting point (degrees); `lat1` outside `[-90, 90]` gives a line that
    ///   only returns NaN.
    /// * `azi1` – azimuth at point 1 (degrees).
    /// * `caps` – outputs the line should support.
    pub fn new(
        geod: &'a GeodesicExact,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        caps: GeodesicMask,
    ) -> Self {
        let azi1 = ang_normalize(azi1);
        // Round to avoid degeneracies near azi1 = 0 and ±180.
        let (salp1, calp1) = sincosd(ang_round(azi1));
        Self::with_sincos(geod, lat1, lon1, azi1, salp1, calp1, caps)
    }

    /// Line with the azimuth also given as `(sin, cos)`, as produced by the inverse solver.
    pub(crate) fn with_sincos(
        geod: &'a GeodesicExact,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        salp1: f64,
        calp1: f64,
        caps: GeodesicMask,
    ) -> Self {
        let caps = caps | GeodesicMask::LATITUDE | GeodesicMask::AZIMUTH | GeodesicMask::LONG_UNROLL;
        let lat1 = lat_fix(lat1);

        let (sbet1, cbet1) = geod.reduced_latitude(ang_round(lat1));
        let dn1 = geod.dn(sbet1, cbet1);

        // alp0 in [0, pi/2 - |bet1|]
        let salp0 = salp1 * cbet1;
        let calp0 = calp1.hypot(salp1 * sbet1);

        // sig1 is measured from the northward equator crossing; at the equator with a due-east
        // or due-west azimuth the crossing is point 1 itself.
        let somg1 = salp0 * sbet1;
        let comg1 = if sbet1 != 0.0 || calp1 != 0.0 {
            cbet1 * calp1
        } else {
            1.0
        };
        let (ssig1, csig1) = norm(sbet1, comg1);

        let k2 = sq(calp0) * geod.ep2;
        let ell = EllipticFunction::with_complements(-k2, -geod.ep2, 1.0 + k2, 1.0 + geod.ep2);
        let cchi1 = geod.f1 * dn1 * comg1;

        let mut line = GeodesicLineExact {
            geod,
            caps,
            lat1,
            lon1,
            azi1,
            salp1,
            calp1,
            dn1,
            salp0,
            calp0,
            k2,
            ssig1,
            csig1,
            somg1,
            cchi1,
            stau1: f64::NAN,
            ctau1: f64::NAN,
            ell,
            e0: f64::NAN,
            e1: f64::NAN,
            d0: f64::NAN,
            d1: f64::NAN,
            h0: f64::NAN,
            h1: f64::NAN,
            a4: f64::NAN,
            b41: f64::NAN,
            c4a: C4Coeffs::new(),
            s13: f64::NAN,
            a13: f64::NAN,
            arc_reference: true,
        };

        if caps.contains(GeodesicMask::CAP_E) {
            line.e0 = line.ell.e() / QUARTER_TURN;
            line.e1 = line.ell.delta_e(ssig1, csig1, dn1);
            let (s, c) = line.e1.sin_cos();
            // tau1 = sig1 + B11
            line.stau1 = ssig1 * c + csig1 * s;
            line.ctau1 = csig1 * c - ssig1 * s;
        }
        if caps.contains(GeodesicMask::CAP_D) {
            line.d0 = line.ell.d() / QUARTER_TURN;
            line.d1 = line.ell.delta_d(ssig1, csig1, dn1);
        }
        if caps.contains(GeodesicMask::CAP_H) {
            line.h0 = line.ell.h() / QUARTER_TURN;
            line.h1 = line.ell.delta_h(ssig1, csig1, dn1);
        }
        if caps.contains(GeodesicMask::CAP_C4) {
            line.a4 = sq(geod.a) * calp0 * salp0 * geod.e2;
            if line.a4 != 0.0 {
                line.c4a = geod.c4f(k2);
                line.b41 = GeodesicExact::cos_series(ssig1, csig1, &line.c4a);
            } else {
                line.b41 = 0.0;
            }
        }
        line
    }

    /// Point at distance or arc `s12_a12` from point 1.
    ///
    /// Arguments
    /// -----------------
    /// * `arcmode` – `s12_a12` is an arc in degrees when true, a distance otherwise.
    /// * `s12_a12` – signed distance or arc from point 1.
    /// * `outmask` – outputs to compute, plus `LONG_UNROLL` to keep `lon2 − lon1` unwrapped.
    ///
    /// Return
    /// ----------
    /// * `Ok(DirectSolution)` with unrequested fields set to NaN.
    /// * `Err(GeodesicError::MissingCapability)` when `outmask` asks for something the line was
    ///   not built for, or when a distance is given to a line without `DISTANCE_IN`.
    pub fn gen_position(
        &self,
        arcmode: bool,
        s12_a12: f64,
        outmask: GeodesicMask,
    ) -> Result<DirectSolution, GeodesicError> {
        if !self.caps.covers(outmask) {
            return Err(GeodesicError::MissingCapability(
                (outmask & GeodesicMask::OUT_ALL) - self.caps,
            ));
        }
        if !arcmode && !self.caps.wants(GeodesicMask::DISTANCE_IN) {
            return Err(GeodesicError::MissingCapability(
                GeodesicMask::DISTANCE_IN & GeodesicMask::OUT_ALL,
            ));
        }
        Ok(self.position_unchecked(arcmode, s12_a12, outmask))
    }

    /// Point at distance `s12` from point 1.
    pub fn position(&self, s12: f64, outmask: GeodesicMask) -> Result<DirectSolution, GeodesicError> {
        self.gen_position(false, s12, outmask)
    }

    /// Point at arc `a12` (degrees) from point 1.
    pub fn arc_position(
        &self,
        a12: f64,
        outmask: GeodesicMask,
    ) -> Result<DirectSolution, GeodesicError> {
        self.gen_position(true, a12, outmask)
    }

    /// Evaluate the reference point 3.
    ///
    /// The reference is evaluated in the mode it was set with: by distance after
    /// [`set_distance`](Self::set_distance) or [`GeodesicExact::direct_line`], by arc otherwise.
    pub fn reference_position(
        &self,
        outmask: GeodesicMask,
    ) -> Result<DirectSolution, GeodesicError> {
        if self.arc_reference {
            self.gen_position(true, self.a13, outmask)
        } else {
            self.gen_position(false, self.s13, outmask)
        }
    }

    /// Set the reference point 3 at distance `s13`; `a13` follows (NaN without `DISTANCE_IN`).
    pub fn set_distance(&mut self, s13: f64) {
        self.s13 = s13;
        self.a13 = self
            .position_unchecked(false, s13, GeodesicMask::NONE)
            .a12;
        self.arc_reference = false;
    }

    /// Set the reference point 3 at arc `a13`; `s13` follows when the line has `DISTANCE`.
    pub fn set_arc(&mut self, a13: f64) {
        self.a13 = a13;
        self.s13 = self
            .position_unchecked(true, a13, GeodesicMask::DISTANCE)
            .s12;
        self.arc_reference = true;
    }

    pub(crate) fn gen_set_distance(&mut self, arcmode: bool, s13_a13: f64) {
        if arcmode {
            self.set_arc(s13_a13)
        } else {
            self.set_distance(s13_a13)
        }
    }

    /// Position with the outputs silently restricted to the line's capabilities.
    ///
    /// Outputs the line cannot provide are NaN, as is everything when a distance is given to a
    /// line without `DISTANCE_IN`.
    pub(crate) fn position_unchecked(
        &self,
        arcmode: bool,
        s12_a12: f64,
        outmask: GeodesicMask,
    ) -> DirectSolution {
        let g = self.geod;
        let outmask = outmask & self.caps & GeodesicMask::OUT_MASK;
        let mut out = DirectSolution::nan();
        if !(arcmode || self.caps.wants(GeodesicMask::DISTANCE_IN)) {
            return out;
        }

        let mut e2 = 0.0;
        let (sig12, ssig12, csig12) = if arcmode {
            let sig12 = s12_a12.to_radians();
            let mut s12a = s12_a12.abs();
            s12a -= 180.0 * (s12a / 180.0).floor();
            // exact zeros at multiples of 90°
            let ssig12 = if s12a == 0.0 { 0.0 } else { sig12.sin() };
            let csig12 = if s12a == 90.0 { 0.0 } else { sig12.cos() };
            (sig12, ssig12, csig12)
        } else {
            // tau12 = s12 / (b * E0), then invert tau2 = sig2 + B12 for sig2
            let tau12 = s12_a12 / (g.b * self.e0);
            let (s, c) = tau12.sin_cos();
            e2 = -self
                .ell
                .delta_einv(self.stau1 * c + self.ctau1 * s, self.ctau1 * c - self.stau1 * s);
            let sig12 = tau12 - (e2 - self.e1);
            let (ssig12, csig12) = sig12.sin_cos();
            (sig12, ssig12, csig12)
        };

        let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
        let mut csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
        let dn2 = self.ell.delta(ssig2, csig2);

        let mut ab1 = 0.0;
        if outmask.wants(
            GeodesicMask::DISTANCE | GeodesicMask::REDUCEDLENGTH | GeodesicMask::GEODESICSCALE,
        ) {
            if arcmode || g.f.abs() > 0.01 {
                e2 = self.ell.delta_e(ssig2, csig2, dn2);
            }
            ab1 = self.e0 * (e2 - self.e1);
        }

        // sin(bet2) = cos(alp0) * sin(sig2)
        let sbet2 = self.calp0 * ssig2;
        let mut cbet2 = self.salp0.hypot(self.calp0 * csig2);
        if cbet2 == 0.0 {
            // at a pole
            cbet2 = g.tiny;
            csig2 = g.tiny;
        }
        let salp2 = self.salp0;
        let calp2 = self.calp0 * csig2;

        if outmask.wants(GeodesicMask::DISTANCE) {
            out.s12 = if arcmode {
                g.b * (self.e0 * sig12 + ab1)
            } else {
                s12_a12
            };
        }

        if outmask.wants(GeodesicMask::LONGITUDE) {
            let somg2 = self.salp0 * ssig2;
            let comg2 = csig2;
            // east-going?
            let es = 1.0_f64.copysign(self.salp0);
            let cchi2 = g.f1 * dn2 * comg2;
            let chi12 = if outmask.contains(GeodesicMask::LONG_UNROLL) {
                es * (sig12 - (ssig2.atan2(csig2) - self.ssig1.atan2(self.csig1))
                    + ((es * somg2).atan2(cchi2) - (es * self.somg1).atan2(self.cchi1)))
            } else {
                (somg2 * self.cchi1 - cchi2 * self.somg1)
                    .atan2(cchi2 * self.cchi1 + somg2 * self.somg1)
            };
            let lam12 = chi12
                - g.e2 / g.f1
                    * self.salp0
                    * self.h0
                    * (sig12 + (self.ell.delta_h(ssig2, csig2, dn2) - self.h1));
            let lon12 = lam12.to_degrees();
            out.lon2 = if outmask.contains(GeodesicMask::LONG_UNROLL) {
                self.lon1 + lon12
            } else {
                ang_normalize(ang_normalize(self.lon1) + ang_normalize(lon12))
            };
        }

        if outmask.wants(GeodesicMask::LATITUDE) {
            out.lat2 = atan2d(sbet2, g.f1 * cbet2);
        }

        if outmask.wants(GeodesicMask::AZIMUTH) {
            out.azi2 = atan2d(salp2, calp2);
        }

        let reduced = outmask.wants(GeodesicMask::REDUCEDLENGTH);
        let scale = outmask.wants(GeodesicMask::GEODESICSCALE);
        if reduced || scale {
            let j12 = self.k2
                * self.d0
                * (sig12 + (self.ell.delta_d(ssig2, csig2, dn2) - self.d1));
            if reduced {
                out.m12 = g.b
                    * ((dn2 * (self.csig1 * ssig2) - self.dn1 * (self.ssig1 * csig2))
                        - self.csig1 * csig2 * j12);
            }
            if scale {
                let t =
                    self.k2 * (ssig2 - self.ssig1) * (ssig2 + self.ssig1) / (self.dn1 + dn2);
                out.scale12 = csig12 + (t * ssig2 - csig2 * j12) * self.ssig1 / self.dn1;
                out.scale21 = csig12 - (t * self.ssig1 - self.csig1 * j12) * ssig2 / dn2;
            }
        }

        if outmask.wants(GeodesicMask::AREA) {
            let b42 = GeodesicExact::cos_series(ssig2, csig2, &self.c4a);
            let (salp12, calp12) = if self.calp0 == 0.0 || self.salp0 == 0.0 {
                // alp12 = alp2 - alp1, used in atan2 so no need to normalize
                (
                    salp2 * self.calp1 - calp2 * self.salp1,
                    calp2 * self.calp1 + salp2 * self.salp1,
                )
            } else {
                // tan(alp) = tan(alp0) * sec(sig), written to avoid cancellation
                let salp12 = self.calp0
                    * self.salp0
                    * if csig12 <= 0.0 {
                        self.csig1 * (1.0 - csig12) + ssig12 * self.ssig1
                    } else {
                        ssig12 * (self.csig1 * ssig12 / (1.0 + csig12) + self.ssig1)
                    };
                let calp12 = sq(self.salp0) + sq(self.calp0) * self.csig1 * csig2;
                (salp12, calp12)
            };
            out.area12 = g.c2 * salp12.atan2(calp12) + self.a4 * (b42 - self.b41);
        }

        out.a12 = if arcmode {
            s12_a12
        } else {
            sig12.to_degrees()
        };
        out
    }

    /// Latitude of point 1 (degrees).
    pub fn latitude(&self) -> f64 {
        self.lat1
    }

    /// Longitude of point 1 (degrees).
    pub fn longitude(&self) -> f64 {
        self.lon1
    }

    /// Azimuth at point 1 (degrees).
    pub fn azimuth(&self) -> f64 {
        self.azi1
    }

    /// `(sin α1, cos α1)`.
    pub fn azimuth_sincos(&self) -> (f64, f64) {
        (self.salp1, self.calp1)
    }

    /// Azimuth `α0` at the northward equator crossing (degrees).
    pub fn equatorial_azimuth(&self) -> f64 {
        atan2d(self.salp0, self.calp0)
    }

    /// `(sin α0, cos α0)`.
    pub fn equatorial_azimuth_sincos(&self) -> (f64, f64) {
        (self.salp0, self.calp0)
    }

    /// Arc `σ1` from the northward equator crossing to point 1 (degrees).
    pub fn equatorial_arc(&self) -> f64 {
        atan2d(self.ssig1, self.csig1)
    }

    /// Distance `s13` to the reference point, NaN when unset or unavailable.
    pub fn distance(&self) -> f64 {
        self.s13
    }

    /// Arc `a13` to the reference point (degrees), NaN when unset or unavailable.
    pub fn arc(&self) -> f64 {
        self.a13
    }

    /// `a13` in arc mode, `s13` otherwise.
    pub fn gen_distance(&self, arcmode: bool) -> f64 {
        if arcmode {
            self.a13
        } else {
            self.s13
        }
    }

    pub fn capabilities(&self) -> GeodesicMask {
        self.caps
    }

    /// True if the line supports every output in `testcaps`.
    pub fn has_capability(&self, testcaps: GeodesicMask) -> bool {
        self.caps.covers(testcaps)
    }

    pub fn equatorial_radius(&self) -> f64 {
        self.geod.equatorial_radius()
    }

    pub fn flattening(&self) -> f64 {
        self.geod.flattening()
    }
}
