//! # Exact geodesics on an ellipsoid of revolution
//!
//! [`GeodesicExact`] solves the direct and inverse geodesic problems on an ellipsoid with
//! equatorial radius `a` and flattening `f`. Distances and longitudes are expressed with
//! elliptic integrals instead of series in the flattening, so the solution stays accurate to
//! round-off for any `f` between roughly −1 (very prolate) and 0.5 (very oblate).
//!
//! ## Overview
//!
//! - **Construction** – [`GeodesicExact::new`] validates the axes and precomputes the derived
//!   constants, the iteration tolerances, and the kernel of the area series.
//! - **Direct problem** – [`GeodesicExact::gen_direct`] builds a one-shot
//!   [`GeodesicLineExact`] and evaluates it at the requested distance or arc.
//! - **Inverse problem** – [`GeodesicExact::gen_inverse`] reduces the points to a canonical
//!   configuration, picks a starting azimuth and refines it by Newton's method with a bisection
//!   safeguard (see [`inverse`]).
//! - **Lines** – [`GeodesicExact::line`], [`GeodesicExact::direct_line`],
//!   [`GeodesicExact::arc_direct_line`] and [`GeodesicExact::inverse_line`] return lines that can
//!   be sampled at many points cheaply.
//! - **WGS84** – [`GeodesicExact::wgs84`] hands out a shared engine for the WGS84 ellipsoid.
//!
//! ## Conventions
//!
//! Angles are in degrees, latitudes in `[-90, 90]`; longitudes and azimuths are unrestricted.
//! Lengths are in the unit of `a`. Latitudes outside the valid range and NaN inputs produce NaN
//! outputs rather than errors.
//!
//! ## Example
//!
//! ```rust
//! use geodesic_exact::geodesic_exact::GeodesicExact;
//!
//! let geod = GeodesicExact::wgs84().unwrap();
//! // JFK to Singapore Changi
//! let inv = geod.inverse(40.6, -73.8, 1.4, 104.0).unwrap();
//! assert!((inv.s12 - 15_347_674.108).abs() < 1e-3);
//!
//! let dir = geod.direct(40.6, -73.8, inv.azi1, inv.s12);
//! assert!((dir.lat2 - 1.4).abs() < 1e-12);
//! ```
//!
//! ## See also
//!
//! - [`crate::geodesic_line_exact`] – evaluation along a single geodesic.
//! - [`crate::polygon_area`] – perimeter and area of geodesic polygons.
//! - C. F. F. Karney, *Geodesics on an arbitrary ellipsoid of revolution*, J. Geodesy 88 (2014).

pub mod area;
pub mod inverse;
pub mod params;

pub use params::{GeodesicExactParams, GeodesicExactParamsBuilder};

use nalgebra::DMatrix;
use once_cell::sync::Lazy;
use std::f64::consts::PI;
use std::fmt;

use crate::constants::{WGS84_A, WGS84_F};
use crate::float_ops::{atan2d, norm, sincosd, sq};
use crate::geodesic_errors::GeodesicError;
use crate::geodesic_line_exact::GeodesicLineExact;
use crate::geodesic_mask::GeodesicMask;
use crate::geodesic_solution::{DirectSolution, InverseSolution};

static WGS84: Lazy<Result<GeodesicExact, GeodesicError>> =
    Lazy::new(|| GeodesicExact::new(WGS84_A, WGS84_F));

/// Exact geodesic engine for one ellipsoid.
///
/// The engine is immutable once built and can be shared between threads; every method is a
/// pure function of its arguments.
///
/// See also
/// ------------
/// * [`GeodesicExactParams`] – tuning of the area series and of the inverse iteration.
#[derive(Debug, Clone)]
pub struct GeodesicExact {
    pub(crate) a: f64,
    pub(crate) f: f64,
    pub(crate) f1: f64,
    pub(crate) e2: f64,
    pub(crate) ep2: f64,
    pub(crate) n: f64,
    pub(crate) b: f64,
    pub(crate) c2: f64,
    pub(crate) etol2: f64,
    pub(crate) tiny: f64,
    pub(crate) tol0: f64,
    pub(crate) tol1: f64,
    pub(crate) tolb: f64,
    pub(crate) xthresh: f64,
    pub(crate) maxit1: usize,
    pub(crate) maxit2: usize,
    pub(crate) params: GeodesicExactParams,
    pub(crate) c4_kernel: DMatrix<f64>,
    /// `t(e′²)`, reused by every area coefficient evaluation.
    pub(crate) t_ep2: f64,
}

impl GeodesicExact {
    /// Build an engine with default parameters.
    ///
    /// Arguments
    /// -----------------
    /// * `a` – equatorial radius, finite and positive.
    /// * `f` – flattening, negative for a prolate ellipsoid; `b = a (1 − f)` must be finite and
    ///   positive.
    ///
    /// Return
    /// ----------
    /// * `Ok(GeodesicExact)` on success.
    /// * `Err(GeodesicError::EquatorialRadiusNotPositive)` or
    ///   `Err(GeodesicError::PolarSemiAxisNotPositive)` for an invalid ellipsoid.
    pub fn new(a: f64, f: f64) -> Result<Self, GeodesicError> {
        Self::with_params(a, f, GeodesicExactParams::default())
    }

    /// Build an engine with explicit [`GeodesicExactParams`].
    ///
    /// The parameters are validated again here, so a struct literal with an out-of-range
    /// `c4_order` is rejected with [`GeodesicError::InvalidEngineParameter`].
    pub fn with_params(
        a: f64,
        f: f64,
        params: GeodesicExactParams,
    ) -> Result<Self, GeodesicError> {
        let params = GeodesicExactParams::builder()
            .c4_order(params.c4_order)
            .strict_convergence(params.strict_convergence)
            .build()?;

        let f1 = 1.0 - f;
        let e2 = f * (2.0 - f);
        let ep2 = e2 / sq(f1);
        let n = f / (2.0 - f);
        let b = a * f1;

        if !(a.is_finite() && a > 0.0) {
            return Err(GeodesicError::EquatorialRadiusNotPositive(a));
        }
        if !(b.is_finite() && b > 0.0) {
            return Err(GeodesicError::PolarSemiAxisNotPositive(b));
        }

        // authalic radius squared
        let g = if e2 == 0.0 {
            1.0
        } else if e2 > 0.0 {
            ep2.sqrt().asinh() / e2.abs().sqrt()
        } else {
            (-e2).sqrt().atan() / e2.abs().sqrt()
        };
        let c2 = (sq(a) + sq(b) * g) / 2.0;

        let tol0 = f64::EPSILON;
        let tol2 = tol0.sqrt();
        // short-line threshold on σ12
        let etol2 = 0.1 * tol2 / ((f.abs().max(0.001) * (1.0 - f / 2.0).min(1.0)) / 2.0).sqrt();
        let maxit1 = 20;

        Ok(GeodesicExact {
            a,
            f,
            f1,
            e2,
            ep2,
            n,
            b,
            c2,
            etol2,
            tiny: f64::MIN_POSITIVE.sqrt(),
            tol0,
            tol1: 200.0 * tol0,
            tolb: tol0 * tol2,
            xthresh: 1000.0 * tol2,
            maxit1,
            maxit2: maxit1 + f64::MANTISSA_DIGITS as usize + 10,
            c4_kernel: area::build_c4_kernel(params.c4_order)?,
            t_ep2: area::t(ep2),
            params,
        })
    }

    /// Shared engine for the WGS84 ellipsoid (`a = 6378137 m`, `f = 1/298.257223563`).
    ///
    /// The engine is built on first use and lives for the rest of the process.
    pub fn wgs84() -> Result<&'static GeodesicExact, GeodesicError> {
        Lazy::force(&WGS84).as_ref().map_err(Clone::clone)
    }

    /// Equatorial radius `a`.
    pub fn equatorial_radius(&self) -> f64 {
        self.a
    }

    /// Flattening `f`.
    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// Polar semi-axis `b = a (1 − f)`.
    pub fn polar_semi_axis(&self) -> f64 {
        self.b
    }

    /// Third flattening `n = f / (2 − f)`.
    pub fn third_flattening(&self) -> f64 {
        self.n
    }

    /// Total area of the ellipsoid, `4π c²`.
    pub fn ellipsoid_area(&self) -> f64 {
        4.0 * PI * self.c2
    }

    pub fn params(&self) -> &GeodesicExactParams {
        &self.params
    }

    /// `(sin β, cos β)` of the reduced latitude, with `cos β` kept away from zero.
    pub(crate) fn reduced_latitude(&self, lat: f64) -> (f64, f64) {
        let (sbet, cbet) = sincosd(lat);
        let (sbet, cbet) = norm(sbet * self.f1, cbet);
        (sbet, cbet.max(self.tiny))
    }

    /// `dn = √(1 + e′² sin² β)`, written in a form that is accurate for both signs of `f`.
    pub(crate) fn dn(&self, sbet: f64, cbet: f64) -> f64 {
        if self.f >= 0.0 {
            (1.0 + self.ep2 * sq(sbet)).sqrt()
        } else {
            (1.0 - self.e2 * sq(cbet)).sqrt() / self.f1
        }
    }

    /// Geodesic line starting at `(lat1, lon1)` with azimuth `azi1`.
    ///
    /// Arguments
    /// -----------------
    /// * `caps` – outputs the line must support; `LATITUDE`, `AZIMUTH` and `LONG_UNROLL` are
    ///   always included.
    pub fn line(&self, lat1: f64, lon1: f64, azi1: f64, caps: GeodesicMask) -> GeodesicLineExact<'_> {
        GeodesicLineExact::new(self, lat1, lon1, azi1, caps)
    }

    /// Line from point 1 whose reference point 3 lies at distance or arc `s12_a12`.
    ///
    /// Arguments
    /// -----------------
    /// * `arcmode` – `s12_a12` is an arc length in degrees when true, a distance otherwise.
    ///   In distance mode `DISTANCE_IN` is added to `caps`.
    pub fn gen_direct_line(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        arcmode: bool,
        s12_a12: f64,
        caps: GeodesicMask,
    ) -> GeodesicLineExact<'_> {
        let caps = if arcmode {
            caps
        } else {
            caps | GeodesicMask::DISTANCE_IN
        };
        let mut line = GeodesicLineExact::new(self, lat1, lon1, azi1, caps);
        line.gen_set_distance(arcmode, s12_a12);
        line
    }

    /// Line from point 1 with its reference point at distance `s12`.
    pub fn direct_line(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        s12: f64,
        caps: GeodesicMask,
    ) -> GeodesicLineExact<'_> {
        self.gen_direct_line(lat1, lon1, azi1, false, s12, caps)
    }

    /// Line from point 1 with its reference point at arc `a12` (degrees).
    pub fn arc_direct_line(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        a12: f64,
        caps: GeodesicMask,
    ) -> GeodesicLineExact<'_> {
        self.gen_direct_line(lat1, lon1, azi1, true, a12, caps)
    }

    /// Line through two points, with its reference point set to point 2.
    ///
    /// The inverse problem is solved first; the line starts at point 1 with the resulting
    /// azimuth and `a13 = a12`. When `caps` includes `DISTANCE_IN`, `DISTANCE` is added so that
    /// `s13 = s12` is available as well.
    ///
    /// Return
    /// ----------
    /// * `Err(GeodesicError::ConvergenceFailure)` in strict mode, see [`GeodesicExact::gen_inverse`].
    pub fn inverse_line(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        caps: GeodesicMask,
    ) -> Result<GeodesicLineExact<'_>, GeodesicError> {
        let sol = self.gen_inverse_sincos(lat1, lon1, lat2, lon2, GeodesicMask::NONE)?;
        let azi1 = atan2d(sol.salp1, sol.calp1);
        let caps = if caps.wants(GeodesicMask::DISTANCE_IN) {
            caps | GeodesicMask::DISTANCE
        } else {
            caps
        };
        let mut line = GeodesicLineExact::with_sincos(
            self, lat1, lon1, azi1, sol.salp1, sol.calp1, caps,
        );
        line.gen_set_distance(true, sol.a12);
        Ok(line)
    }

    /// General direct problem.
    ///
    /// Arguments
    /// -----------------
    /// * `lat1`, `lon1`, `azi1` – starting point and azimuth (degrees).
    /// * `arcmode` – interpret `s12_a12` as an arc length in degrees instead of a distance.
    /// * `s12_a12` – distance or arc from point 1 to point 2 (may be negative).
    /// * `outmask` – outputs to compute; add `LONG_UNROLL` to get an unwrapped `lon2`.
    ///
    /// Return
    /// ----------
    /// * A [`DirectSolution`] whose unrequested fields are NaN. `a12` is always set.
    pub fn gen_direct(
        &self,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        arcmode: bool,
        s12_a12: f64,
        outmask: GeodesicMask,
    ) -> DirectSolution {
        let caps = if arcmode {
            outmask
        } else {
            outmask | GeodesicMask::DISTANCE_IN
        };
        GeodesicLineExact::new(self, lat1, lon1, azi1, caps).position_unchecked(
            arcmode, s12_a12, outmask,
        )
    }

    /// Direct problem with a distance, computing every output.
    pub fn direct(&self, lat1: f64, lon1: f64, azi1: f64, s12: f64) -> DirectSolution {
        self.gen_direct(lat1, lon1, azi1, false, s12, GeodesicMask::ALL)
    }

    /// Direct problem with an arc length in degrees, computing every output.
    pub fn arc_direct(&self, lat1: f64, lon1: f64, azi1: f64, a12: f64) -> DirectSolution {
        self.gen_direct(lat1, lon1, azi1, true, a12, GeodesicMask::ALL)
    }

    /// General inverse problem.
    ///
    /// Arguments
    /// -----------------
    /// * `lat1`, `lon1`, `lat2`, `lon2` – the two points (degrees).
    /// * `outmask` – outputs to compute among `DISTANCE`, `AZIMUTH`, `REDUCEDLENGTH`,
    ///   `GEODESICSCALE` and `AREA`.
    ///
    /// Return
    /// ----------
    /// * `Ok(InverseSolution)` with unrequested fields set to NaN.
    /// * `Err(GeodesicError::ConvergenceFailure)` if the engine was built with
    ///   `strict_convergence` and the iteration did not converge.
    ///
    /// See also
    /// ------------
    /// * [`GeodesicExact::gen_inverse_sincos`] – azimuths as `(sin, cos)` pairs.
    pub fn gen_inverse(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        outmask: GeodesicMask,
    ) -> Result<InverseSolution, GeodesicError> {
        let sol = self.gen_inverse_sincos(lat1, lon1, lat2, lon2, outmask)?;
        Ok(sol.to_solution(outmask.wants(GeodesicMask::AZIMUTH)))
    }

    /// Inverse problem computing every output.
    pub fn inverse(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    ) -> Result<InverseSolution, GeodesicError> {
        self.gen_inverse(lat1, lon1, lat2, lon2, GeodesicMask::ALL)
    }
}

impl fmt::Display for GeodesicExact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exact geodesic engine")?;
        writeln!(f, "  a   = {} (equatorial radius)", self.a)?;
        writeln!(f, "  f   = {} (flattening)", self.f)?;
        writeln!(f, "  b   = {} (polar semi-axis)", self.b)?;
        writeln!(f, "  c²  = {} (authalic radius squared)", self.c2)?;
        write!(f, "  nC4 = {}", self.params.c4_order)
    }
}
