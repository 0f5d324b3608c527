//! # Inverse geodesic problem
//!
//! Given two points, find the shortest geodesic joining them. The solver works on the auxiliary
//! sphere and proceeds in four stages:
//!
//! 1. **Canonicalisation** – the points are reflected and swapped so that
//!    `lat1 ≤ 0`, `lat1 ≤ lat2 ≤ -lat1` and `0 ≤ λ12 ≤ 180`. Three sign registers remember the
//!    transformation and are undone at the end.
//! 2. **Classification** – meridional and equatorial geodesics are solved in closed form.
//! 3. **Starting guess** – [`GeodesicExact::inverse_start`] returns either a complete solution
//!    for short lines or an initial azimuth, refined near the antipode by the astroid equation.
//! 4. **Newton with bracketing** – [`GeodesicExact::lambda12`] maps `α1` to the longitude
//!    error and its derivative; Newton steps are taken while they stay inside the bracket,
//!    bisection otherwise.
//!
//! Distances and reduced lengths come from [`GeodesicExact::lengths`]; the area from the
//! [`c4f`](GeodesicExact::c4f) series and the spherical excess `c² α12`.
//!
//! ## See also
//!
//! - [`GeodesicExact::gen_inverse`] – user entry point.
//! - [`GeodesicExact::inverse_line`] – geodesic line through two points.

use std::f64::consts::PI;

use super::GeodesicExact;
use crate::constants::QUARTER_TURN;
use crate::elliptic_function::EllipticFunction;
use crate::float_ops::{ang_diff, ang_round, lat_fix, norm, sincosd, sq};
use crate::geodesic_errors::GeodesicError;
use crate::geodesic_mask::GeodesicMask;
use crate::geodesic_solution::InverseSinCos;

/// Scaled lengths between two points of a geodesic, in units of `b`.
///
/// Quantities that were not requested are NaN.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScaledLengths {
    pub s12b: f64,
    pub m12b: f64,
    pub m0: f64,
    pub scale12: f64,
    pub scale21: f64,
}

/// State of the geodesic leaving point 1 with a trial azimuth.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LambdaEval {
    /// Longitude error `λ12(α1) − λ12`.
    pub lam12: f64,
    pub salp2: f64,
    pub calp2: f64,
    pub sig12: f64,
    pub ssig1: f64,
    pub csig1: f64,
    pub ssig2: f64,
    pub csig2: f64,
    pub domg12: f64,
    /// `∂λ12/∂α1`, NaN when not requested.
    pub dlam12: f64,
}

/// Starting point of the inverse iteration.
///
/// `sig12 ≥ 0` means the short-line estimate is already the solution, and `salp2`, `calp2`,
/// `dnm` are set. Otherwise `sig12` is `-1` and only `salp1`, `calp1` are meaningful.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InverseGuess {
    pub sig12: f64,
    pub salp1: f64,
    pub calp1: f64,
    pub salp2: f64,
    pub calp2: f64,
    pub dnm: f64,
}

impl GeodesicExact {
    /// Solve the inverse problem, returning the azimuths as `(sin, cos)` pairs.
    ///
    /// Arguments
    /// -----------------
    /// * `lat1`, `lon1` – point 1 (degrees); `lat1` outside `[-90, 90]` yields NaN results.
    /// * `lat2`, `lon2` – point 2 (degrees).
    /// * `outmask` – quantities to compute among `DISTANCE`, `REDUCEDLENGTH`,
    ///   `GEODESICSCALE` and `AREA`. The azimuth pairs and `a12` are always returned.
    ///
    /// Return
    /// ----------
    /// * `Ok(InverseSinCos)` with unrequested quantities set to NaN.
    /// * `Err(GeodesicError::ConvergenceFailure)` when the iteration cap is reached and the
    ///   engine was built with `strict_convergence`.
    ///
    /// See also
    /// ------------
    /// * [`GeodesicExact::gen_inverse`] – same result with azimuths in degrees.
    pub fn gen_inverse_sincos(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        outmask: GeodesicMask,
    ) -> Result<InverseSinCos, GeodesicError> {
        let outmask = outmask.outputs();

        // Longitude difference, reduced so that 0 ≤ lon12 ≤ 180.
        let (lon12, lon12s) = ang_diff(lon1, lon2);
        let mut lonsign = if lon12.is_sign_negative() { -1.0 } else { 1.0 };
        let lon12 = lonsign * ang_round(lon12);
        let lon12s = ang_round((180.0 - lon12) - lonsign * lon12s);
        let lam12 = lon12.to_radians();
        let (slam12, clam12) = if lon12 > 90.0 {
            let (s, c) = sincosd(lon12s);
            (s, -c)
        } else {
            sincosd(lon12)
        };

        let mut lat1 = ang_round(lat_fix(lat1));
        let mut lat2 = ang_round(lat_fix(lat2));
        // Make |lat1| ≥ |lat2|.
        let swapp = if lat1.abs() < lat2.abs() || lat2.is_nan() {
            -1.0
        } else {
            1.0
        };
        if swapp < 0.0 {
            lonsign = -lonsign;
            std::mem::swap(&mut lat1, &mut lat2);
        }
        // Make lat1 ≤ 0, with -0 counted as negative.
        let latsign = if lat1.is_sign_negative() { 1.0 } else { -1.0 };
        lat1 *= latsign;
        lat2 *= latsign;

        let (sbet1, cbet1) = self.reduced_latitude(lat1);
        let (mut sbet2, mut cbet2) = self.reduced_latitude(lat2);

        // Enforce the symmetries |bet2| = -bet1 that round-off would break.
        if cbet1 < -sbet1 {
            if cbet2 == cbet1 {
                sbet2 = sbet1.copysign(sbet2);
            }
        } else if sbet2.abs() == -sbet1 {
            cbet2 = cbet1;
        }

        let dn1 = self.dn(sbet1, cbet1);
        let dn2 = self.dn(sbet2, cbet2);

        let mut ell = EllipticFunction::new(-self.ep2, 0.0);

        let mut a12 = f64::NAN;
        let mut sig12;
        let (mut salp1, mut calp1) = (f64::NAN, f64::NAN);
        let (mut salp2, mut calp2) = (f64::NAN, f64::NAN);
        let (mut s12x, mut m12x) = (f64::NAN, f64::NAN);
        let (mut scale12, mut scale21) = (f64::NAN, f64::NAN);
        // somg12 = 2 flags that omg12 has not been turned into (sin, cos) yet
        let (mut omg12, mut somg12, mut comg12) = (0.0, 2.0, 0.0);

        let mut meridian = lat1 == -90.0 || slam12 == 0.0;

        if meridian {
            // Point 2 lies on the meridian through point 1 (or on its antimeridian).
            calp1 = clam12;
            salp1 = slam12;
            calp2 = 1.0;
            salp2 = 0.0;

            let (ssig1, csig1) = (sbet1, calp1 * cbet1);
            let (ssig2, csig2) = (sbet2, calp2 * cbet2);
            sig12 = (csig1 * ssig2 - ssig1 * csig2)
                .max(0.0)
                .atan2(csig1 * csig2 + ssig1 * ssig2);

            let len = self.lengths(
                &ell,
                sig12,
                (ssig1, csig1, dn1),
                (ssig2, csig2, dn2),
                cbet1,
                cbet2,
                outmask | GeodesicMask::DISTANCE | GeodesicMask::REDUCEDLENGTH,
            );
            s12x = len.s12b;
            m12x = len.m12b;
            scale12 = len.scale12;
            scale21 = len.scale21;

            // A negative reduced length past one radian means a shorter path leaves the
            // meridian; this only happens for prolate ellipsoids.
            if sig12 < 1.0 || m12x >= 0.0 {
                if sig12 < 3.0 * self.tiny
                    || (sig12 < self.tol0 && (s12x < 0.0 || m12x < 0.0))
                {
                    sig12 = 0.0;
                    m12x = 0.0;
                    s12x = 0.0;
                }
                m12x *= self.b;
                s12x *= self.b;
                a12 = sig12.to_degrees();
            } else {
                meridian = false;
            }
        }

        if !meridian && sbet1 == 0.0 && (self.f <= 0.0 || lon12s >= self.f * 180.0) {
            // Equatorial geodesic.
            calp1 = 0.0;
            calp2 = 0.0;
            salp1 = 1.0;
            salp2 = 1.0;
            s12x = self.a * lam12;
            sig12 = lam12 / self.f1;
            omg12 = sig12;
            m12x = self.b * sig12.sin();
            if outmask.wants(GeodesicMask::GEODESICSCALE) {
                scale12 = sig12.cos();
                scale21 = scale12;
            }
            a12 = lon12 / self.f1;
        } else if !meridian {
            let guess = self.inverse_start(
                &mut ell, sbet1, cbet1, dn1, sbet2, cbet2, dn2, lam12, slam12, clam12,
            );
            sig12 = guess.sig12;
            salp1 = guess.salp1;
            calp1 = guess.calp1;

            if sig12 >= 0.0 {
                // Short line solved on the sphere of radius b·dnm.
                salp2 = guess.salp2;
                calp2 = guess.calp2;
                let dnm = guess.dnm;
                s12x = sig12 * self.b * dnm;
                m12x = sq(dnm) * self.b * (sig12 / dnm).sin();
                if outmask.wants(GeodesicMask::GEODESICSCALE) {
                    scale12 = (sig12 / dnm).cos();
                    scale21 = scale12;
                }
                a12 = sig12.to_degrees();
                omg12 = lam12 / (self.f1 * dnm);
            } else {
                // Bracket for alp1: a is the lower bound, b the upper one.
                let mut numit = 0usize;
                let (mut salp1a, mut calp1a) = (self.tiny, 1.0);
                let (mut salp1b, mut calp1b) = (self.tiny, -1.0);
                let mut tripn = false;
                let mut tripb = false;
                let mut converged;

                let eval = loop {
                    let eval = self.lambda12(
                        (sbet1, cbet1, dn1),
                        (sbet2, cbet2, dn2),
                        salp1,
                        calp1,
                        slam12,
                        clam12,
                        &mut ell,
                        numit < self.maxit1,
                    );
                    let v = eval.lam12;
                    converged =
                        tripb || !(v.abs() >= if tripn { 8.0 } else { 1.0 } * self.tol0);
                    if converged || numit == self.maxit2 {
                        break eval;
                    }

                    if v > 0.0 && (numit > self.maxit1 || calp1 / salp1 > calp1b / salp1b) {
                        salp1b = salp1;
                        calp1b = calp1;
                    } else if v < 0.0
                        && (numit > self.maxit1 || calp1 / salp1 < calp1a / salp1a)
                    {
                        salp1a = salp1;
                        calp1a = calp1;
                    }

                    let newton = numit < self.maxit1 && eval.dlam12 > 0.0;
                    numit += 1;
                    if newton {
                        let dalp1 = -v / eval.dlam12;
                        if dalp1.abs() < PI {
                            let (sdalp1, cdalp1) = dalp1.sin_cos();
                            let nsalp1 = salp1 * cdalp1 + calp1 * sdalp1;
                            if nsalp1 > 0.0 {
                                calp1 = calp1 * cdalp1 - salp1 * sdalp1;
                                salp1 = nsalp1;
                                (salp1, calp1) = norm(salp1, calp1);
                                // Near convergence relax the exit test to 8·tol0.
                                tripn = v.abs() <= 16.0 * self.tol0;
                                continue;
                            }
                        }
                    }

                    // Newton failed or was not tried: bisect the bracket.
                    salp1 = (salp1a + salp1b) / 2.0;
                    calp1 = (calp1a + calp1b) / 2.0;
                    (salp1, calp1) = norm(salp1, calp1);
                    tripn = false;
                    tripb = (salp1a - salp1).abs() + (calp1a - calp1) < self.tolb
                        || (salp1 - salp1b).abs() + (calp1 - calp1b) < self.tolb;
                };

                if !converged && self.params.strict_convergence {
                    return Err(GeodesicError::ConvergenceFailure { iterations: numit });
                }

                salp2 = eval.salp2;
                calp2 = eval.calp2;
                sig12 = eval.sig12;
                let len = self.lengths(
                    &ell,
                    sig12,
                    (eval.ssig1, eval.csig1, dn1),
                    (eval.ssig2, eval.csig2, dn2),
                    cbet1,
                    cbet2,
                    outmask,
                );
                s12x = len.s12b * self.b;
                m12x = len.m12b * self.b;
                scale12 = len.scale12;
                scale21 = len.scale21;
                a12 = sig12.to_degrees();

                if outmask.wants(GeodesicMask::AREA) {
                    let (sdomg12, cdomg12) = eval.domg12.sin_cos();
                    somg12 = slam12 * cdomg12 - clam12 * sdomg12;
                    comg12 = clam12 * cdomg12 + slam12 * sdomg12;
                }
            }
        }

        let s12 = if outmask.wants(GeodesicMask::DISTANCE) {
            0.0 + s12x
        } else {
            f64::NAN
        };
        let m12 = if outmask.wants(GeodesicMask::REDUCEDLENGTH) {
            0.0 + m12x
        } else {
            f64::NAN
        };
        if !outmask.wants(GeodesicMask::GEODESICSCALE) {
            scale12 = f64::NAN;
            scale21 = f64::NAN;
        }

        let area12 = if outmask.wants(GeodesicMask::AREA) {
            let salp0 = salp1 * cbet1;
            let calp0 = calp1.hypot(salp1 * sbet1);
            let mut s12_area = if calp0 != 0.0 && salp0 != 0.0 {
                let (ssig1, csig1) = norm(sbet1, calp1 * cbet1);
                let (ssig2, csig2) = norm(sbet2, calp2 * cbet2);
                let k2 = sq(calp0) * self.ep2;
                let a4 = sq(self.a) * calp0 * salp0 * self.e2;
                let c4a = self.c4f(k2);
                let b41 = Self::cos_series(ssig1, csig1, &c4a);
                let b42 = Self::cos_series(ssig2, csig2, &c4a);
                a4 * (b42 - b41)
            } else {
                // sig1 and sig2 are indeterminate on the equator
                0.0
            };

            if !meridian && somg12 == 2.0 {
                (somg12, comg12) = omg12.sin_cos();
            }

            let alp12 = if !meridian && comg12 > -0.7071 && sbet2 - sbet1 < 1.75 {
                // Small-angle form, accurate for short lines away from the poles.
                let domg12 = 1.0 + comg12;
                let dbet1 = 1.0 + cbet1;
                let dbet2 = 1.0 + cbet2;
                2.0 * (somg12 * (sbet1 * dbet2 + sbet2 * dbet1))
                    .atan2(domg12 * (sbet1 * sbet2 + dbet1 * dbet2))
            } else {
                let mut salp12 = salp2 * calp1 - calp2 * salp1;
                let mut calp12 = calp2 * calp1 + salp2 * salp1;
                // Equatorial antipodal line: pick the direction from the sign of calp1.
                if salp12 == 0.0 && calp12 < 0.0 {
                    salp12 = self.tiny * calp1;
                    calp12 = -1.0;
                }
                salp12.atan2(calp12)
            };
            s12_area += self.c2 * alp12;
            s12_area *= swapp * lonsign * latsign;
            s12_area + 0.0
        } else {
            f64::NAN
        };

        // Undo the canonicalisation.
        if swapp < 0.0 {
            std::mem::swap(&mut salp1, &mut salp2);
            std::mem::swap(&mut calp1, &mut calp2);
            std::mem::swap(&mut scale12, &mut scale21);
        }
        salp1 *= swapp * lonsign;
        calp1 *= swapp * latsign;
        salp2 *= swapp * lonsign;
        calp2 *= swapp * latsign;

        Ok(InverseSinCos {
            a12,
            s12,
            salp1,
            calp1,
            salp2,
            calp2,
            m12,
            scale12,
            scale21,
            area12,
        })
    }

    /// Distance, reduced length and geodesic scales between two points of a geodesic.
    ///
    /// Arguments
    /// -----------------
    /// * `ell` – elliptic integrals parameterised with `k² = e′² cos² α0`, `α² = −e′²`.
    /// * `sig12` – arc between the points on the auxiliary sphere.
    /// * `p1`, `p2` – `(sin σ, cos σ, dn)` at each point.
    /// * `cbet1`, `cbet2` – cosines of the reduced latitudes.
    /// * `outmask` – `DISTANCE`, `REDUCEDLENGTH` and `GEODESICSCALE` select the outputs.
    ///
    /// Return
    /// ----------
    /// * [`ScaledLengths`] in units of `b`; `m0` is set with the reduced length.
    pub(crate) fn lengths(
        &self,
        ell: &EllipticFunction,
        sig12: f64,
        p1: (f64, f64, f64),
        p2: (f64, f64, f64),
        cbet1: f64,
        cbet2: f64,
        outmask: GeodesicMask,
    ) -> ScaledLengths {
        let (ssig1, csig1, dn1) = p1;
        let (ssig2, csig2, dn2) = p2;
        let mut out = ScaledLengths {
            s12b: f64::NAN,
            m12b: f64::NAN,
            m0: f64::NAN,
            scale12: f64::NAN,
            scale21: f64::NAN,
        };

        if outmask.wants(GeodesicMask::DISTANCE) {
            out.s12b = ell.e() / QUARTER_TURN
                * (sig12 + (ell.delta_e(ssig2, csig2, dn2) - ell.delta_e(ssig1, csig1, dn1)));
        }

        let reduced = outmask.wants(GeodesicMask::REDUCEDLENGTH);
        let scale = outmask.wants(GeodesicMask::GEODESICSCALE);
        if reduced || scale {
            let m0x = -ell.k2() * ell.d() / QUARTER_TURN;
            let j12 = m0x
                * (sig12 + (ell.delta_d(ssig2, csig2, dn2) - ell.delta_d(ssig1, csig1, dn1)));
            if reduced {
                out.m0 = m0x;
                // The grouping of the products keeps coincident points exact.
                out.m12b =
                    dn2 * (csig1 * ssig2) - dn1 * (ssig1 * csig2) - csig1 * csig2 * j12;
            }
            if scale {
                let csig12 = csig1 * csig2 + ssig1 * ssig2;
                let t = self.ep2 * (cbet1 - cbet2) * (cbet1 + cbet2) / (dn1 + dn2);
                out.scale12 = csig12 + (t * ssig2 - csig2 * j12) * ssig1 / dn1;
                out.scale21 = csig12 - (t * ssig1 - csig1 * j12) * ssig2 / dn2;
            }
        }
        out
    }

    /// Positive root `k` of `k⁴ + 2k³ − (x² + y² − 1)k² − 2y²k − y² = 0`.
    ///
    /// The equation locates the point of contact of the astroid envelope used to start the
    /// iteration for nearly antipodal points. For `y = 0` and `|x| ≤ 1` the root is 0.
    pub fn astroid(x: f64, y: f64) -> f64 {
        let p = sq(x);
        let q = sq(y);
        let r = (p + q - 1.0) / 6.0;
        if q == 0.0 && r <= 0.0 {
            return 0.0;
        }

        let s = p * q / 4.0;
        let r2 = sq(r);
        let r3 = r * r2;
        // Discriminant of the cubic in u, taken with the factor S pulled out.
        let disc = s * (s + 2.0 * r3);
        let mut u = r;
        if disc >= 0.0 {
            let mut t3 = s + r3;
            // Choose the sign of the root to avoid cancellation.
            t3 += if t3 < 0.0 { -disc.sqrt() } else { disc.sqrt() };
            let t = t3.cbrt();
            u += t + if t != 0.0 { r2 / t } else { 0.0 };
        } else {
            // Three real roots: take the largest.
            let ang = (-disc).sqrt().atan2(-(s + r3));
            u += 2.0 * r * (ang / 3.0).cos();
        }
        let v = (sq(u) + q).sqrt();
        let uv = if u < 0.0 { q / (v - u) } else { u + v };
        let w = (uv - q) / (2.0 * v);
        uv / ((uv + sq(w)).sqrt() + w)
    }

    /// Starting azimuth for the inverse iteration.
    ///
    /// Short lines are solved on a sphere of radius `b·dnm` and may be returned directly. Other
    /// lines start from the great-circle azimuth, except for nearly antipodal points on an
    /// oblate (or mildly prolate) ellipsoid where the astroid equation supplies the guess.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn inverse_start(
        &self,
        ell: &mut EllipticFunction,
        sbet1: f64,
        cbet1: f64,
        dn1: f64,
        sbet2: f64,
        cbet2: f64,
        dn2: f64,
        lam12: f64,
        slam12: f64,
        clam12: f64,
    ) -> InverseGuess {
        let mut guess = InverseGuess {
            sig12: -1.0,
            salp1: f64::NAN,
            calp1: f64::NAN,
            salp2: f64::NAN,
            calp2: f64::NAN,
            dnm: f64::NAN,
        };

        // bet12 = bet2 - bet1 in [0, pi); bet12a = bet2 + bet1 in (-pi, 0]
        let sbet12 = sbet2 * cbet1 - cbet2 * sbet1;
        let cbet12 = cbet2 * cbet1 + sbet2 * sbet1;
        let sbet12a = sbet2 * cbet1 + cbet2 * sbet1;

        let shortline = cbet12 >= 0.0 && sbet12 < 0.5 && cbet2 * lam12 < 0.5;
        let (somg12, comg12) = if shortline {
            let mut sbetm2 = sq(sbet1 + sbet2);
            // sin((bet1+bet2)/2)^2 = (sbet1 + sbet2)^2 / ((sbet1 + sbet2)^2 + (cbet1 + cbet2)^2)
            sbetm2 /= sbetm2 + sq(cbet1 + cbet2);
            guess.dnm = (1.0 + self.ep2 * sbetm2).sqrt();
            let omg12 = lam12 / (self.f1 * guess.dnm);
            omg12.sin_cos()
        } else {
            (slam12, clam12)
        };

        let mut salp1 = cbet2 * somg12;
        let mut calp1 = if comg12 >= 0.0 {
            sbet12 + cbet2 * sbet1 * sq(somg12) / (1.0 + comg12)
        } else {
            sbet12a - cbet2 * sbet1 * sq(somg12) / (1.0 - comg12)
        };

        let ssig12 = salp1.hypot(calp1);
        let csig12 = sbet1 * sbet2 + cbet1 * cbet2 * comg12;

        if shortline && ssig12 < self.etol2 {
            // Really short line: the spherical solution is accurate enough.
            let salp2 = cbet1 * somg12;
            let calp2 = sbet12
                - cbet1
                    * sbet2
                    * if comg12 >= 0.0 {
                        sq(somg12) / (1.0 + comg12)
                    } else {
                        1.0 - comg12
                    };
            (guess.salp2, guess.calp2) = norm(salp2, calp2);
            guess.sig12 = ssig12.atan2(csig12);
        } else if self.n.abs() > 0.1
            || csig12 >= 0.0
            || ssig12 >= 6.0 * self.n.abs() * PI * sq(cbet1)
        {
            // Not nearly antipodal: the great-circle azimuth is a good start.
        } else {
            // Nearly antipodal, scale to the astroid problem.
            let lam12x = (-slam12).atan2(-clam12);
            let (x, y, lamscale) = if self.f >= 0.0 {
                let k2 = sq(sbet1) * self.ep2;
                ell.reset(-k2, -self.ep2, 1.0 + k2, 1.0 + self.ep2);
                let lamscale = self.e2 / self.f1 * cbet1 * 2.0 * ell.h();
                let betscale = lamscale * cbet1;
                (lam12x / lamscale, sbet12a / betscale, lamscale)
            } else {
                let cbet12a = cbet2 * cbet1 - sbet2 * sbet1;
                let bet12a = sbet12a.atan2(cbet12a);
                // In the prolate case the scales come from the reduced length of the meridian
                // through the antipode.
                let len = self.lengths(
                    ell,
                    PI + bet12a,
                    (sbet1, -cbet1, dn1),
                    (sbet2, cbet2, dn2),
                    cbet1,
                    cbet2,
                    GeodesicMask::REDUCEDLENGTH,
                );
                let x = -1.0 + len.m12b / (cbet1 * cbet2 * len.m0 * PI);
                let betscale = if x < -0.01 {
                    sbet12a / x
                } else {
                    -self.f * sq(cbet1) * PI
                };
                let lamscale = betscale / cbet1;
                (x, lam12x / lamscale, lamscale)
            };

            if y > -self.tol1 && x > -1.0 - self.xthresh {
                // Strip near the cut, where the astroid solution is singular.
                if self.f >= 0.0 {
                    salp1 = (-x).min(1.0);
                    calp1 = -(1.0 - sq(salp1)).sqrt();
                } else {
                    calp1 = x.max(if x > -self.tol1 { 0.0 } else { -1.0 });
                    salp1 = (1.0 - sq(calp1)).sqrt();
                }
            } else {
                let k = Self::astroid(x, y);
                let omg12a = lamscale
                    * if self.f >= 0.0 {
                        -x * k / (1.0 + k)
                    } else {
                        -y * (1.0 + k) / k
                    };
                let (somg12a, comg12a) = omg12a.sin_cos();
                let comg12a = -comg12a;
                salp1 = cbet2 * somg12a;
                calp1 = sbet12a - cbet2 * sbet1 * sq(somg12a) / (1.0 - comg12a);
            }
        }

        // Sanity check on the starting guess; salp1 may be NaN here.
        if !(salp1 <= 0.0) {
            (guess.salp1, guess.calp1) = norm(salp1, calp1);
        } else {
            guess.salp1 = 1.0;
            guess.calp1 = 0.0;
        }
        guess
    }

    /// Longitude error of the geodesic leaving point 1 with azimuth `(salp1, calp1)`.
    ///
    /// Arguments
    /// -----------------
    /// * `p1`, `p2` – `(sin β, cos β, dn)` of the canonicalised points.
    /// * `salp1`, `calp1` – trial azimuth at point 1.
    /// * `slam120`, `clam120` – target longitude difference.
    /// * `ell` – re-parameterised for the trial geodesic on return.
    /// * `diffp` – also compute `∂λ12/∂α1`.
    ///
    /// Return
    /// ----------
    /// * [`LambdaEval`] with the longitude error and the state at both ends.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn lambda12(
        &self,
        p1: (f64, f64, f64),
        p2: (f64, f64, f64),
        salp1: f64,
        calp1: f64,
        slam120: f64,
        clam120: f64,
        ell: &mut EllipticFunction,
        diffp: bool,
    ) -> LambdaEval {
        let (sbet1, cbet1, dn1) = p1;
        let (sbet2, cbet2, dn2) = p2;

        // Break the degeneracy of an equatorial line.
        let calp1 = if sbet1 == 0.0 && calp1 == 0.0 {
            -self.tiny
        } else {
            calp1
        };

        let salp0 = salp1 * cbet1;
        let calp0 = calp1.hypot(salp1 * sbet1);

        // tan(bet1) = tan(sig1) * cos(alp1); tan(omg1) = sin(alp0) * tan(sig1)
        let somg1 = salp0 * sbet1;
        let comg1 = calp1 * cbet1;
        let (ssig1, csig1) = norm(sbet1, comg1);
        let cchi1 = self.f1 * dn1 * comg1;

        // Clairaut gives sin(alp2); the cosine follows from the latitudes.
        let salp2 = if cbet2 != cbet1 { salp0 / cbet2 } else { salp1 };
        let calp2 = if cbet2 != cbet1 || sbet2.abs() != -sbet1 {
            (sq(calp1 * cbet1)
                + if cbet1 < -sbet1 {
                    (cbet2 - cbet1) * (cbet1 + cbet2)
                } else {
                    (sbet1 - sbet2) * (sbet1 + sbet2)
                })
            .sqrt()
                / cbet2
        } else {
            calp1.abs()
        };

        let somg2 = salp0 * sbet2;
        let comg2 = calp2 * cbet2;
        let (ssig2, csig2) = norm(sbet2, comg2);
        let cchi2 = self.f1 * dn2 * comg2;

        // sig12 = sig2 - sig1, limit to [0, pi]
        let sig12 = (csig1 * ssig2 - ssig1 * csig2)
            .max(0.0)
            .atan2(csig1 * csig2 + ssig1 * ssig2);
        // omg12 = omg2 - omg1, limit to [0, pi]
        let somg12 = (comg1 * somg2 - somg1 * comg2).max(0.0);
        let comg12 = comg1 * comg2 + somg1 * somg2;

        let k2 = sq(calp0) * self.ep2;
        ell.reset(-k2, -self.ep2, 1.0 + k2, 1.0 + self.ep2);

        let schi12 = (cchi1 * somg2 - somg1 * cchi2).max(0.0);
        let cchi12 = cchi1 * cchi2 + somg1 * somg2;
        // chi12 - lam120 in (-pi, pi]
        let eta = (schi12 * clam120 - cchi12 * slam120)
            .atan2(cchi12 * clam120 + schi12 * slam120);
        let deta12 = -self.e2 / self.f1 * salp0 * ell.h() / QUARTER_TURN
            * (sig12 + (ell.delta_h(ssig2, csig2, dn2) - ell.delta_h(ssig1, csig1, dn1)));
        let lam12 = eta + deta12;
        // domg12 = deta12 + chi12 - omg12
        let domg12 = deta12
            + (schi12 * comg12 - cchi12 * somg12).atan2(cchi12 * comg12 + schi12 * somg12);

        let dlam12 = if !diffp {
            f64::NAN
        } else if calp2 == 0.0 {
            -2.0 * self.f1 * dn1 / sbet1
        } else {
            let len = self.lengths(
                ell,
                sig12,
                (ssig1, csig1, dn1),
                (ssig2, csig2, dn2),
                cbet1,
                cbet2,
                GeodesicMask::REDUCEDLENGTH,
            );
            len.m12b * self.f1 / (calp2 * cbet2)
        };

        LambdaEval {
            lam12,
            salp2,
            calp2,
            sig12,
            ssig1,
            csig1,
            ssig2,
            csig2,
            domg12,
            dlam12,
        }
    }
}

#[cfg(test)]
mod inverse_test {
    use super::*;
    use approx::assert_relative_eq;

    fn wgs84() -> GeodesicExact {
        GeodesicExact::new(6_378_137.0, 1.0 / 298.257_223_563).unwrap()
    }

    #[test]
    fn test_astroid() {
        assert_eq!(GeodesicExact::astroid(0.5, 0.0), 0.0);
        // k solves the quartic
        for &(x, y) in &[(-1.2, -0.3), (-0.5, -2.0), (-3.0, -0.01), (0.3, -0.7)] {
            let k = GeodesicExact::astroid(x, y);
            assert!(k > 0.0);
            let res = k.powi(4) + 2.0 * k.powi(3) - (x * x + y * y - 1.0) * k * k
                - 2.0 * y * y * k
                - y * y;
            assert!(res.abs() < 1e-12, "x={x}, y={y}, k={k}, res={res}");
        }
    }

    #[test]
    fn test_lengths_quarter_meridian() {
        let g = wgs84();
        // meridian (alp0 = 0, k² = e′²) from the equator to the pole
        let ell = EllipticFunction::with_complements(
            -g.ep2,
            -g.ep2,
            1.0 + g.ep2,
            1.0 + g.ep2,
        );
        let len = g.lengths(
            &ell,
            QUARTER_TURN,
            (0.0, 1.0, 1.0),
            (1.0, 0.0, (1.0 + g.ep2).sqrt()),
            1.0,
            0.0,
            GeodesicMask::DISTANCE | GeodesicMask::REDUCEDLENGTH,
        );
        // quarter meridian of WGS84
        assert_relative_eq!(len.s12b * g.b, 10_001_965.729_312_724, epsilon = 1e-6);
        assert!(len.m12b.is_finite());
        assert!(len.scale12.is_nan() && len.scale21.is_nan());
    }

    #[test]
    fn test_lambda12_zero_at_solution() {
        let g = wgs84();
        let sol = g
            .gen_inverse_sincos(40.6, -73.8, 1.4, 104.0, GeodesicMask::ALL)
            .unwrap();
        assert_relative_eq!(sol.s12, 15_347_674.108_219_85, epsilon = 1e-6);
        assert_relative_eq!(sol.salp1.hypot(sol.calp1), 1.0, epsilon = 1e-15);
        assert_relative_eq!(sol.salp2.hypot(sol.calp2), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_mask_leaves_nan() {
        let g = wgs84();
        let sol = g
            .gen_inverse_sincos(10.0, 20.0, 30.0, 40.0, GeodesicMask::DISTANCE)
            .unwrap();
        assert!(sol.s12.is_finite());
        assert!(sol.m12.is_nan());
        assert!(sol.scale12.is_nan() && sol.scale21.is_nan());
        assert!(sol.area12.is_nan());
        assert!(sol.a12.is_finite());
    }
}
