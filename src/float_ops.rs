//! # Floating point helpers for geodesic computations
//!
//! This module gathers the small numeric kernels the solver relies on: error-free summation,
//! angle normalization and differencing in degrees, coarsening of tiny angles, degree-argument
//! trigonometry that is exact at multiples of 90°, and a Horner polynomial evaluator.
//!
//! ## Overview
//!
//! The kernels are defined once on the [`FloatOps`] trait and implemented for `f32` and `f64`,
//! so the precision used by a caller is a type choice rather than a code path. The engine itself
//! works with [`Real`](crate::constants::Real) and calls the free functions exported here
//! ([`sum`], [`ang_normalize`], [`ang_diff`], ...), which simply forward to the trait.
//!
//! Sign of zero matters throughout: `ang_normalize(-0.0)` stays `-0.0`, `sincosd(-0.0)` returns
//! `(-0.0, 1.0)`, and boundary results of [`ang_diff`] carry the sign of the true difference.
//!
//! ## See also
//!
//! - [`crate::geodesic_exact`] – main consumer of these helpers.
//! - Knuth, *TAOCP* vol. 2, §4.2.2, Theorem B (error-free transformation of a sum).

use std::hint::black_box;

/// Numeric kernels required by the exact geodesic solver.
///
/// Implementors provide correctly signed angle arithmetic in degrees and a few constants that
/// describe the precision of the type.
///
/// See also
/// ------------
/// * [`sum`], [`ang_diff`], [`sincosd`], [`atan2d`] – free-function entry points.
pub trait FloatOps: Copy + PartialOrd + std::fmt::Debug {
    /// Number of bits in the significand.
    const DIGITS: u32;
    /// Difference between 1 and the next representable value.
    const MACHINE_EPSILON: Self;
    /// Smallest positive normal value.
    const SMALLEST_NORMAL: Self;

    /// Quiet NaN.
    fn nan() -> Self;

    /// Positive infinity.
    fn infinity() -> Self;

    /// `self * self`.
    fn sq(self) -> Self;

    /// `sqrt(self² + y²)` without undue overflow.
    fn hypot(self, y: Self) -> Self;

    /// IEEE remainder: `self - n·y` where `n` is the integer nearest `self / y`.
    ///
    /// The result lies in `[-|y|/2, |y|/2]` and keeps the sign of `self` when it is zero.
    fn ieee_remainder(self, y: Self) -> Self;

    /// Error-free transformation of a sum.
    ///
    /// Return
    /// ----------
    /// * `(s, t)` with `s = round(self + v)` and `self + v = s + t` exactly.
    fn error_free_sum(self, v: Self) -> (Self, Self);

    /// Reduce an angle to `[-180, 180]`, keeping `-180` for negative multiples of 180.
    fn ang_normalize(self) -> Self;

    /// Exact difference `y - self` reduced to `[-180, 180]` plus its rounding error.
    fn ang_diff(self, y: Self) -> (Self, Self);

    /// Coarsen tiny angles so that values below roughly `1/16 · ε` collapse to zero.
    fn ang_round(self) -> Self;

    /// NaN outside `[-90, 90]`, identity otherwise.
    fn lat_fix(self) -> Self;

    /// Sine and cosine of an angle in degrees, exact at multiples of 90°.
    fn sincosd(self) -> (Self, Self);

    /// `atan2(self, x)` in degrees, result in `[-180, 180]`.
    fn atan2d(self, x: Self) -> Self;
}

macro_rules! impl_float_ops {
    ($t:ty) => {
        impl FloatOps for $t {
            const DIGITS: u32 = <$t>::MANTISSA_DIGITS;
            const MACHINE_EPSILON: Self = <$t>::EPSILON;
            const SMALLEST_NORMAL: Self = <$t>::MIN_POSITIVE;

            #[inline]
            fn nan() -> Self {
                <$t>::NAN
            }

            #[inline]
            fn infinity() -> Self {
                <$t>::INFINITY
            }

            #[inline]
            fn sq(self) -> Self {
                self * self
            }

            #[inline]
            fn hypot(self, y: Self) -> Self {
                <$t>::hypot(self, y)
            }

            fn ieee_remainder(self, y: Self) -> Self {
                let ya = y.abs();
                let r = self % ya;
                let half = ya / 2.0;
                if r > half {
                    r - ya
                } else if r < -half {
                    r + ya
                } else {
                    r
                }
            }

            fn error_free_sum(self, v: Self) -> (Self, Self) {
                let u = self;
                let s = black_box(u + v);
                let up = black_box(s - v);
                let vpp = black_box(s - up);
                let up = up - u;
                let vpp = vpp - v;
                // u + v = s + t, and t keeps the sign of s when s is zero
                let t = if s != 0.0 { 0.0 - (up + vpp) } else { s };
                (s, t)
            }

            fn ang_normalize(self) -> Self {
                let y = self.ieee_remainder(360.0);
                if y.abs() == 180.0 {
                    (180.0 as $t).copysign(self)
                } else {
                    y
                }
            }

            fn ang_diff(self, y: Self) -> (Self, Self) {
                let (d, e) = (-self)
                    .ieee_remainder(360.0)
                    .error_free_sum(y.ieee_remainder(360.0));
                let (d, e) = d.ieee_remainder(360.0).error_free_sum(e);
                let d = if d == 0.0 || d.abs() == 180.0 {
                    d.copysign(if e == 0.0 { y - self } else { -e })
                } else {
                    d
                };
                (d, e)
            }

            fn ang_round(self) -> Self {
                let z: $t = 1.0 / 16.0;
                let mut y = self.abs();
                let w = z - y;
                if w > 0.0 {
                    y = z - w;
                }
                y.copysign(self)
            }

            #[inline]
            fn lat_fix(self) -> Self {
                if self.abs() > 90.0 {
                    <$t>::NAN
                } else {
                    self
                }
            }

            fn sincosd(self) -> (Self, Self) {
                let mut r = self % 360.0;
                let q = (r / 90.0).round();
                r -= 90.0 * q;
                let (s, c) = r.to_radians().sin_cos();
                let (s, c) = match (q as i64) & 3 {
                    0 => (s, c),
                    1 => (c, -s),
                    2 => (-s, -c),
                    _ => (-c, s),
                };
                let c = c + 0.0;
                let s = if s == 0.0 { s.copysign(self) } else { s };
                (s, c)
            }

            fn atan2d(self, x: Self) -> Self {
                let (mut y, mut x) = (self, x);
                let mut q = 0;
                if y.abs() > x.abs() {
                    std::mem::swap(&mut x, &mut y);
                    q = 2;
                }
                if x.is_sign_negative() {
                    x = -x;
                    q += 1;
                }
                let ang = y.atan2(x).to_degrees();
                match q {
                    1 => (180.0 as $t).copysign(y) - ang,
                    2 => 90.0 - ang,
                    3 => -90.0 + ang,
                    _ => ang,
                }
            }
        }
    };
}

impl_float_ops!(f32);
impl_float_ops!(f64);

/// Error-free sum, see [`FloatOps::error_free_sum`].
#[inline]
pub fn sum<T: FloatOps>(u: T, v: T) -> (T, T) {
    u.error_free_sum(v)
}

/// See [`FloatOps::ang_normalize`].
#[inline]
pub fn ang_normalize<T: FloatOps>(x: T) -> T {
    x.ang_normalize()
}

/// Compute `y - x` reduced to `[-180, 180]`.
///
/// Arguments
/// -----------------
/// * `x` – first angle (degrees).
/// * `y` – second angle (degrees).
///
/// Return
/// ----------
/// * `(d, e)` such that `y - x ≡ d + e (mod 360)`, `d` rounded and `e` the rounding error.
///   When `d` is `0` or `±180` its sign is the sign of the true difference.
#[inline]
pub fn ang_diff<T: FloatOps>(x: T, y: T) -> (T, T) {
    x.ang_diff(y)
}

/// See [`FloatOps::ang_round`].
#[inline]
pub fn ang_round<T: FloatOps>(x: T) -> T {
    x.ang_round()
}

/// See [`FloatOps::lat_fix`].
#[inline]
pub fn lat_fix<T: FloatOps>(x: T) -> T {
    x.lat_fix()
}

/// See [`FloatOps::sincosd`].
#[inline]
pub fn sincosd<T: FloatOps>(x: T) -> (T, T) {
    x.sincosd()
}

/// See [`FloatOps::atan2d`].
#[inline]
pub fn atan2d<T: FloatOps>(y: T, x: T) -> T {
    y.atan2d(x)
}

/// `x * x`.
#[inline]
pub fn sq<T: FloatOps>(x: T) -> T {
    x.sq()
}

/// Scale `(s, c)` so that `s² + c² = 1`.
#[inline]
pub fn norm(s: f64, c: f64) -> (f64, f64) {
    let r = s.hypot(c);
    (s / r, c / r)
}

#[cfg(test)]
mod float_ops_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sum_is_exact() {
        let (s, t) = sum(1.0_f64, 1e-17);
        assert_eq!(s, 1.0);
        assert_eq!(t, 1e-17);

        let (s, t) = sum(0.1_f64, 0.2);
        assert_eq!(s, 0.30000000000000004);
        assert_eq!(t, -2.7755575615628914e-17);

        let (s, t) = sum(-0.0_f64, -0.0);
        assert!(s == 0.0 && s.is_sign_negative());
        assert!(t.is_sign_negative());

        let (s, t) = sum(3.0_f64, -3.0);
        assert_eq!(s, 0.0);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_ang_normalize() {
        assert_eq!(ang_normalize(-180.0_f64), -180.0);
        assert_eq!(ang_normalize(180.0_f64), 180.0);
        assert_eq!(ang_normalize(540.0_f64), 180.0);
        assert_eq!(ang_normalize(-540.0_f64), -180.0);
        assert_eq!(ang_normalize(370.0_f64), 10.0);
        assert_eq!(ang_normalize(-190.0_f64), 170.0);
        assert!(ang_normalize(-0.0_f64).is_sign_negative());
        assert!(ang_normalize(-720.0_f64).is_sign_negative());
        assert!(ang_normalize(720.0_f64).is_sign_positive());
        assert!(ang_normalize(f64::NAN).is_nan());
        for x in [-1000.5_f64, -359.0, 0.25, 123.0, 999.0] {
            assert_eq!(ang_normalize(ang_normalize(x)), ang_normalize(x));
        }
    }

    #[test]
    fn test_ang_diff_boundaries() {
        let (d, e) = ang_diff(0.0_f64, 180.0);
        assert_eq!(d, 180.0);
        assert_eq!(e, 0.0);
        assert_eq!(ang_diff(0.0_f64, -180.0).0, -180.0);
        assert_eq!(ang_diff(-180.0_f64, 180.0).0, 0.0);
        assert_eq!(ang_diff(10.0_f64, 370.0).0, 0.0);
        assert!(ang_diff(1.0_f64, 1.0).0.is_sign_positive());
        assert_eq!(ang_diff(179.0_f64, -179.0).0, 2.0);
        assert_eq!(ang_diff(-179.0_f64, 179.0).0, -2.0);
    }

    #[test]
    fn test_ang_diff_law() {
        for (x, y) in [(12.5_f64, 333.0_f64), (-721.0, 44.0), (179.9, -179.9), (0.1, 0.2)] {
            let (d, e) = ang_diff(x, y);
            assert!(d.abs() <= 180.0);
            let back = (x + d + e - y).ieee_remainder(360.0);
            assert!(back.abs() < 1e-12);
        }
    }

    #[test]
    fn test_ang_round() {
        assert_eq!(ang_round(1e-200_f64), 0.0);
        assert!(ang_round(-1e-200_f64).is_sign_negative());
        assert_eq!(ang_round(0.0_f64), 0.0);
        assert_eq!(ang_round(45.0_f64), 45.0);
        assert_eq!(ang_round(-90.0_f64), -90.0);
        let x = 1e-10_f64;
        assert!((ang_round(x) - x).abs() < 1e-17);
    }

    #[test]
    fn test_lat_fix() {
        assert!(lat_fix(90.5_f64).is_nan());
        assert!(lat_fix(-91.0_f64).is_nan());
        assert_eq!(lat_fix(-90.0_f64), -90.0);
        assert_eq!(lat_fix(12.0_f64), 12.0);
    }

    #[test]
    fn test_sincosd_exact_quadrants() {
        assert_eq!(sincosd(90.0_f64), (1.0, 0.0));
        assert_eq!(sincosd(180.0_f64), (0.0, -1.0));
        assert_eq!(sincosd(-90.0_f64), (-1.0, 0.0));
        assert_eq!(sincosd(270.0_f64), (-1.0, 0.0));
        assert_eq!(sincosd(360.0_f64), (0.0, 1.0));
        let (s, c) = sincosd(-0.0_f64);
        assert!(s == 0.0 && s.is_sign_negative());
        assert_eq!(c, 1.0);
        let (s, c) = sincosd(30.0_f64);
        assert_relative_eq!(s, 0.5, epsilon = 1e-15);
        assert_relative_eq!(c, 3.0_f64.sqrt() / 2.0, epsilon = 1e-15);
        let (s, c) = sincosd(f64::INFINITY);
        assert!(s.is_nan() && c.is_nan());
    }

    #[test]
    fn test_atan2d() {
        assert_eq!(atan2d(0.0_f64, -1.0), 180.0);
        assert_eq!(atan2d(-0.0_f64, -1.0), -180.0);
        assert_eq!(atan2d(1.0_f64, 0.0), 90.0);
        assert_eq!(atan2d(-1.0_f64, 0.0), -90.0);
        assert_eq!(atan2d(0.0_f64, 1.0), 0.0);
        assert_relative_eq!(atan2d(1.0_f64, 1.0), 45.0, epsilon = 1e-14);
        assert_relative_eq!(atan2d(1.0_f64, -1.0), 135.0, epsilon = 1e-13);
    }

    #[test]
    fn test_norm() {
        let (s, c) = norm(3.0, 4.0);
        assert_relative_eq!(s, 0.6, epsilon = 1e-16);
        assert_relative_eq!(c, 0.8, epsilon = 1e-16);

        let (s, c) = norm(-1e-300, 1e-300);
        assert_relative_eq!(s, -std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(c, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
    }

    #[test]
    fn test_single_precision() {
        assert_eq!(<f32 as FloatOps>::DIGITS, 24);
        assert_eq!(180.0_f32.sincosd(), (0.0, -1.0));
        assert_eq!((-540.0_f32).ang_normalize(), -180.0);
        assert_eq!(1.0_f32.atan2d(0.0), 90.0);
        assert_eq!(<f64 as FloatOps>::DIGITS, 53);
    }
}
