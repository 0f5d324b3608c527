//! # Area integral
//!
//! The area between a geodesic and the equator is
//!
//! ```text
//! S12 = c² α12 + A4 · (I4(σ2) − I4(σ1)),    I4(σ) = Σ_{l<nC4} C4[l] · cos((2l+1)σ)
//! ```
//!
//! with `A4 = a² cos α0 sin α0 e²`. The coefficients `C4[l]` depend on the line through
//! `k² = e′² cos² α0` only.
//!
//! ## Computing the coefficients
//!
//! Rather than storing a triangular table of polynomials in `n`, the coefficients are obtained
//! at line construction by a type-IV discrete sine transform of the exact integrand
//!
//! ```text
//! g(σ) = −Dt(e′², k² sin² σ) · sin σ / 2
//! ```
//!
//! sampled at the `nC4` midpoints `σ_j = π (2j+1) / (4 nC4)`. `Dt` is the divided difference of
//! `t(x) = x + √(1+x) · asinh(√x)/√x − 1`. The transform kernel
//! `K[l][j] = 2/nC4 · sin((2l+1) σ_j)` is built once per engine as a [`DMatrix`]; a line then
//! needs one matrix-vector product. Integrating `sin((2l+1)σ)` term by term gives
//! `C4[l] = −b_l / (2l+1)`.
//!
//! The integrand is analytic in σ, so the coefficients decay like `εˡ` with
//! `ε = k²/(2(1+√(1+k²))+k²)`; 8 terms reach full double precision for |f| ≤ 1/50. The kernel
//! is checked against `K·K = (2/nC4)·I` at construction.
//!
//! ## See also
//!
//! - [`GeodesicExact::cos_series`](super::GeodesicExact::cos_series) – Clenshaw summation of `I4`.
//! - [`GeodesicLineExact`](crate::geodesic_line_exact::GeodesicLineExact) – stores `C4` per line.

use nalgebra::{DMatrix, DVector};
use smallvec::SmallVec;
use std::f64::consts::PI;

use super::GeodesicExact;
use crate::geodesic_errors::GeodesicError;

/// Per-line area coefficients, on the stack for the default order.
pub type C4Coeffs = SmallVec<[f64; 32]>;

/// Build the `n × n` type-IV DST kernel.
///
/// Return
/// ----------
/// * The kernel matrix `K[l][j]`, checked by [`check_c4_kernel`].
pub(super) fn build_c4_kernel(n: usize) -> Result<DMatrix<f64>, GeodesicError> {
    let scale = 2.0 / n as f64;
    let kernel = DMatrix::from_fn(n, n, |l, j| {
        let arg = PI * ((2 * l + 1) * (2 * j + 1)) as f64 / (4 * n) as f64;
        scale * arg.sin()
    });
    check_c4_kernel(&kernel)?;
    Ok(kernel)
}

/// Verify that `kernel` is a square DST-IV kernel, i.e. `K·K = (2/n)·I` to round-off.
///
/// Return
/// ----------
/// * `Err(GeodesicError::C4Misalignment)` with `expected = n²` and `found` the number of entries
///   of `K·K` that agree with `(2/n)·I`, or `found = 0` when the matrix is not square.
pub(super) fn check_c4_kernel(kernel: &DMatrix<f64>) -> Result<(), GeodesicError> {
    let n = kernel.nrows();
    if kernel.ncols() != n {
        return Err(GeodesicError::C4Misalignment {
            expected: n * n,
            found: 0,
        });
    }
    let tol = 64.0 * f64::EPSILON;
    let diag = 2.0 / n as f64;
    let kk = kernel * kernel;
    let found = kk
        .iter()
        .enumerate()
        .filter(|&(idx, &v)| {
            // column-major storage
            let (i, j) = (idx % n, idx / n);
            let expected = if i == j { diag } else { 0.0 };
            (v - expected).abs() <= tol
        })
        .count();
    if found != n * n {
        return Err(GeodesicError::C4Misalignment {
            expected: n * n,
            found,
        });
    }
    Ok(())
}

/// `asinh(√x)/√x`, continued analytically to `x < 0` as `asin(√−x)/√−x`.
pub(super) fn asinhsqrt(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else if x > 0.0 {
        x.sqrt().asinh() / x.sqrt()
    } else {
        (-x).sqrt().asin() / (-x).sqrt()
    }
}

/// `t(x) = x + √(1+x) · asinh(√x)/√x − 1`.
pub(super) fn t(x: f64) -> f64 {
    x + ((1.0 + x).sqrt() * asinhsqrt(x) - 1.0)
}

/// Derivative `t′(x)`, finite at zero.
pub(super) fn td(x: f64) -> f64 {
    if x == 0.0 {
        4.0 / 3.0
    } else {
        1.0 + (1.0 - asinhsqrt(x) / (1.0 + x).sqrt()) / (2.0 * x)
    }
}

/// Divided difference `(t(x) − t(y)) / (x − y)`.
///
/// Arguments
/// -----------------
/// * `x`, `y` – abscissae; `x` is `e′²` in practice.
/// * `tx` – precomputed `t(x)`.
///
/// When `x` and `y` share a sign the difference is taken in closed form to avoid cancellation.
pub(super) fn dt(x: f64, y: f64, tx: f64) -> f64 {
    if x == y {
        return td(x);
    }
    if x * y <= 0.0 {
        return (tx - t(y)) / (x - y);
    }
    let (sx, sx1) = (x.abs().sqrt(), (1.0 + x).sqrt());
    let (sy, sy1) = (y.abs().sqrt(), (1.0 + y).sqrt());
    let z = (x - y) / (sx * sy1 + sy * sx1);
    let d1 = 2.0 * sx * sy;
    let d2 = 2.0 * (x * sy * sy1 + y * sx * sx1);
    if x > 0.0 {
        1.0 + (z.asinh() / z) / d1 - (sx.asinh() + sy.asinh()) / d2
    } else {
        1.0 - (z.asin() / z) / d1 - (sx.asin() + sy.asin()) / d2
    }
}

impl GeodesicExact {
    /// Area series coefficients `C4[l]` for a geodesic with parameter `k2 = e′² cos² α0`.
    ///
    /// Arguments
    /// -----------------
    /// * `k2` – the line's `k²`.
    ///
    /// Return
    /// ----------
    /// * `nC4` coefficients of `I4(σ) = Σ C4[l] cos((2l+1)σ)`.
    pub fn c4f(&self, k2: f64) -> C4Coeffs {
        let n = self.params.c4_order;
        let samples = DVector::from_iterator(
            n,
            (0..n).map(|j| {
                let sig = PI * (2 * j + 1) as f64 / (4 * n) as f64;
                let s = sig.sin();
                -dt(self.ep2, k2 * s * s, self.t_ep2) * s / 2.0
            }),
        );
        let b = &self.c4_kernel * samples;
        b.iter()
            .enumerate()
            .map(|(l, bl)| -bl / (2 * l + 1) as f64)
            .collect()
    }

    /// Clenshaw sum `Σ_{i<n} c[i] cos((2i+1)x)` given `sin x` and `cos x`.
    pub fn cos_series(sinx: f64, cosx: f64, c: &[f64]) -> f64 {
        let mut n = c.len();
        // 2 cos 2x
        let ar = 2.0 * (cosx - sinx) * (cosx + sinx);
        let mut y0 = if n & 1 == 1 {
            n -= 1;
            c[n]
        } else {
            0.0
        };
        let mut y1 = 0.0;
        while n > 0 {
            n -= 1;
            y1 = ar * y0 - y1 + c[n];
            n -= 1;
            y0 = ar * y1 - y0 + c[n];
        }
        cosx * (y0 - y1)
    }
}
