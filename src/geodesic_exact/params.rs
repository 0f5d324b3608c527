//! # Engine configuration
//!
//! [`GeodesicExactParams`] collects the tunable knobs of the exact solver, and
//! [`GeodesicExactParamsBuilder`] offers a fluent, validated way to set them.
//!
//! ## Parameters
//!
//! - **`c4_order`** – number of terms `nC4` of the area cosine series. The area integrand is
//!   sampled at `nC4` points and transformed with an `nC4 × nC4` kernel built once per engine.
//!   Accepted in `8..=128`. The truncation error falls like `εⁿᶜ⁴` with
//!   `ε = k²/(2(1+√(1+k²))+k²)`: 8 terms suffice for `|f| ≤ 1/50` and the default of 30 stays
//!   near round-off for flattening in `[-1, 0.5]`; larger values only cost time.
//! - **`strict_convergence`** – when set, the inverse solver reports
//!   [`GeodesicError::ConvergenceFailure`] if the Newton/bisection loop reaches its iteration cap
//!   instead of returning the best estimate.
//!
//! ## Example
//!
//! ```rust
//! use geodesic_exact::geodesic_exact::{GeodesicExact, GeodesicExactParams};
//!
//! let params = GeodesicExactParams::builder()
//!     .c4_order(24)
//!     .strict_convergence(true)
//!     .build()
//!     .unwrap();
//! let geod = GeodesicExact::with_params(6_378_137.0, 1.0 / 298.257_223_563, params).unwrap();
//! assert_eq!(geod.params().c4_order, 24);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_C4_ORDER, MAX_C4_ORDER, MIN_C4_ORDER};
use crate::geodesic_errors::GeodesicError;

/// Tunable parameters of [`GeodesicExact`](super::GeodesicExact).
///
/// Defaults
/// -----------------
/// * `c4_order`: 30
/// * `strict_convergence`: false
///
/// See also
/// -----------------
/// * [`GeodesicExactParams::builder`] – validated construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeodesicExactParams {
    /// Number of terms of the area cosine series.
    pub c4_order: usize,
    /// Turn an exhausted inverse iteration into an error.
    pub strict_convergence: bool,
}

impl GeodesicExactParams {
    /// Construct a new [`GeodesicExactParams`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`GeodesicExactParamsBuilder`] initialised with default values.
    pub fn builder() -> GeodesicExactParamsBuilder {
        GeodesicExactParamsBuilder::new()
    }
}

impl Default for GeodesicExactParams {
    fn default() -> Self {
        GeodesicExactParams {
            c4_order: DEFAULT_C4_ORDER,
            strict_convergence: false,
        }
    }
}

/// Builder for [`GeodesicExactParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct GeodesicExactParamsBuilder {
    params: GeodesicExactParams,
}

impl GeodesicExactParamsBuilder {
    /// Create a new builder initialised with default values.
    pub fn new() -> Self {
        Self {
            params: GeodesicExactParams::default(),
        }
    }

    pub fn c4_order(mut self, v: usize) -> Self {
        self.params.c4_order = v;
        self
    }

    pub fn strict_convergence(mut self, v: bool) -> Self {
        self.params.strict_convergence = v;
        self
    }

    /// Finalize the builder and produce a [`GeodesicExactParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `MIN_C4_ORDER ≤ c4_order ≤ MAX_C4_ORDER` (8 to 128).
    ///
    /// Return
    /// ----------
    /// * `Ok(GeodesicExactParams)` when every rule holds.
    /// * `Err(GeodesicError::InvalidEngineParameter)` otherwise.
    pub fn build(self) -> Result<GeodesicExactParams, GeodesicError> {
        let p = self.params;
        if !(MIN_C4_ORDER..=MAX_C4_ORDER).contains(&p.c4_order) {
            return Err(GeodesicError::InvalidEngineParameter(format!(
                "c4_order must lie in [{MIN_C4_ORDER}, {MAX_C4_ORDER}], got {}",
                p.c4_order
            )));
        }
        Ok(p)
    }
}

impl fmt::Display for GeodesicExactParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PARAM_COL: usize = 34;
        writeln!(f, "Exact geodesic engine parameters")?;
        writeln!(f, "--------------------------------")?;

        macro_rules! line {
            ($fmt:expr, $val:expr, $comment:expr) => {{
                let s = format!($fmt, $val);
                let pad = if s.len() < PARAM_COL {
                    " ".repeat(PARAM_COL - s.len())
                } else {
                    " ".to_string()
                };
                writeln!(f, "  {}{}# {}", s, pad, $comment)
            }};
        }

        line!(
            "c4_order           = {}",
            self.c4_order,
            "Terms of the area cosine series"
        )?;
        line!(
            "strict_convergence = {}",
            self.strict_convergence,
            "Fail when the inverse iteration is exhausted"
        )
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = GeodesicExactParams::new();
        assert_eq!(p.c4_order, 30);
        assert!(!p.strict_convergence);
        assert_eq!(GeodesicExactParams::builder().build().unwrap(), p);
    }

    #[test]
    fn test_builder_validation() {
        let err = GeodesicExactParams::builder().c4_order(4).build().unwrap_err();
        assert_eq!(
            err,
            GeodesicError::InvalidEngineParameter(
                "c4_order must lie in [8, 128], got 4".to_string()
            )
        );
        assert!(GeodesicExactParams::builder().c4_order(500).build().is_err());
        let p = GeodesicExactParams::builder()
            .c4_order(128)
            .strict_convergence(true)
            .build()
            .unwrap();
        assert_eq!(p.c4_order, 128);
        assert!(p.strict_convergence);
    }

    #[test]
    fn test_display() {
        let out = format!("{}", GeodesicExactParams::default());
        assert!(out.starts_with("Exact geodesic engine parameters"));
        assert!(out.contains("c4_order           = 30"));
        assert!(out.contains("# Fail when the inverse iteration is exhausted"));
    }
}
