use thiserror::Error;

use crate::geodesic_mask::GeodesicMask;

#[derive(Error, Debug, Clone)]
pub enum GeodesicError {
    #[error("Equatorial radius is not positive: {0}")]
    EquatorialRadiusNotPositive(f64),

    #[error("Polar semi-axis is not positive: {0}")]
    PolarSemiAxisNotPositive(f64),

    #[error("C4 misalignment: expected {expected} orthogonal kernel entries, found {found}")]
    C4Misalignment { expected: usize, found: usize },

    #[error("Convergence failure after {iterations} iterations of the inverse solver")]
    ConvergenceFailure { iterations: usize },

    #[error("Invalid engine parameter: {0}")]
    InvalidEngineParameter(String),

    #[error("Geodesic line lacks the capabilities for {0:?}")]
    MissingCapability(GeodesicMask),
}

impl PartialEq for GeodesicError {
    fn eq(&self, other: &Self) -> bool {
        use GeodesicError::*;
        match (self, other) {
            // radii compare by bit pattern so that NaN payloads are equal to themselves
            (EquatorialRadiusNotPositive(a), EquatorialRadiusNotPositive(b)) => {
                a.to_bits() == b.to_bits()
            }
            (PolarSemiAxisNotPositive(a), PolarSemiAxisNotPositive(b)) => {
                a.to_bits() == b.to_bits()
            }
            (
                C4Misalignment {
                    expected: e1,
                    found: f1,
                },
                C4Misalignment {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (ConvergenceFailure { iterations: a }, ConvergenceFailure { iterations: b }) => a == b,
            (InvalidEngineParameter(a), InvalidEngineParameter(b)) => a == b,
            (MissingCapability(a), MissingCapability(b)) => a == b,

            _ => false,
        }
    }
}
