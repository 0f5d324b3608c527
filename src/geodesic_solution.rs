//! # Solutions of the direct and inverse geodesic problems
//!
//! This module defines the plain-data results returned by the engine and by geodesic lines:
//!
//! - [`DirectSolution`] – endpoint of a geodesic started from point 1 with a given azimuth,
//! - [`InverseSolution`] – shortest geodesic between two given points,
//! - [`InverseSinCos`] – the same inverse solution with the azimuths kept as `(sin, cos)` pairs.
//!
//! Every field is always present. Quantities that were not requested through the
//! [`GeodesicMask`](crate::geodesic_mask::GeodesicMask) are set to NaN, so a partially filled
//! solution is easy to spot and cannot be mistaken for a zero result.
//!
//! Units follow the engine: angles in degrees, lengths in the unit of the equatorial radius,
//! areas in that unit squared; the geodesic scales are dimensionless.
//!
//! ## See also
//!
//! - [`GeodesicExact::gen_direct`](crate::geodesic_exact::GeodesicExact::gen_direct)
//! - [`GeodesicExact::gen_inverse`](crate::geodesic_exact::GeodesicExact::gen_inverse)
//! - [`GeodesicLineExact::gen_position`](crate::geodesic_line_exact::GeodesicLineExact::gen_position)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{Degree, Meter, SquareMeter};
use crate::float_ops::atan2d;

/// Result of a direct geodesic computation.
///
/// Fields
/// -----------------
/// * `a12` – arc length on the auxiliary sphere (degrees), always set.
/// * `lat2`, `lon2`, `azi2` – position and forward azimuth at point 2 (degrees).
/// * `s12` – distance from point 1 to point 2.
/// * `m12` – reduced length.
/// * `scale12`, `scale21` – geodesic scales `M12` and `M21`.
/// * `area12` – area `S12` between the geodesic and the equator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectSolution {
    pub a12: Degree,
    pub lat2: Degree,
    pub lon2: Degree,
    pub azi2: Degree,
    pub s12: Meter,
    pub m12: Meter,
    pub scale12: f64,
    pub scale21: f64,
    pub area12: SquareMeter,
}

impl DirectSolution {
    pub(crate) fn nan() -> Self {
        DirectSolution {
            a12: f64::NAN,
            lat2: f64::NAN,
            lon2: f64::NAN,
            azi2: f64::NAN,
            s12: f64::NAN,
            m12: f64::NAN,
            scale12: f64::NAN,
            scale21: f64::NAN,
            area12: f64::NAN,
        }
    }
}

/// Result of an inverse geodesic computation.
///
/// Fields
/// -----------------
/// * `a12` – arc length on the auxiliary sphere (degrees), always set.
/// * `s12` – length of the shortest geodesic.
/// * `azi1`, `azi2` – forward azimuths at point 1 and point 2 (degrees).
/// * `m12`, `scale12`, `scale21`, `area12` – as for [`DirectSolution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverseSolution {
    pub a12: Degree,
    pub s12: Meter,
    pub azi1: Degree,
    pub azi2: Degree,
    pub m12: Meter,
    pub scale12: f64,
    pub scale21: f64,
    pub area12: SquareMeter,
}

/// Inverse solution with azimuths given by their sine and cosine.
///
/// This is the form the solver produces internally; it avoids an `atan2` when the azimuth is
/// only needed to seed a [`GeodesicLineExact`](crate::geodesic_line_exact::GeodesicLineExact).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverseSinCos {
    pub a12: Degree,
    pub s12: Meter,
    pub salp1: f64,
    pub calp1: f64,
    pub salp2: f64,
    pub calp2: f64,
    pub m12: Meter,
    pub scale12: f64,
    pub scale21: f64,
    pub area12: SquareMeter,
}

impl InverseSinCos {
    /// Convert the azimuth pairs to degrees.
    ///
    /// Arguments
    /// -----------------
    /// * `with_azimuths` – when false the azimuths are left as NaN.
    pub fn to_solution(&self, with_azimuths: bool) -> InverseSolution {
        let (azi1, azi2) = if with_azimuths {
            (atan2d(self.salp1, self.calp1), atan2d(self.salp2, self.calp2))
        } else {
            (f64::NAN, f64::NAN)
        };
        InverseSolution {
            a12: self.a12,
            s12: self.s12,
            azi1,
            azi2,
            m12: self.m12,
            scale12: self.scale12,
            scale21: self.scale21,
            area12: self.area12,
        }
    }
}

impl fmt::Display for DirectSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Direct geodesic solution")?;
        writeln!(f, "  lat2    = {:.12}°", self.lat2)?;
        writeln!(f, "  lon2    = {:.12}°", self.lon2)?;
        writeln!(f, "  azi2    = {:.12}°", self.azi2)?;
        writeln!(f, "  s12     = {:.6}", self.s12)?;
        writeln!(f, "  a12     = {:.12}°", self.a12)?;
        writeln!(f, "  m12     = {:.6}", self.m12)?;
        writeln!(f, "  M12/M21 = {:.12} / {:.12}", self.scale12, self.scale21)?;
        write!(f, "  S12     = {:.3}", self.area12)
    }
}

impl fmt::Display for InverseSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inverse geodesic solution")?;
        writeln!(f, "  s12     = {:.6}", self.s12)?;
        writeln!(f, "  azi1    = {:.12}°", self.azi1)?;
        writeln!(f, "  azi2    = {:.12}°", self.azi2)?;
        writeln!(f, "  a12     = {:.12}°", self.a12)?;
        writeln!(f, "  m12     = {:.6}", self.m12)?;
        writeln!(f, "  M12/M21 = {:.12} / {:.12}", self.scale12, self.scale21)?;
        write!(f, "  S12     = {:.3}", self.area12)
    }
}
