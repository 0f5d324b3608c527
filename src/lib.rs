//! Exact geodesics on an ellipsoid of revolution.
//!
//! The direct and inverse problems are solved in terms of elliptic integrals, so the results stay
//! accurate to round-off for any flattening in roughly `[-1/50, 1/50]` and remain usable well
//! beyond. Start from [`GeodesicExact`]; [`GeodesicLineExact`] walks along a single geodesic and
//! [`PolygonArea`] measures geodesic polygons.

pub mod constants;
pub mod elliptic_function;
pub mod float_ops;
pub mod geodesic_errors;
pub mod geodesic_exact;
pub mod geodesic_line_exact;
pub mod geodesic_mask;
pub mod geodesic_solution;
pub mod polygon_area;

pub use geodesic_errors::GeodesicError;
pub use geodesic_exact::{GeodesicExact, GeodesicExactParams};
pub use geodesic_line_exact::GeodesicLineExact;
pub use geodesic_mask::GeodesicMask;
pub use geodesic_solution::{DirectSolution, InverseSolution};
pub use polygon_area::{PolygonArea, PolygonResult};
