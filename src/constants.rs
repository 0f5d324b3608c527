//! # Constants and type definitions for geodesic_exact
//!
//! This module centralizes the **reference ellipsoid parameters**, **turn constants**, and
//! **unit type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - WGS84 defining parameters (equatorial radius and flattening)
//! - Turn constants in radians and degrees
//! - Core type aliases used across the crate (`Degree`, `Meter`, ...)
//! - Defaults for the area series of the exact solver
//!
//! Distances are expressed in the unit of the equatorial radius given to the engine; the
//! aliases below assume meters, which is what the WGS84 singleton uses.

// -------------------------------------------------------------------------------------------------
// Reference ellipsoid
// -------------------------------------------------------------------------------------------------

/// WGS84 equatorial radius in meters
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

// -------------------------------------------------------------------------------------------------
// Turns
// -------------------------------------------------------------------------------------------------

/// A quarter turn in radians
pub const QUARTER_TURN: f64 = std::f64::consts::FRAC_PI_2;

/// Full turn, in degrees
pub const FULL_TURN_DEG: f64 = 360.0;

// -------------------------------------------------------------------------------------------------
// Area series
// -------------------------------------------------------------------------------------------------

/// Default number of terms of the area cosine series
pub const DEFAULT_C4_ORDER: usize = 30;

/// Smallest accepted order for the area series
pub const MIN_C4_ORDER: usize = 8;

/// Largest accepted order for the area series
pub const MAX_C4_ORDER: usize = 128;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Floating point type used by the solver
pub type Real = f64;
/// Angle in degrees
pub type Degree = f64;
/// Distance in meters (or the unit of the equatorial radius)
pub type Meter = f64;
/// Area in square meters (or the square of the unit of the equatorial radius)
pub type SquareMeter = f64;
