//! # Constants and type definitions for ephemcheck
//!
//! This module centralizes the **conversion factors**, the **reference-format layout** and the
//! **default tolerances** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (hours/degrees/arcseconds ↔ radians)
//! - Core type aliases used across the crate
//! - Markers and fixed columns of the Horizons observer-table text format
//! - Default fudge factors applied when comparing computed and reference values

use std::ops::{Range, RangeFrom};

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in hours
pub type Hour = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;

// -------------------------------------------------------------------------------------------------
// Horizons observer-table layout
// -------------------------------------------------------------------------------------------------

/// Prefix of the line declaring the observed body.
pub const TARGET_MARKER: &str = "Target body name:";

/// Whitespace-delimited token of the header line holding the body name.
pub const TARGET_NAME_TOKEN: usize = 3;

/// Start of ephemeris marker.
pub const BLOCK_START_MARKER: &str = "$$SOE";

/// End of ephemeris marker.
pub const BLOCK_END_MARKER: &str = "$$EOE";

/// `YYYY-Mon-DD HH:MM`
pub const DATE_COLUMNS: Range<usize> = 1..18;

/// Apparent right ascension, `HH MM SS.ff`
pub const RA_COLUMNS: Range<usize> = 23..34;

/// Apparent declination, `sDD MM SS.f`
pub const DEC_COLUMNS: Range<usize> = 35..46;

/// Apparent angular diameter in arcseconds, free-form up to the end of the line.
pub const SIZE_COLUMNS: RangeFrom<usize> = 71..;

// -------------------------------------------------------------------------------------------------
// Default tolerances
// -------------------------------------------------------------------------------------------------

/// Angular fudge factor in sexagesimal degrees (2 arcseconds), applied to both right ascension
/// and declination.
pub const ANGLE_FUDGE: &str = "0:00:02";

/// Angular-size fudge factor (arcseconds).
pub const SIZE_FUDGE: ArcSec = 0.1;

/// Default extension of reference-ephemeris files.
pub const REFERENCE_EXTENSION: &str = "txt";
