//! # Constants and type definitions for satprop
//!
//! This module centralizes the **conversion factors**, **reference epochs** and **common type
//! aliases** used throughout the `satprop` library.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, revolutions per day ↔ radians per minute)
//! - Julian date anchors used by the propagator (SGP4 reference epoch, J2000)
//! - Layout constants of the two-line element format
//! - Core type aliases used across the crate
//!
//! The gravity model constant sets live in [`crate::gravity`].

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Revolutions per day expressed in radians per minute (the legacy `xpdotp` divisor)
pub const REV_PER_DAY: f64 = MINUTES_PER_DAY / DPI;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

// -------------------------------------------------------------------------------------------------
// Julian date anchors
// -------------------------------------------------------------------------------------------------

/// Julian date of 1949-12-31 00:00 UT, the epoch SGP4 counts days from
pub const SGP4_REFERENCE_EPOCH: f64 = 2_433_281.5;

/// Julian date of J2000.0 (2000-01-01 12:00:00)
pub const J2000: f64 = 2_451_545.0;

/// Julian date of 1900-01-00 00:00, origin of the calendar inversion
pub const JD_1900: f64 = 2_415_019.5;

// -------------------------------------------------------------------------------------------------
// Two-line element layout
// -------------------------------------------------------------------------------------------------

/// Length in bytes of one element line, checksum digit included
pub const TLE_LINE_LEN: usize = 69;

/// Number of leading bytes covered by a line checksum
pub const TLE_CHECKSUM_SPAN: usize = 68;

/// Two-digit epoch years below this pivot belong to the 21st century
pub const TLE_CENTURY_PIVOT: u32 = 57;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Angle in radians
pub type Radian = f64;

/// Distance in kilometers
pub type Kilometer = f64;

/// Duration in minutes
pub type Minutes = f64;
