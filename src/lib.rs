//! # satprop
//!
//! Parse NORAD two-line element sets and propagate them with SGP4.
//!
//! - [`tle`] – fixed-column TLE parser with ordered validation errors
//! - [`time`] – split-precision Julian dates and calendar conversions
//! - [`satellite`] – propagation facade returning TEME state vectors and a latched status
//! - [`orbital_elements`] – osculating classical elements of a state vector
pub mod constants;
pub mod elements;
mod engine;
pub mod gravity;
pub mod orbital_elements;
pub mod satellite;
pub mod satprop_errors;
pub mod time;
pub mod tle;

pub use gravity::{GravityModel, OpsMode, SatelliteOptions};
pub use satellite::{Satellite, StateVector};
pub use satprop_errors::{SatPropError, Sgp4Error};
pub use time::{DateTime, JulianDate};
pub use tle::{TleParseError, TwoLineElement};
