//! # Element record adapter
//!
//! Convert a parsed [`TwoLineElement`] into the record the propagator consumes: angles in
//! radians, mean motion and its derivatives per minute, and the epoch as a split
//! [`JulianDate`].
use serde::{Deserialize, Serialize};

use crate::constants::{
    Radian, DAYS_PER_JULIAN_YEAR, J2000, MINUTES_PER_DAY, RADEG, REV_PER_DAY,
    SGP4_REFERENCE_EPOCH, TLE_CENTURY_PIVOT,
};
use crate::time::{days_to_mdhms, JulianDate};
use crate::tle::TwoLineElement;

/// Mean elements at epoch, in propagator units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRecord {
    pub catalog_number: String,
    pub classification: char,
    /// Full four-digit epoch year
    pub epoch_year: i32,
    pub epoch_day_of_year: f64,
    pub epoch: JulianDate,
    /// B* drag term (inverse earth radii)
    pub b_star: f64,
    /// rad/min²
    pub n_dot: f64,
    /// rad/min³
    pub n_ddot: f64,
    pub inclination: Radian,
    pub right_ascension: Radian,
    pub eccentricity: f64,
    pub arg_of_perigee: Radian,
    pub mean_anomaly: Radian,
    /// Kozai mean motion (rad/min)
    pub mean_motion: f64,
    pub element_set_number: u32,
    pub revolution_number: u64,
}

/// Expand a two-digit element set year: 57 to 99 are 19xx, 00 to 56 are 20xx.
pub fn full_epoch_year(two_digit_year: u32) -> i32 {
    let century = if two_digit_year < TLE_CENTURY_PIVOT {
        2000
    } else {
        1900
    };
    century + two_digit_year as i32
}

impl ElementRecord {
    /// Days elapsed between the SGP4 reference epoch (1949-12-31 00:00) and the element epoch.
    pub fn days_since_reference_epoch(&self) -> f64 {
        (self.epoch.whole - SGP4_REFERENCE_EPOCH) + self.epoch.frac
    }

    /// Julian years elapsed between J2000 and the element epoch.
    pub fn years_since_j2000(&self) -> f64 {
        ((self.epoch.whole - J2000) + self.epoch.frac) / DAYS_PER_JULIAN_YEAR
    }
}

impl From<&TwoLineElement> for ElementRecord {
    fn from(tle: &TwoLineElement) -> Self {
        let epoch_year = full_epoch_year(tle.epoch_year);
        let epoch = JulianDate::from(days_to_mdhms(epoch_year, tle.epoch_day_of_year));

        ElementRecord {
            catalog_number: tle.catalog_number.clone(),
            classification: tle.classification,
            epoch_year,
            epoch_day_of_year: tle.epoch_day_of_year,
            epoch,
            b_star: tle.b_star,
            n_dot: tle.n_dot / (REV_PER_DAY * MINUTES_PER_DAY),
            n_ddot: tle.n_ddot / (REV_PER_DAY * MINUTES_PER_DAY * MINUTES_PER_DAY),
            inclination: tle.inclination * RADEG,
            right_ascension: tle.right_ascension * RADEG,
            eccentricity: tle.eccentricity,
            arg_of_perigee: tle.arg_of_perigee * RADEG,
            mean_anomaly: tle.mean_anomaly * RADEG,
            mean_motion: tle.mean_motion / REV_PER_DAY,
            element_set_number: tle.element_set_number,
            revolution_number: tle.revolution_number,
        }
    }
}

impl From<TwoLineElement> for ElementRecord {
    fn from(tle: TwoLineElement) -> Self {
        ElementRecord::from(&tle)
    }
}
