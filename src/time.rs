//! # Split Julian dates
//!
//! A [`JulianDate`] keeps a time instant as two real numbers, a `whole` part and a `frac`
//! part, so that instants a few minutes apart can be subtracted without losing the
//! sub-millisecond precision a single `f64` Julian date would throw away.
//!
//! ## Overview
//!
//! - Arithmetic with days only ever touches `frac`; the pair is folded back into canonical
//!   form by [`JulianDate::normalize`] (`whole` ends in `.5`, `0 ≤ frac < 1`).
//! - Differences and comparisons are computed as `(Δwhole) + (Δfrac)`, never on the raw sum.
//! - Calendar conversions follow the Vallado `jday` / `invjday` / `days2mdhms` algorithms,
//!   valid for the years 1901 to 2099.
//! - [`hifitime::Epoch`] interop is provided for callers living in that ecosystem.
//!
//! ## Example
//!
//! ```rust
//! use satprop::time::{DateTime, JulianDate};
//!
//! let t = JulianDate::from(DateTime::new(2022, 3, 14, 0, 31, 19.3));
//! let t2 = JulianDate::from(DateTime::new(2022, 3, 17, 15, 45, 19.3));
//! assert!(((t2 - t) - (3.0 + (15.0 + 14.0 / 60.0) / 24.0)).abs() < 1e-10);
//! ```
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use hifitime::{Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::constants::{JD_1900, SECONDS_PER_DAY};

/// Calendar time broken down into its UTC components.
///
/// Fields are not range checked: out-of-range values produce unspecified (but finite)
/// Julian dates, they never panic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DateTime {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: f64,
}

impl DateTime {
    pub fn new(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: f64) -> Self {
        DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:09.6}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Convert a day of the year into month, day, hour, minute and second.
///
/// The leap year rule is the simplified `year % 4 == 0`, exact between 1901 and 2099.
///
/// Arguments
/// -----------------
/// * `year` – the calendar year, used only for the length of February.
/// * `day_of_year` – the day of the year, starting at `1.0` for January 1st 00:00.
///
/// Return
/// ----------
/// * A [`DateTime`] whose `year` is the input year.
///
/// See also
/// ------------
/// * [`JulianDate::to_datetime`] – uses this routine once the year has been recovered.
pub fn days_to_mdhms(year: i32, day_of_year: f64) -> DateTime {
    let mut month_lengths = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if year % 4 == 0 {
        month_lengths[1] = 29;
    }

    let whole_day = day_of_year.floor() as i32;

    let mut month = 1;
    let mut elapsed = 0;
    while month < 12 && whole_day > elapsed + month_lengths[month as usize - 1] {
        elapsed += month_lengths[month as usize - 1];
        month += 1;
    }
    let day = whole_day - elapsed;

    let mut temp = (day_of_year - f64::from(whole_day)) * 24.0;
    let hour = temp.floor();
    temp = (temp - hour) * 60.0;
    let minute = temp.floor();
    let second = (temp - minute) * 60.0;

    DateTime {
        year,
        month,
        day,
        hour: hour as i32,
        minute: minute as i32,
        second,
    }
}

/// A Julian date stored as a `whole` + `frac` pair of days.
///
/// Equality and ordering are defined on the difference of two dates, so two pairs that denote
/// the same instant compare equal even when they are not normalized the same way.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct JulianDate {
    /// Integral-ish part, ending in `.5` once normalized (midnight convention)
    pub whole: f64,
    /// Fraction of a day, in `[0, 1)` once normalized
    pub frac: f64,
}

impl JulianDate {
    /// Build a date from a single Julian date value, the fraction being zero.
    pub fn new(jd: f64) -> Self {
        JulianDate {
            whole: jd,
            frac: 0.0,
        }
    }

    /// Build a date from an already split pair, without normalizing it.
    pub fn from_split(whole: f64, frac: f64) -> Self {
        JulianDate { whole, frac }
    }

    /// Convert a UTC calendar time to a Julian date (Vallado `jday`).
    ///
    /// The whole part is computed from the date alone and the time of day goes to `frac`,
    /// so the result is already normalized for any time of day below 24 h.
    ///
    /// Arguments
    /// -----------------
    /// * `dt` – calendar components, year between 1901 and 2099.
    ///
    /// Return
    /// ----------
    /// * The split Julian date of `dt`.
    pub fn from_datetime(dt: &DateTime) -> Self {
        let year = f64::from(dt.year);
        let month = f64::from(dt.month);

        let mut whole = 367.0 * year
            - ((7.0 * (year + ((month + 9.0) / 12.0).floor())) * 0.25).floor()
            + (275.0 * month / 9.0).floor()
            + f64::from(dt.day)
            + 1_721_013.5;

        let mut frac =
            (dt.second + f64::from(dt.minute) * 60.0 + f64::from(dt.hour) * 3600.0) / SECONDS_PER_DAY;

        if frac.abs() > 1.0 {
            let days = frac.floor();
            whole += days;
            frac -= days;
        }

        JulianDate { whole, frac }
    }

    /// Convert the date back to UTC calendar components (Vallado `invjday`).
    ///
    /// Any unnormalized input is folded first, so `whole` and `frac` may be arbitrary.
    ///
    /// Return
    /// ----------
    /// * The [`DateTime`] of this instant, exact to a few microseconds between 1901 and 2099.
    ///
    /// See also
    /// ------------
    /// * [`days_to_mdhms`] – day-of-year breakdown used for the final step.
    pub fn to_datetime(&self) -> DateTime {
        let mut whole = self.whole;
        let mut frac = self.frac;

        if frac.abs() >= 1.0 {
            let days = frac.floor();
            whole += days;
            frac -= days;
        }

        let shift = whole - whole.floor() - 0.5;
        if shift.abs() > 1e-8 {
            whole -= shift;
            frac += shift;
        }

        // year kept in f64, far-off dates saturate on the final cast
        let temp = whole - JD_1900;
        let mut year = 1900.0 + (temp / 365.25).floor();
        let days_before_year = |year: f64| {
            let leap_years = ((year - 1901.0) * 0.25).floor();
            (temp - ((year - 1900.0) * 365.0 + leap_years)).floor()
        };

        let mut days = days_before_year(year);
        if days + frac < 1.0 {
            year -= 1.0;
            days = days_before_year(year);
        }

        days_to_mdhms(year as i32, days + frac)
    }

    /// Fold the pair into canonical form: `whole - 0.5` integral and `0 ≤ frac < 1`.
    ///
    /// The represented instant does not change beyond floating rounding.
    pub fn normalize(&mut self) {
        let shift = self.whole - self.whole.floor() - 0.5;
        if shift.abs() > 1e-12 {
            self.whole -= shift;
            self.frac += shift;
        }

        if !(0.0..1.0).contains(&self.frac) {
            let days = self.frac.floor();
            self.whole += days;
            self.frac -= days;
            // a tiny negative fraction can round up to exactly one day
            if self.frac >= 1.0 {
                self.whole += 1.0;
                self.frac -= 1.0;
            }
        }
    }

    /// Normalized copy of this date, see [`JulianDate::normalize`].
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Single `f64` value of the date, with the precision loss that implies.
    pub fn value(&self) -> f64 {
        self.whole + self.frac
    }

    /// Signed difference `self - other` in days, keeping the split precision.
    pub fn days_since(&self, other: &JulianDate) -> f64 {
        (self.whole - other.whole) + (self.frac - other.frac)
    }

    /// Convert to a UTC [`hifitime::Epoch`].
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_jde_utc(self.whole) + Unit::Day * self.frac
    }

    /// Build a normalized date from a UTC [`hifitime::Epoch`].
    pub fn from_epoch(epoch: Epoch) -> Self {
        let whole = (epoch.to_jde_utc_days() - 0.5).floor() + 0.5;
        let frac = (epoch - Epoch::from_jde_utc(whole)).to_unit(Unit::Day);
        JulianDate { whole, frac }.normalized()
    }
}

impl From<f64> for JulianDate {
    fn from(jd: f64) -> Self {
        JulianDate::new(jd)
    }
}

impl From<DateTime> for JulianDate {
    fn from(dt: DateTime) -> Self {
        JulianDate::from_datetime(&dt)
    }
}

impl From<JulianDate> for DateTime {
    fn from(jd: JulianDate) -> Self {
        jd.to_datetime()
    }
}

impl From<Epoch> for JulianDate {
    fn from(epoch: Epoch) -> Self {
        JulianDate::from_epoch(epoch)
    }
}

impl From<JulianDate> for Epoch {
    fn from(jd: JulianDate) -> Self {
        jd.to_epoch()
    }
}

impl Add<f64> for JulianDate {
    type Output = JulianDate;

    fn add(self, days: f64) -> JulianDate {
        JulianDate {
            whole: self.whole,
            frac: self.frac + days,
        }
    }
}

impl AddAssign<f64> for JulianDate {
    fn add_assign(&mut self, days: f64) {
        self.frac += days;
    }
}

impl Sub<f64> for JulianDate {
    type Output = JulianDate;

    fn sub(self, days: f64) -> JulianDate {
        JulianDate {
            whole: self.whole,
            frac: self.frac - days,
        }
    }
}

impl SubAssign<f64> for JulianDate {
    fn sub_assign(&mut self, days: f64) {
        self.frac -= days;
    }
}

impl Sub<JulianDate> for JulianDate {
    type Output = f64;

    fn sub(self, other: JulianDate) -> f64 {
        self.days_since(&other)
    }
}

impl PartialEq for JulianDate {
    fn eq(&self, other: &Self) -> bool {
        self.days_since(other) == 0.0
    }
}

impl PartialOrd for JulianDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.days_since(other).partial_cmp(&0.0)
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {} + {:.12}", self.whole, self.frac)
    }
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    fn pi_day() -> DateTime {
        DateTime::new(2022, 3, 14, 0, 31, 19.3)
    }

    #[test]
    fn test_from_datetime() {
        let jd = JulianDate::from_datetime(&DateTime::new(2000, 1, 1, 12, 0, 0.0));
        assert_eq!(jd.whole, 2451544.5);
        assert_relative_eq!(jd.frac, 0.5);

        let jd = JulianDate::from(pi_day());
        assert_eq!(jd.whole, 2459652.5);
        assert_relative_eq!(
            jd.frac,
            (19.3 + 31.0 * 60.0) / SECONDS_PER_DAY,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_days_to_mdhms() {
        // 2022 is not a leap year: day 71 is March 12th
        let dt = days_to_mdhms(2022, 71.78032407);
        assert_eq!((dt.year, dt.month, dt.day), (2022, 3, 12));
        assert_eq!((dt.hour, dt.minute), (18, 43));
        assert_relative_eq!(dt.second, 40.0, epsilon = 1e-3);

        // 2020 is: day 71 is March 11th
        let dt = days_to_mdhms(2020, 71.5);
        assert_eq!((dt.month, dt.day, dt.hour), (3, 11, 12));

        let dt = days_to_mdhms(2021, 365.0);
        assert_eq!((dt.month, dt.day), (12, 31));
    }

    #[test]
    fn test_to_datetime() {
        let dt = JulianDate::from(pi_day()).to_datetime();
        assert_eq!(
            (dt.year, dt.month, dt.day, dt.hour, dt.minute),
            (2022, 3, 14, 0, 31)
        );
        assert_relative_eq!(dt.second, 19.3, epsilon = 1e-6);

        // same instant, stored unnormalized
        let dt = JulianDate::from_split(2459652.0, 0.5 + 1.0).to_datetime();
        assert_eq!((dt.year, dt.month, dt.day, dt.hour), (2022, 3, 15, 0));
    }

    #[test]
    fn test_to_datetime_far_dates() {
        // meaningless calendar values, but no overflow
        for jd in [-1e12, 1e12, f64::MAX, f64::MIN, f64::NAN] {
            let dt = JulianDate::new(jd).to_datetime();
            assert!((1..=12).contains(&dt.month), "{jd}: {dt:?}");
        }

        let dt = JulianDate::new(1e12).to_datetime();
        assert_eq!(dt.year, i32::MAX);
        let dt = JulianDate::new(-1e12).to_datetime();
        assert_eq!(dt.year, i32::MIN);
    }

    #[test]
    fn test_first_day_of_year() {
        let dt = JulianDate::from_datetime(&DateTime::new(2021, 1, 1, 0, 0, 0.0)).to_datetime();
        assert_eq!((dt.year, dt.month, dt.day, dt.hour, dt.minute), (2021, 1, 1, 0, 0));
        assert_relative_eq!(dt.second, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize() {
        let jd = JulianDate::from_split(2459652.2, 3.75).normalized();
        assert_eq!(jd.whole - 0.5, (jd.whole - 0.5).floor());
        assert!(0.0 <= jd.frac && jd.frac < 1.0);
        assert_relative_eq!(jd.whole + jd.frac, 2459652.2 + 3.75, epsilon = 1e-9);

        let jd = JulianDate::from_split(2459652.5, -0.25).normalized();
        assert_eq!(jd.whole, 2459651.5);
        assert_relative_eq!(jd.frac, 0.75);

        // noon: the half day moves into the fraction
        let mut jd = JulianDate::new(2459652.0);
        jd.normalize();
        assert_eq!(jd.whole, 2459651.5);
        assert_relative_eq!(jd.frac, 0.5);
    }

    #[test]
    fn test_arithmetic() {
        let t = JulianDate::from(pi_day());
        let t2 = JulianDate::from(DateTime::new(2022, 3, 17, 15, 45, 19.3));
        let expected = (17.0 - 14.0) + ((15.0 - 0.0) + (45.0 - 31.0) / 60.0) / 24.0;
        assert_relative_eq!(t2 - t, expected, epsilon = 1e-10);
        assert_relative_eq!(t - t2, -expected, epsilon = 1e-10);

        let t3 = t + expected;
        assert_eq!(t3.whole, t.whole);
        assert_relative_eq!(t3 - t2, 0.0, epsilon = 1e-10);

        let mut t4 = t2;
        t4 -= expected;
        assert_relative_eq!(t4 - t, 0.0, epsilon = 1e-10);
        t4 += 1.0;
        assert_relative_eq!(t4 - t, 1.0, epsilon = 1e-10);
        assert_relative_eq!((t2 - 1.0) - t, expected - 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_comparisons() {
        let t = JulianDate::from(pi_day());
        let later = t + 1e-6;
        assert!(later > t);
        assert!(t < later);
        assert!(t <= t);

        // same instant, different split
        let other = JulianDate::from_split(t.whole - 1.0, t.frac + 1.0);
        assert!(other == t);
        assert!(other >= t);
    }

    #[test]
    fn test_hifitime_interop() {
        let jd = JulianDate::from(pi_day());
        let epoch = jd.to_epoch();
        let back = JulianDate::from_epoch(epoch);
        assert_eq!(back.whole, jd.whole);
        assert_relative_eq!(back.frac, jd.frac, epsilon = 1e-9);
    }

    #[test]
    fn test_display() {
        let dt = DateTime::new(2022, 3, 12, 18, 43, 5.5);
        assert_eq!(dt.to_string(), "2022-03-12T18:43:05.500000");
        let jd = JulianDate::from_split(2459650.5, 0.25);
        assert_eq!(jd.to_string(), "JD 2459650.5 + 0.250000000000");
    }
}
