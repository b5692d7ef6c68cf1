//! # Two-Line Element Set Parser
//!
//! Parse the two 69-column text lines of a NORAD **two-line element set** (TLE) into a
//! [`TwoLineElement`] record, in the units the lines are written in (degrees, revolutions
//! per day).
//!
//! ## Overview
//! -----------------
//! Parsing runs four stages, and the first failing stage decides the error:
//!
//! 1. **Spacing** – the separator columns of both lines must hold a space
//!    ([`TleParseError::MalformedSpacing`]).
//! 2. **Format** – every field must scan with its fixed width
//!    ([`TleParseError::MalformedFormat`]). Lines shorter than 69 bytes fail here as well.
//! 3. **Values** – line numbers, classification, dates, exponents and angles must be in range
//!    and both lines must name the same catalog number ([`TleParseError::InvalidValue`]).
//! 4. **Checksums** – the modulo-10 checksum of each line must match its last digit
//!    ([`TleParseError::ChecksumMismatch`]).
//!
//! Bytes past column 69 are ignored.
//!
//! ## Legacy layouts
//! -----------------
//! Some publishers drop leading zeros, so the element set number (line 1) or the revolution
//! number (line 2) runs into the checksum column and the checksum fails to scan. When the
//! cursor already sits at the end of the line and the column before that field is blank,
//! the trailing digit is peeled off the number and used as the checksum.
//!
//! Exponent fields written without the leading decimal point of their mantissa are
//! interpreted with the implied `1e-5` scale folded into the exponent.
//!
//! ## Example
//! -----------------
//! ```rust
//! use satprop::tle::TwoLineElement;
//!
//! let tle = TwoLineElement::parse(
//!     "1 25544U 98067A   22071.78032407  .00021395  00000-0  39008-3 0  9996",
//!     "2 25544  51.6424  94.0370 0004047 256.5103  89.8846 15.49386383330227",
//! )
//! .unwrap();
//! assert_eq!(tle.catalog_number, "25544");
//! assert_eq!(tle.revolution_number, 33022);
//! ```
pub(crate) mod scanner;

use log::trace;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{Degree, TLE_CHECKSUM_SPAN, TLE_LINE_LEN};
use crate::satprop_errors::SatPropError;
use scanner::FieldScanner;

/// 1-based columns of line 1 that must hold a space
const LINE_1_SEPARATORS: [usize; 8] = [2, 9, 18, 33, 44, 53, 62, 64];

/// 1-based columns of line 2 that must hold a space
const LINE_2_SEPARATORS: [usize; 7] = [2, 8, 17, 26, 34, 43, 52];

/// Failure kinds of [`TwoLineElement::parse`], ordered by detection priority.
///
/// Variants
/// -----------------
/// * `MalformedSpacing` – a separator column holds something other than a space.
/// * `MalformedFormat` – a line is too short or a field could not be scanned.
/// * `InvalidValue` – a field scanned but is out of range.
/// * `ChecksumMismatch` – a line checksum does not match its content.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TleParseError {
    #[error("a separator column does not hold a space")]
    MalformedSpacing,
    #[error("a field does not follow the fixed-column layout")]
    MalformedFormat,
    #[error("a field is out of its allowed range")]
    InvalidValue,
    #[error("a line checksum does not match its content")]
    ChecksumMismatch,
}

/// Parsed content of a two-line element set, in the units of the text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TwoLineElement {
    // line 1
    /// Satellite catalog number, as text (up to 5 characters)
    pub catalog_number: String,
    /// `U` (unclassified), `C` (classified) or `S` (secret)
    pub classification: char,
    /// Last two digits of the launch year
    pub launch_year: u32,
    /// Launch number of the year
    pub launch_number: u32,
    /// Piece of the launch, up to 3 characters
    pub launch_piece: String,
    /// Last two digits of the epoch year
    pub epoch_year: u32,
    /// Day of the year and fraction of the day, starting at 1.0
    pub epoch_day_of_year: f64,
    /// First derivative of the mean motion divided by two (rev/day²)
    pub n_dot: f64,
    /// Second derivative of the mean motion divided by six (rev/day³)
    pub n_ddot: f64,
    /// B* drag term (inverse earth radii)
    pub b_star: f64,
    /// Always zero in distributed data
    pub ephemeris_type: u8,
    pub element_set_number: u32,
    pub line_1_checksum: u8,

    // line 2
    pub inclination: Degree,
    pub right_ascension: Degree,
    pub eccentricity: f64,
    pub arg_of_perigee: Degree,
    pub mean_anomaly: Degree,
    /// Revolutions per day
    pub mean_motion: f64,
    /// Revolution number at epoch
    pub revolution_number: u64,
    pub line_2_checksum: u8,
}

struct Line1Fields {
    line_number: u8,
    catalog_number: String,
    classification: u8,
    launch_year: u32,
    launch_number: u32,
    launch_piece: String,
    epoch_year: u32,
    epoch_day_of_year: f64,
    n_dot: f64,
    n_ddot_mantissa: f64,
    n_ddot_exponent: i32,
    b_star_mantissa: f64,
    b_star_exponent: i32,
    ephemeris_type: u8,
    element_set_number: u32,
    checksum: u8,
}

struct Line2Fields {
    line_number: u8,
    catalog_number: String,
    inclination: f64,
    right_ascension: f64,
    eccentricity_digits: u64,
    arg_of_perigee: f64,
    mean_anomaly: f64,
    mean_motion: f64,
    revolution_number: u64,
    checksum: u8,
}

/// Modulo-10 checksum of an element line: the sum of its digits plus one per minus sign,
/// over the first 68 columns.
///
/// Arguments
/// -----------------
/// * `line` – an element line; only its first 68 bytes are read.
///
/// Return
/// ----------
/// * The checksum digit, between 0 and 9.
pub fn checksum(line: &str) -> u8 {
    line_checksum(line.as_bytes())
}

fn line_checksum(line: &[u8]) -> u8 {
    let sum: u32 = line
        .iter()
        .take(TLE_CHECKSUM_SPAN)
        .map(|&byte| match byte {
            b'0'..=b'9' => u32::from(byte - b'0'),
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

fn has_separators(line: &[u8], columns: &[usize]) -> bool {
    columns.iter().all(|&column| line[column - 1] == b' ')
}

fn byte_at(line: &[u8], index: usize) -> u8 {
    line.get(index).copied().unwrap_or(0)
}

/// Extract a field the scanner is known to have read, by count.
fn scanned<T>(field: Option<T>) -> Result<T, TleParseError> {
    field.ok_or(TleParseError::MalformedFormat)
}

fn scan_line_1(line: &[u8]) -> Result<Line1Fields, TleParseError> {
    let mut scanner = FieldScanner::new(line);

    let line_number = scanner.unsigned(1);
    let catalog_number = scanner.word(5);
    let classification = scanner.byte();
    let launch_year = scanner.unsigned(2);
    let launch_number = scanner.unsigned(3);
    let launch_piece = scanner.word(3);
    let epoch_year = scanner.unsigned(2);
    let epoch_day_of_year = scanner.real(12);
    let n_dot = scanner.real(10);
    let n_ddot_mantissa = scanner.real(6);
    let n_ddot_exponent = scanner.signed(2);
    let b_star_mantissa = scanner.real(6);
    let b_star_exponent = scanner.signed(2);
    let ephemeris_type = scanner.unsigned(1);
    let mut element_set_number = scanner.unsigned(4);
    let end = scanner.position();
    let mut checksum = scanner.unsigned(1).map(|digit| digit as u8);
    let mut count = scanner.scanned();

    if count == 15 && end.is_some_and(|end| end >= TLE_LINE_LEN) && byte_at(line, 64) == b' ' {
        element_set_number = element_set_number.map(|number| number / 10);
        checksum = Some(byte_at(line, 68).wrapping_sub(b'0'));
        count += 1;
    }

    if count != 16 {
        trace!("line 1 scanned {count} of 16 fields");
        return Err(TleParseError::MalformedFormat);
    }

    let mut n_ddot_exponent = scanned(n_ddot_exponent)? as i32;
    if byte_at(line, 44) != b'.' {
        n_ddot_exponent -= 5;
    }
    let mut b_star_exponent = scanned(b_star_exponent)? as i32;
    if byte_at(line, 53) != b'.' {
        b_star_exponent -= 5;
    }

    Ok(Line1Fields {
        line_number: scanned(line_number)? as u8,
        catalog_number: scanned(catalog_number)?,
        classification: scanned(classification)?,
        launch_year: scanned(launch_year)? as u32,
        launch_number: scanned(launch_number)? as u32,
        launch_piece: scanned(launch_piece)?,
        epoch_year: scanned(epoch_year)? as u32,
        epoch_day_of_year: scanned(epoch_day_of_year)?,
        n_dot: scanned(n_dot)?,
        n_ddot_mantissa: scanned(n_ddot_mantissa)?,
        n_ddot_exponent,
        b_star_mantissa: scanned(b_star_mantissa)?,
        b_star_exponent,
        ephemeris_type: scanned(ephemeris_type)? as u8,
        element_set_number: scanned(element_set_number)? as u32,
        checksum: scanned(checksum)?,
    })
}

fn scan_line_2(line: &[u8]) -> Result<Line2Fields, TleParseError> {
    let mut scanner = FieldScanner::new(line);

    // an 11-wide mean motion leaves no blank before the revolution number
    let mean_motion_width = if byte_at(line, 52) != b' ' { 11 } else { 10 };

    let line_number = scanner.unsigned(1);
    let catalog_number = scanner.word(5);
    let inclination = scanner.real(8);
    let right_ascension = scanner.real(8);
    let eccentricity_digits = scanner.unsigned(7);
    let arg_of_perigee = scanner.real(8);
    let mean_anomaly = scanner.real(8);
    let mean_motion = scanner.real(mean_motion_width);
    let mut revolution_number = scanner.unsigned(5);
    let end = scanner.position();
    let mut checksum = scanner.unsigned(1).map(|digit| digit as u8);
    let mut count = scanner.scanned();

    if count == 9 && end.is_some_and(|end| end >= TLE_LINE_LEN) && byte_at(line, 63) == b' ' {
        revolution_number = revolution_number.map(|number| number / 10);
        checksum = Some(byte_at(line, 68).wrapping_sub(b'0'));
        count += 1;
    }

    if count != 10 {
        trace!("line 2 scanned {count} of 10 fields");
        return Err(TleParseError::MalformedFormat);
    }

    Ok(Line2Fields {
        line_number: scanned(line_number)? as u8,
        catalog_number: scanned(catalog_number)?,
        inclination: scanned(inclination)?,
        right_ascension: scanned(right_ascension)?,
        eccentricity_digits: scanned(eccentricity_digits)?,
        arg_of_perigee: scanned(arg_of_perigee)?,
        mean_anomaly: scanned(mean_anomaly)?,
        mean_motion: scanned(mean_motion)?,
        revolution_number: scanned(revolution_number)?,
        checksum: scanned(checksum)?,
    })
}

fn values_in_range(line_1: &Line1Fields, line_2: &Line2Fields) -> bool {
    let angle = 0.0..=360.0;
    let exponent = -14..=9;

    line_1.line_number == 1
        && matches!(line_1.classification, b'U' | b'C' | b'S')
        && line_1.launch_year < 100
        && line_1.epoch_year < 100
        && (1.0..=366.0).contains(&line_1.epoch_day_of_year)
        && exponent.contains(&line_1.n_ddot_exponent)
        && exponent.contains(&line_1.b_star_exponent)
        && line_1.ephemeris_type == 0
        && line_1.element_set_number < 10_000
        && line_2.line_number == 2
        && line_1.catalog_number == line_2.catalog_number
        && (0.0..=180.0).contains(&line_2.inclination)
        && angle.contains(&line_2.right_ascension)
        && angle.contains(&line_2.arg_of_perigee)
        && angle.contains(&line_2.mean_anomaly)
}

impl TwoLineElement {
    /// Parse a two-line element set.
    ///
    /// Arguments
    /// -----------------
    /// * `line_1` – first line, at least 69 bytes; anything past column 69 is ignored.
    /// * `line_2` – second line, same constraints.
    ///
    /// Return
    /// ----------
    /// * The parsed record, or the [`TleParseError`] of the first failing stage. A partially
    ///   parsed record is never returned.
    ///
    /// See also
    /// ------------
    /// * [`checksum`] – the per-line checksum verified in the last stage.
    pub fn parse(line_1: &str, line_2: &str) -> Result<Self, TleParseError> {
        let (Some(line_1), Some(line_2)) = (
            line_1.as_bytes().get(..TLE_LINE_LEN),
            line_2.as_bytes().get(..TLE_LINE_LEN),
        ) else {
            trace!("element lines shorter than {TLE_LINE_LEN} bytes");
            return Err(TleParseError::MalformedFormat);
        };

        if !has_separators(line_1, &LINE_1_SEPARATORS)
            || !has_separators(line_2, &LINE_2_SEPARATORS)
        {
            return Err(TleParseError::MalformedSpacing);
        }

        let fields_1 = scan_line_1(line_1);
        let fields_2 = scan_line_2(line_2);
        let (fields_1, fields_2) = (fields_1?, fields_2?);

        if !values_in_range(&fields_1, &fields_2) {
            return Err(TleParseError::InvalidValue);
        }

        if line_checksum(line_1) != fields_1.checksum || line_checksum(line_2) != fields_2.checksum
        {
            return Err(TleParseError::ChecksumMismatch);
        }

        Ok(TwoLineElement {
            catalog_number: fields_1.catalog_number,
            classification: char::from(fields_1.classification),
            launch_year: fields_1.launch_year,
            launch_number: fields_1.launch_number,
            launch_piece: fields_1.launch_piece,
            epoch_year: fields_1.epoch_year,
            epoch_day_of_year: fields_1.epoch_day_of_year,
            n_dot: fields_1.n_dot,
            n_ddot: fields_1.n_ddot_mantissa * 10f64.powf(f64::from(fields_1.n_ddot_exponent)),
            b_star: fields_1.b_star_mantissa * 10f64.powf(f64::from(fields_1.b_star_exponent)),
            ephemeris_type: fields_1.ephemeris_type,
            element_set_number: fields_1.element_set_number,
            line_1_checksum: fields_1.checksum,
            inclination: fields_2.inclination,
            right_ascension: fields_2.right_ascension,
            eccentricity: fields_2.eccentricity_digits as f64 / 1.0e7,
            arg_of_perigee: fields_2.arg_of_perigee,
            mean_anomaly: fields_2.mean_anomaly,
            mean_motion: fields_2.mean_motion,
            revolution_number: fields_2.revolution_number,
            line_2_checksum: fields_2.checksum,
        })
    }
}

impl FromStr for TwoLineElement {
    type Err = SatPropError;

    /// Parse the first two non-empty lines of `s` as an element set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().filter(|line| !line.trim().is_empty());
        let line_1 = lines.next().unwrap_or_default();
        let line_2 = lines.next().unwrap_or_default();
        Ok(TwoLineElement::parse(line_1, line_2)?)
    }
}

impl TryFrom<&str> for TwoLineElement {
    type Error = SatPropError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
