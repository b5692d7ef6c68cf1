//! # Satellite propagation facade
//!
//! A [`Satellite`] owns the mean elements of one object, the initialized SGP4 state and the
//! status of the last operation. Propagation never fails loudly: each call returns a
//! [`StateVector`] together with the [`Sgp4Error`] it latched, and the latch can be read
//! back at any time through [`Satellite::last_error`].
//!
//! ## Overview
//! -----------------
//! - Build from a parsed [`TwoLineElement`] ([`Satellite::from_elements`]), a pre-built
//!   [`ElementRecord`] ([`Satellite::from_element_record`]) or raw TLE text
//!   ([`Satellite::from_tle`], [`Satellite::try_from_tle`]).
//! - Propagate by minutes since the element epoch ([`Satellite::propagate_from_epoch`]) or
//!   to an absolute split Julian date ([`Satellite::propagate`]).
//! - Positions are in km and velocities in km/s, in the TEME frame of the element set.
//!
//! Invalid text does not abort construction: the satellite is created with
//! [`Sgp4Error::InvalidTle`] latched, and every propagation returns a zeroed state with
//! that same status.
//!
//! ## Example
//! -----------------
//! ```rust
//! use satprop::gravity::GravityModel;
//! use satprop::satellite::Satellite;
//! use satprop::satprop_errors::Sgp4Error;
//!
//! let mut sat = Satellite::from_tle(
//!     "1 25544U 98067A   22071.78032407  .00021395  00000-0  39008-3 0  9996",
//!     "2 25544  51.6424  94.0370 0004047 256.5103  89.8846 15.49386383330227",
//!     GravityModel::Wgs72,
//! );
//! assert_eq!(sat.last_error(), Sgp4Error::None);
//!
//! let (state, error) = sat.propagate_from_epoch(90.0);
//! assert_eq!(error, Sgp4Error::None);
//! assert!(state.position.norm() > 6700.0);
//! ```
use std::fmt;

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Minutes, MINUTES_PER_DAY, TLE_LINE_LEN};
use crate::elements::ElementRecord;
use crate::engine::Sgp4Engine;
use crate::gravity::{GravityModel, SatelliteOptions};
use crate::satprop_errors::{SatPropError, Sgp4Error};
use crate::time::JulianDate;
use crate::tle::TwoLineElement;

/// Position and velocity of a satellite at an instant, in the TEME frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateVector {
    pub epoch: JulianDate,
    /// km
    pub position: Vector3<f64>,
    /// km/s
    pub velocity: Vector3<f64>,
}

impl StateVector {
    fn zeroed(epoch: JulianDate) -> Self {
        StateVector {
            epoch,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} r = [{:.6}, {:.6}, {:.6}] km v = [{:.9}, {:.9}, {:.9}] km/s",
            self.epoch,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z
        )
    }
}

#[derive(Debug)]
pub struct Satellite {
    record: ElementRecord,
    options: SatelliteOptions,
    engine: Option<Sgp4Engine>,
    last_error: Sgp4Error,
}

impl Satellite {
    /// Initialize a satellite from mean elements already converted to propagator units.
    ///
    /// The engine is probed once at the element epoch and the resulting status is latched,
    /// so elements that decay or diverge immediately are reported before any propagation.
    ///
    /// Arguments
    /// -----------------
    /// * `record` – mean elements at epoch.
    /// * `options` – gravity model and operation mode.
    ///
    /// Return
    /// ----------
    /// * The satellite, with [`Satellite::last_error`] telling whether it is usable.
    pub fn from_element_record(record: ElementRecord, options: SatelliteOptions) -> Self {
        match Sgp4Engine::initialize(options.gravity_model, options.ops_mode, &record) {
            Ok(engine) => {
                let status = engine.propagate(0.0).error;
                if status.is_ok() {
                    debug!(
                        "initialized satellite {} ({options}) at {}",
                        record.catalog_number, record.epoch
                    );
                } else {
                    warn!(
                        "satellite {} latched '{status}' at its epoch",
                        record.catalog_number
                    );
                }
                Satellite {
                    record,
                    options,
                    engine: Some(engine),
                    last_error: status,
                }
            }
            Err(error) => {
                warn!(
                    "SGP4 initialization of satellite {} failed: {error}",
                    record.catalog_number
                );
                Satellite {
                    record,
                    options,
                    engine: None,
                    last_error: error,
                }
            }
        }
    }

    /// Initialize a satellite from a parsed element set and a gravity model.
    pub fn from_elements(tle: &TwoLineElement, gravity_model: GravityModel) -> Self {
        Satellite::with_options(tle, SatelliteOptions::from(gravity_model))
    }

    /// Initialize a satellite from a parsed element set with explicit options.
    pub fn with_options(tle: &TwoLineElement, options: SatelliteOptions) -> Self {
        Satellite::from_element_record(ElementRecord::from(tle), options)
    }

    fn invalid(options: SatelliteOptions) -> Self {
        Satellite {
            record: ElementRecord::default(),
            options,
            engine: None,
            last_error: Sgp4Error::InvalidTle,
        }
    }

    /// Initialize a satellite from the two lines of an element set.
    ///
    /// Text that is too short or does not parse yields a satellite with
    /// [`Sgp4Error::InvalidTle`] latched instead of an error.
    ///
    /// Arguments
    /// -----------------
    /// * `line_1`, `line_2` – the element lines, at least 69 bytes each.
    /// * `gravity_model` – Earth constants used by the engine.
    ///
    /// See also
    /// ------------
    /// * [`Satellite::try_from_tle`] – same construction, reporting parse failures as errors.
    pub fn from_tle(line_1: &str, line_2: &str, gravity_model: GravityModel) -> Self {
        let options = SatelliteOptions::from(gravity_model);
        if line_1.len() < TLE_LINE_LEN || line_2.len() < TLE_LINE_LEN {
            warn!("element lines are shorter than {TLE_LINE_LEN} bytes");
            return Satellite::invalid(options);
        }

        match TwoLineElement::parse(line_1, line_2) {
            Ok(tle) => Satellite::with_options(&tle, options),
            Err(error) => {
                warn!("rejected element set: {error}");
                Satellite::invalid(options)
            }
        }
    }

    /// Initialize a satellite from the two lines of an element set, surfacing parse errors.
    ///
    /// Only text errors are returned; an engine failure is latched in the satellite as
    /// with the other constructors.
    pub fn try_from_tle(
        line_1: &str,
        line_2: &str,
        options: SatelliteOptions,
    ) -> Result<Self, SatPropError> {
        let tle = TwoLineElement::parse(line_1, line_2)?;
        Ok(Satellite::with_options(&tle, options))
    }

    /// Element epoch as a split Julian date.
    pub fn epoch(&self) -> JulianDate {
        self.record.epoch
    }

    /// Status latched by the last initialization or propagation.
    pub fn last_error(&self) -> Sgp4Error {
        self.last_error
    }

    pub fn element_record(&self) -> &ElementRecord {
        &self.record
    }

    pub fn options(&self) -> SatelliteOptions {
        self.options
    }

    /// Propagate to a number of minutes after the element epoch.
    ///
    /// Arguments
    /// -----------------
    /// * `minutes` – time since the element epoch, negative values propagate backwards.
    ///
    /// Return
    /// ----------
    /// * The state vector, stamped `epoch() + minutes / 1440`, and the status latched by this
    ///   call. Without an initialized engine the state is zeroed and the initialization
    ///   status is returned unchanged.
    pub fn propagate_from_epoch(&mut self, minutes: Minutes) -> (StateVector, Sgp4Error) {
        let epoch = self.record.epoch + minutes / MINUTES_PER_DAY;

        let Some(engine) = &self.engine else {
            return (StateVector::zeroed(epoch), self.last_error);
        };

        let output = engine.propagate(minutes);
        if !output.error.is_ok() && output.error != self.last_error {
            debug!(
                "satellite {} latched '{}' at {minutes} min",
                self.record.catalog_number, output.error
            );
        }
        self.last_error = output.error;

        (
            StateVector {
                epoch,
                position: output.position,
                velocity: output.velocity,
            },
            output.error,
        )
    }

    /// Propagate to an absolute instant.
    ///
    /// The offset from the element epoch is computed on the split representation, so
    /// nearby instants keep sub-millisecond resolution.
    ///
    /// Return
    /// ----------
    /// * The state vector stamped with `jd` exactly, and the status latched by this call.
    pub fn propagate(&mut self, jd: JulianDate) -> (StateVector, Sgp4Error) {
        let minutes = (jd - self.record.epoch) * MINUTES_PER_DAY;
        let (mut state, error) = self.propagate_from_epoch(minutes);
        state.epoch = jd;
        (state, error)
    }
}
