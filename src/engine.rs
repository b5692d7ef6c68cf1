//! Boundary with the SGP4 numerical engine.
//!
//! The engine itself comes from the `sgp4` crate. This module hides it behind
//! [`Sgp4Engine`], feeds it the constants of the selected [`GravityModel`] and translates its
//! failures into the [`Sgp4Error`] status codes.
use std::fmt;

use log::warn;
use nalgebra::Vector3;
use sgp4::{Constants, Geopotential, MinutesSinceEpoch, Orbit};

use crate::constants::Minutes;
use crate::elements::ElementRecord;
use crate::gravity::{GravityModel, OpsMode};
use crate::satprop_errors::Sgp4Error;

/// Position (km) and velocity (km/s) in the TEME frame, with the status of the computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EngineOutput {
    pub(crate) position: Vector3<f64>,
    pub(crate) velocity: Vector3<f64>,
    pub(crate) error: Sgp4Error,
}

/// Initialized propagation state of one satellite.
pub(crate) struct Sgp4Engine {
    constants: Constants,
    ops_mode: OpsMode,
    radius_earth_km: f64,
}

impl fmt::Debug for Sgp4Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sgp4Engine")
            .field("ops_mode", &self.ops_mode)
            .field("radius_earth_km", &self.radius_earth_km)
            .finish_non_exhaustive()
    }
}

fn geopotential(model: GravityModel) -> Geopotential {
    let constants = model.constants();
    Geopotential {
        ae: constants.radius_earth_km,
        ke: constants.xke,
        j2: constants.j2,
        j3: constants.j3,
        j4: constants.j4,
    }
}

/// Map a failure raised while propagating to its status code.
fn propagation_error(error: &sgp4::Error) -> Sgp4Error {
    match error {
        sgp4::Error::OutOfRangeEccentricity { .. } => Sgp4Error::MeanElements,
        sgp4::Error::OutOfRangePerturbedEccentricity { .. } => Sgp4Error::PerturbedElements,
        sgp4::Error::NegativeSemiLatusRectum { .. } => Sgp4Error::NonPositiveSemiLatusRectum,
    }
}

/// Log a failure raised while deriving the propagation constants.
fn initialization_error(catalog_number: &str, error: impl fmt::Debug) -> Sgp4Error {
    warn!("SGP4 initialization of {catalog_number} rejected the elements: {error:?}");
    Sgp4Error::Unknown
}

impl Sgp4Engine {
    /// Derive the propagation constants of a satellite from its mean elements.
    ///
    /// Arguments
    /// -----------------
    /// * `gravity_model` – Earth constants used by the engine.
    /// * `ops_mode` – AFSPC-compatible or improved propagation.
    /// * `record` – mean elements at epoch, in propagator units.
    ///
    /// Return
    /// ----------
    /// * The initialized engine, or the status code explaining why the elements were rejected.
    pub(crate) fn initialize(
        gravity_model: GravityModel,
        ops_mode: OpsMode,
        record: &ElementRecord,
    ) -> Result<Self, Sgp4Error> {
        if record.mean_motion.is_nan() || record.mean_motion <= 0.0 {
            return Err(Sgp4Error::NonPositiveMeanMotion);
        }
        if !(0.0..1.0).contains(&record.eccentricity) {
            return Err(Sgp4Error::MeanElements);
        }

        let orbit = Orbit::from_kozai_elements(
            &geopotential(gravity_model),
            record.inclination,
            record.right_ascension,
            record.eccentricity,
            record.arg_of_perigee,
            record.mean_anomaly,
            record.mean_motion,
        )
        .map_err(|error| initialization_error(&record.catalog_number, error))?;

        let epoch_to_sidereal_time: fn(f64) -> f64 = match ops_mode {
            OpsMode::Afspc => sgp4::afspc_epoch_to_sidereal_time,
            OpsMode::Improved => sgp4::iau_epoch_to_sidereal_time,
        };

        let constants = Constants::new(
            geopotential(gravity_model),
            epoch_to_sidereal_time,
            record.years_since_j2000(),
            record.b_star,
            orbit,
        )
        .map_err(|error| initialization_error(&record.catalog_number, error))?;

        Ok(Sgp4Engine {
            constants,
            ops_mode,
            radius_earth_km: gravity_model.radius_earth_km(),
        })
    }

    /// Propagate the satellite `minutes` after its element epoch.
    ///
    /// A radius below one Earth radius is reported as [`Sgp4Error::Decayed`] while the
    /// computed vectors are still returned.
    pub(crate) fn propagate(&self, minutes: Minutes) -> EngineOutput {
        let t = MinutesSinceEpoch(minutes);
        let prediction = match self.ops_mode {
            OpsMode::Afspc => self.constants.propagate_afspc_compatibility_mode(t),
            OpsMode::Improved => self.constants.propagate(t),
        };

        match prediction {
            Ok(prediction) => {
                let position = Vector3::from(prediction.position);
                let velocity = Vector3::from(prediction.velocity);

                let error = if !position.iter().chain(velocity.iter()).all(|x| x.is_finite()) {
                    Sgp4Error::Unknown
                } else if position.norm() / self.radius_earth_km < 1.0 {
                    Sgp4Error::Decayed
                } else {
                    Sgp4Error::None
                };

                EngineOutput {
                    position,
                    velocity,
                    error,
                }
            }
            Err(error) => EngineOutput {
                position: Vector3::zeros(),
                velocity: Vector3::zeros(),
                error: propagation_error(&error),
            },
        }
    }
}
