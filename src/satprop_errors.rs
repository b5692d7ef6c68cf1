use thiserror::Error;

use crate::tle::TleParseError;

/// Status latched by a [`crate::satellite::Satellite`] after initialization and after each
/// propagation call.
///
/// The variants are ordered by their legacy numeric code (0 to 8), so `None` compares lower
/// than every failure and `Unknown` higher than every other code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Sgp4Error {
    #[default]
    #[error("no error")]
    None = 0,
    #[error("mean elements out of range: eccentricity >= 1 or < -0.001, or semi-major axis < 0.95 earth radii")]
    MeanElements = 1,
    #[error("mean motion is less than or equal to zero")]
    NonPositiveMeanMotion = 2,
    #[error("perturbed eccentricity is outside [0, 1]")]
    PerturbedElements = 3,
    #[error("semi-latus rectum is less than zero")]
    NonPositiveSemiLatusRectum = 4,
    #[error("epoch elements are sub-orbital")]
    SubOrbitalOrEpoch = 5,
    #[error("satellite has decayed")]
    Decayed = 6,
    #[error("two-line element text could not be parsed")]
    InvalidTle = 7,
    #[error("unknown propagation error")]
    Unknown = 8,
}

impl Sgp4Error {
    /// Map a legacy numeric status code to its variant.
    ///
    /// Any code that is negative or past the last known code maps to [`Sgp4Error::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Sgp4Error::None,
            1 => Sgp4Error::MeanElements,
            2 => Sgp4Error::NonPositiveMeanMotion,
            3 => Sgp4Error::PerturbedElements,
            4 => Sgp4Error::NonPositiveSemiLatusRectum,
            5 => Sgp4Error::SubOrbitalOrEpoch,
            6 => Sgp4Error::Decayed,
            7 => Sgp4Error::InvalidTle,
            _ => Sgp4Error::Unknown,
        }
    }

    /// Numeric status code of this variant.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == Sgp4Error::None
    }

    /// Bridge the latched status to a `Result`, `None` being the only success.
    pub fn into_result(self) -> Result<(), Sgp4Error> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SatPropError {
    #[error("Invalid gravity model: {0}")]
    InvalidGravityModel(String),

    #[error("Invalid operation mode: {0}")]
    InvalidOpsMode(String),

    #[error("Unable to parse the two-line element set: {0}")]
    TleParsing(#[from] TleParseError),

    #[error("SGP4 propagation failed: {0}")]
    Propagation(Sgp4Error),
}

impl From<Sgp4Error> for SatPropError {
    fn from(err: Sgp4Error) -> Self {
        SatPropError::Propagation(err)
    }
}
