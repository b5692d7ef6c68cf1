//! # Gravity models and propagation options
//!
//! SGP4 needs a small set of Earth constants (gravitational parameter, equatorial radius and
//! the first zonal harmonics). Three historical sets are in use:
//!
//! - `GravityModel::Wgs72Old` – the constants of the original 1980 Spacetrack report
//! - `GravityModel::Wgs72` – WGS-72 with a derived `xke` (default, what element sets are fitted with)
//! - `GravityModel::Wgs84` – WGS-84 values
//!
//! A model and an [`OpsMode`] form the [`SatelliteOptions`] given to a
//! [`Satellite`](crate::satellite::Satellite). All three types parse from short strings:
//!
//! ```rust
//! use satprop::gravity::{GravityModel, OpsMode, SatelliteOptions};
//!
//! let model: GravityModel = "wgs84".parse().unwrap();
//! assert_eq!(model, GravityModel::Wgs84);
//!
//! let options: SatelliteOptions = "wgs72old:afspc".parse().unwrap();
//! assert_eq!(options.gravity_model, GravityModel::Wgs72Old);
//! assert_eq!(options.ops_mode, OpsMode::Afspc);
//! ```
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::Kilometer;
use crate::satprop_errors::SatPropError;

/// Earth constants of one gravity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityConstants {
    /// Gravitational parameter (km³/s²)
    pub mu: f64,
    /// Equatorial radius
    pub radius_earth_km: Kilometer,
    /// `sqrt(mu)` in earth radii^1.5 per minute
    pub xke: f64,
    /// Minutes per time unit, `1 / xke`
    pub tumin: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j3_over_j2: f64,
}

impl GravityConstants {
    fn new(mu: f64, radius_earth_km: Kilometer, xke: f64, j2: f64, j3: f64, j4: f64) -> Self {
        GravityConstants {
            mu,
            radius_earth_km,
            xke,
            tumin: 1.0 / xke,
            j2,
            j3,
            j4,
            j3_over_j2: j3 / j2,
        }
    }
}

fn derived_xke(mu: f64, radius_earth_km: Kilometer) -> f64 {
    60.0 / (radius_earth_km.powi(3) / mu).sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GravityModel {
    Wgs72Old,
    #[default]
    Wgs72,
    Wgs84,
}

impl GravityModel {
    /// Constant set of this model.
    pub fn constants(self) -> GravityConstants {
        match self {
            GravityModel::Wgs72Old => GravityConstants::new(
                398_600.799_64,
                6_378.135,
                0.074_366_916_1,
                0.001_082_616,
                -0.000_002_538_81,
                -0.000_001_655_97,
            ),
            GravityModel::Wgs72 => {
                let (mu, radius) = (398_600.8, 6_378.135);
                GravityConstants::new(
                    mu,
                    radius,
                    derived_xke(mu, radius),
                    0.001_082_616,
                    -0.000_002_538_81,
                    -0.000_001_655_97,
                )
            }
            GravityModel::Wgs84 => {
                let (mu, radius) = (398_600.5, 6_378.137);
                GravityConstants::new(
                    mu,
                    radius,
                    derived_xke(mu, radius),
                    0.001_082_629_989_05,
                    -0.000_002_532_153_06,
                    -0.000_001_610_987_61,
                )
            }
        }
    }

    /// Gravitational parameter (km³/s²)
    pub fn mu(self) -> f64 {
        self.constants().mu
    }

    /// Equatorial radius (km)
    pub fn radius_earth_km(self) -> Kilometer {
        self.constants().radius_earth_km
    }
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GravityModel::Wgs72Old => "WGS72OLD",
            GravityModel::Wgs72 => "WGS72",
            GravityModel::Wgs84 => "WGS84",
        };
        f.write_str(name)
    }
}

/// Lower-case `s` with `-` and `_` removed, so `WGS-72_old` reads as `wgs72old`.
fn canonical(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for GravityModel {
    type Err = SatPropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "wgs72old" => Ok(GravityModel::Wgs72Old),
            "wgs72" => Ok(GravityModel::Wgs72),
            "wgs84" => Ok(GravityModel::Wgs84),
            _ => Err(SatPropError::InvalidGravityModel(s.to_string())),
        }
    }
}

impl TryFrom<&str> for GravityModel {
    type Error = SatPropError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Flavor of the propagation algorithm.
///
/// `Afspc` reproduces the historical Air Force Space Command behavior (legacy sidereal time
/// formula and angle handling), `Improved` uses the modern sidereal time and fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpsMode {
    Afspc,
    #[default]
    Improved,
}

impl fmt::Display for OpsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpsMode::Afspc => f.write_str("afspc"),
            OpsMode::Improved => f.write_str("improved"),
        }
    }
}

impl FromStr for OpsMode {
    type Err = SatPropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "a" | "afspc" => Ok(OpsMode::Afspc),
            "i" | "improved" => Ok(OpsMode::Improved),
            _ => Err(SatPropError::InvalidOpsMode(s.to_string())),
        }
    }
}

impl TryFrom<&str> for OpsMode {
    type Error = SatPropError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Construction-time configuration of a [`Satellite`](crate::satellite::Satellite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SatelliteOptions {
    pub gravity_model: GravityModel,
    pub ops_mode: OpsMode,
}

impl SatelliteOptions {
    pub fn new(gravity_model: GravityModel, ops_mode: OpsMode) -> Self {
        SatelliteOptions {
            gravity_model,
            ops_mode,
        }
    }
}

impl From<GravityModel> for SatelliteOptions {
    fn from(gravity_model: GravityModel) -> Self {
        SatelliteOptions {
            gravity_model,
            ops_mode: OpsMode::default(),
        }
    }
}

impl fmt::Display for SatelliteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.gravity_model, self.ops_mode)
    }
}

impl FromStr for SatelliteOptions {
    type Err = SatPropError;

    /// Parse a `"<gravity model>[:<ops mode>]"` descriptor, e.g. `"wgs84:afspc"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((model, mode)) => Ok(SatelliteOptions::new(model.parse()?, mode.parse()?)),
            None => Ok(SatelliteOptions::from(s.parse::<GravityModel>()?)),
        }
    }
}

#[cfg(test)]
mod gravity_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constants() {
        let wgs72 = GravityModel::Wgs72.constants();
        assert_relative_eq!(wgs72.xke, 0.07436691613317342, epsilon = 1e-12);
        assert_relative_eq!(wgs72.tumin * wgs72.xke, 1.0, epsilon = 1e-15);

        // the old set rounds xke
        let old = GravityModel::Wgs72Old.constants();
        assert_relative_eq!(old.xke, wgs72.xke, epsilon = 1e-9);
        assert_eq!(old.j2, wgs72.j2);

        let wgs84 = GravityModel::Wgs84.constants();
        assert_eq!(wgs84.radius_earth_km, 6378.137);
        assert_relative_eq!(wgs84.xke, 0.07436685316871385, epsilon = 1e-12);
        assert_relative_eq!(wgs84.j3_over_j2, wgs84.j3 / wgs84.j2);
    }

    #[test]
    fn test_default() {
        assert_eq!(GravityModel::default(), GravityModel::Wgs72);
        assert_eq!(
            SatelliteOptions::default(),
            SatelliteOptions::new(GravityModel::Wgs72, OpsMode::Improved)
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("WGS72".parse::<GravityModel>(), Ok(GravityModel::Wgs72));
        assert_eq!(
            GravityModel::try_from("wgs-72_old"),
            Ok(GravityModel::Wgs72Old)
        );
        assert_eq!(
            "egm96".parse::<GravityModel>(),
            Err(SatPropError::InvalidGravityModel("egm96".to_string()))
        );

        assert_eq!("a".parse::<OpsMode>(), Ok(OpsMode::Afspc));
        assert_eq!(OpsMode::try_from("Improved"), Ok(OpsMode::Improved));
        assert!(matches!(
            "x".parse::<OpsMode>(),
            Err(SatPropError::InvalidOpsMode(_))
        ));

        let options: SatelliteOptions = "wgs84".parse().unwrap();
        assert_eq!(options, SatelliteOptions::from(GravityModel::Wgs84));
        let options: SatelliteOptions = "wgs84:afspc".parse().unwrap();
        assert_eq!(options.ops_mode, OpsMode::Afspc);
        assert!("wgs84:fast".parse::<SatelliteOptions>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let options = SatelliteOptions::new(GravityModel::Wgs72Old, OpsMode::Afspc);
        assert_eq!(options.to_string(), "WGS72OLD:afspc");
        assert_eq!(options.to_string().parse::<SatelliteOptions>(), Ok(options));
    }
}
