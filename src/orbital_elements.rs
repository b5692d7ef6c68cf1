use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, Radian, DPI};
use crate::gravity::GravityModel;
use crate::satellite::StateVector;

const SMALL: f64 = 1e-10;

/// Shape of an osculating orbit, deciding which angles are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitType {
    EllipticalInclined,
    EllipticalEquatorial,
    CircularInclined,
    CircularEquatorial,
}

/// Osculating classical orbital elements of a state vector.
///
/// Units:
/// * `semilatus_rectum`, `semimajor_axis`: km (`semimajor_axis` is infinite for a parabola)
/// * angles: radians, in `[0, 2π)`
///
/// Angles that are not defined for the [`OrbitType`] are `None`: the node of an equatorial
/// orbit, the perigee of a circular one, and the special longitudes outside the orbit type
/// they replace the classical angles for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassicalOrbitalElements {
    pub orbit_type: OrbitType,
    pub semilatus_rectum: Kilometer,
    pub semimajor_axis: Kilometer,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub raan: Option<Radian>,
    pub arg_of_perigee: Option<Radian>,
    pub true_anomaly: Option<Radian>,
    pub mean_anomaly: Option<Radian>,
    /// Circular inclined orbits
    pub arg_of_latitude: Option<Radian>,
    /// Circular equatorial orbits
    pub true_longitude: Option<Radian>,
    /// Elliptical equatorial orbits
    pub longitude_of_periapsis: Option<Radian>,
}

/// Angle between two vectors, undefined when either is null.
fn angle(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<Radian> {
    let magnitudes = a.norm() * b.norm();
    (magnitudes > SMALL * SMALL).then(|| (a.dot(b) / magnitudes).clamp(-1.0, 1.0).acos())
}

/// `acos` of a clamped cosine, flipped to `2π - x` when `negative`.
fn full_angle(cosine: f64, negative: bool) -> Radian {
    let value = cosine.clamp(-1.0, 1.0).acos();
    if negative {
        DPI - value
    } else {
        value
    }
}

/// Eccentric and mean anomaly from the true anomaly (Vallado `newtonnu`).
///
/// Return
/// ----------
/// * `(eccentric anomaly, mean anomaly)`, `None` when the true anomaly is outside the
///   range reachable by a hyperbolic or parabolic trajectory.
fn anomalies_from_true(eccentricity: f64, true_anomaly: Radian) -> Option<(Radian, Radian)> {
    const TOLERANCE: f64 = 1e-8;

    let (eccentric, mean) = if eccentricity.abs() < TOLERANCE {
        (true_anomaly, true_anomaly)
    } else if eccentricity < 1.0 - TOLERANCE {
        let denominator = 1.0 + eccentricity * true_anomaly.cos();
        let sine = (1.0 - eccentricity * eccentricity).sqrt() * true_anomaly.sin() / denominator;
        let cosine = (eccentricity + true_anomaly.cos()) / denominator;
        let eccentric = sine.atan2(cosine);
        (eccentric, eccentric - eccentricity * eccentric.sin())
    } else if eccentricity > 1.0 + TOLERANCE {
        if true_anomaly.abs() + 1e-5 >= PI - (1.0 / eccentricity).acos() {
            return None;
        }
        let sine = (eccentricity * eccentricity - 1.0).sqrt() * true_anomaly.sin()
            / (1.0 + eccentricity * true_anomaly.cos());
        let eccentric = sine.asinh();
        (eccentric, eccentricity * eccentric.sinh() - eccentric)
    } else {
        if true_anomaly.abs() >= 168.0_f64.to_radians() {
            return None;
        }
        let eccentric = (true_anomaly * 0.5).tan();
        (eccentric, eccentric + eccentric.powi(3) / 3.0)
    };

    if eccentricity < 1.0 {
        Some((eccentric % DPI, mean.rem_euclid(DPI)))
    } else {
        Some((eccentric, mean))
    }
}

impl ClassicalOrbitalElements {
    /// Recover the osculating elements of a state vector (Vallado `rv2coe`).
    ///
    /// Arguments
    /// -----------------
    /// * `state` – position (km) and velocity (km/s).
    /// * `gravity_model` – provides the gravitational parameter.
    ///
    /// Return
    /// ----------
    /// * The elements, or `None` when the angular momentum vanishes (rectilinear or null
    ///   state).
    pub fn from_state_vector(state: &StateVector, gravity_model: GravityModel) -> Option<Self> {
        let mu = gravity_model.mu();
        let r = &state.position;
        let v = &state.velocity;

        let magr = r.norm();
        let magv = v.norm();
        let h = r.cross(v);
        let magh = h.norm();
        if magh <= SMALL {
            return None;
        }

        let node = Vector3::new(-h.y, h.x, 0.0);
        let magn = node.norm();
        let rdotv = r.dot(v);
        let c1 = magv * magv - mu / magr;
        let e = (c1 * r - rdotv * v) / mu;
        let eccentricity = e.norm();

        let specific_energy = magv * magv * 0.5 - mu / magr;
        let semimajor_axis = if specific_energy.abs() > SMALL {
            -mu / (2.0 * specific_energy)
        } else {
            f64::INFINITY
        };
        let semilatus_rectum = magh * magh / mu;
        let inclination = (h.z / magh).clamp(-1.0, 1.0).acos();

        let equatorial = inclination < SMALL || (inclination - PI).abs() < SMALL;
        let orbit_type = match (eccentricity < SMALL, equatorial) {
            (true, true) => OrbitType::CircularEquatorial,
            (true, false) => OrbitType::CircularInclined,
            (false, true) => OrbitType::EllipticalEquatorial,
            (false, false) => OrbitType::EllipticalInclined,
        };
        let elliptical = matches!(
            orbit_type,
            OrbitType::EllipticalInclined | OrbitType::EllipticalEquatorial
        );
        let retrograde = inclination > FRAC_PI_2;

        let raan = (magn > SMALL).then(|| full_angle(node.x / magn, node.y < 0.0));

        let arg_of_perigee = if orbit_type == OrbitType::EllipticalInclined {
            angle(&node, &e).map(|w| if e.z < 0.0 { DPI - w } else { w })
        } else {
            None
        };

        let true_anomaly = if elliptical {
            angle(&e, r).map(|nu| if rdotv < 0.0 { DPI - nu } else { nu })
        } else {
            None
        };

        let arg_of_latitude = if orbit_type == OrbitType::CircularInclined {
            angle(&node, r).map(|u| if r.z < 0.0 { DPI - u } else { u })
        } else {
            None
        };

        let longitude_of_periapsis = if orbit_type == OrbitType::EllipticalEquatorial {
            let lon = full_angle(e.x / eccentricity, e.y < 0.0);
            Some(if retrograde { DPI - lon } else { lon })
        } else {
            None
        };

        let true_longitude = if orbit_type == OrbitType::CircularEquatorial && magr > SMALL {
            let lon = full_angle(r.x / magr, r.y < 0.0);
            Some(if retrograde { DPI - lon } else { lon })
        } else {
            None
        };

        let mean_anomaly = match orbit_type {
            OrbitType::CircularInclined => arg_of_latitude,
            OrbitType::CircularEquatorial => true_longitude,
            _ => true_anomaly
                .and_then(|nu| anomalies_from_true(eccentricity, nu))
                .map(|(_, mean)| mean),
        };

        Some(ClassicalOrbitalElements {
            orbit_type,
            semilatus_rectum,
            semimajor_axis,
            eccentricity,
            inclination,
            raan,
            arg_of_perigee,
            true_anomaly,
            mean_anomaly,
            arg_of_latitude,
            true_longitude,
            longitude_of_periapsis,
        })
    }
}

impl StateVector {
    /// Osculating classical elements of this state, see
    /// [`ClassicalOrbitalElements::from_state_vector`].
    pub fn classical_elements(&self, gravity_model: GravityModel) -> Option<ClassicalOrbitalElements> {
        ClassicalOrbitalElements::from_state_vector(self, gravity_model)
    }
}

#[cfg(test)]
mod orbital_elements_test {
    use super::*;
    use crate::time::JulianDate;
    use approx::assert_relative_eq;

    fn state(position: [f64; 3], velocity: [f64; 3]) -> StateVector {
        StateVector {
            epoch: JulianDate::default(),
            position: Vector3::from(position),
            velocity: Vector3::from(velocity),
        }
    }

    #[test]
    fn test_circular_equatorial() {
        let mu = GravityModel::Wgs72.mu();
        let speed = (mu / 7000.0).sqrt();
        let coe = state([7000.0, 0.0, 0.0], [0.0, speed, 0.0])
            .classical_elements(GravityModel::Wgs72)
            .unwrap();

        assert_eq!(coe.orbit_type, OrbitType::CircularEquatorial);
        assert_relative_eq!(coe.semimajor_axis, 7000.0, epsilon = 1e-6);
        assert_relative_eq!(coe.semilatus_rectum, 7000.0, epsilon = 1e-6);
        assert_relative_eq!(coe.inclination, 0.0, epsilon = 1e-12);
        assert_eq!(coe.raan, None);
        assert_eq!(coe.arg_of_perigee, None);
        assert_eq!(coe.true_anomaly, None);
        assert_relative_eq!(coe.true_longitude.unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(coe.mean_anomaly.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_elliptical_inclined() {
        // perigee on the x axis, orbit plane tilted 30 degrees about it
        let mu = GravityModel::Wgs84.mu();
        let (rp, ecc) = (7000.0, 0.1);
        let a = rp / (1.0 - ecc);
        let vp = (mu * (2.0 / rp - 1.0 / a)).sqrt();
        let incl = 30.0_f64.to_radians();
        let coe = state([rp, 0.0, 0.0], [0.0, vp * incl.cos(), vp * incl.sin()])
            .classical_elements(GravityModel::Wgs84)
            .unwrap();

        assert_eq!(coe.orbit_type, OrbitType::EllipticalInclined);
        assert_relative_eq!(coe.semimajor_axis, a, epsilon = 1e-6);
        assert_relative_eq!(coe.eccentricity, ecc, epsilon = 1e-9);
        assert_relative_eq!(coe.inclination, incl, epsilon = 1e-12);
        assert_relative_eq!(coe.raan.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(coe.arg_of_perigee.unwrap(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(coe.true_anomaly.unwrap(), 0.0, epsilon = 1e-6);
        assert_eq!(coe.arg_of_latitude, None);
    }

    #[test]
    fn test_degenerate() {
        assert!(state([7000.0, 0.0, 0.0], [1.0, 0.0, 0.0])
            .classical_elements(GravityModel::Wgs72)
            .is_none());
    }

    #[test]
    fn test_mean_from_true_anomaly() {
        let (eccentric, mean) = anomalies_from_true(0.1, FRAC_PI_2).unwrap();
        assert_relative_eq!(eccentric.cos(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(mean, eccentric - 0.1 * eccentric.sin(), epsilon = 1e-12);

        assert!(anomalies_from_true(2.0, 3.0).is_none());
    }
}
