#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::Vector3;

/// ISS element set pulled around 2022-03-12
pub const ISS_TLE_1: &str =
    "1 25544U 98067A   22071.78032407  .00021395  00000-0  39008-3 0  9996";
pub const ISS_TLE_2: &str =
    "2 25544  51.6424  94.0370 0004047 256.5103  89.8846 15.49386383330227";

/// Same object with a two-letter launch piece, a short mean motion and no leading zeros
pub const ALT_TLE_1: &str =
    "1 25544U 98067 BA 22071.78032407  .00021395 .00000-0 .39008-3 0 39999";
pub const ALT_TLE_2: &str =
    "2 25544  51.6424  94.0370 0004047 256.5103  89.8846  5.49386383 30223";

/// Vallado verification set: an 11-wide mean motion and a full revolution number
pub const VANGUARD_TLE_1: &str =
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
pub const VANGUARD_TLE_2: &str =
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

/// Vallado verification set: deep space, decaying mean motion
pub const DEEP_SPACE_TLE_1: &str =
    "1 04632U 70093B   04031.91070959 -.00000084  00000-0  10000-3 0  9955";
pub const DEEP_SPACE_TLE_2: &str =
    "2 04632  11.4628 273.1101 1450506 207.6000 143.9350  1.20231981 44145";

/// Vallado verification set: near-parabolic orbit with short element set and revolution numbers
pub const MOLNIYA_LIKE_TLE_1: &str =
    "1 23333U 94071A   94305.49999999 -.00172956  26967-3  10000-3 0    15";
pub const MOLNIYA_LIKE_TLE_2: &str =
    "2 23333  28.7490   2.3720 9728298  30.4360   1.3500  0.07309491    70";

/// Scalar comparison with an absolute floor of `epsilon * scale` and a relative
/// tolerance of `epsilon`.
pub fn assert_close(actual: f64, expected: f64, epsilon: f64, scale: f64) {
    assert_relative_eq!(
        actual,
        expected,
        epsilon = epsilon * scale,
        max_relative = epsilon
    );
}

/// Component-wise [`assert_close`].
pub fn assert_vec_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64, scale: f64) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_close(*a, *e, epsilon, scale);
    }
}
