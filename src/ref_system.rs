//! Frame rotations and spherical ↔ cartesian helpers.
//!
//! Three frames are involved in an eclipse search, all "of date" (true equator, true
//! equinox and true ecliptic at the evaluation epoch):
//!
//! ```text
//! Ecliptic of date  --(rotation about X by ε)-->  Equatorial of date  --(hour angle, φ)-->  Horizontal
//! ```
//!
//! All vectors are in kilometers, all public angles in degrees.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Degree, Kilometer, Radian};

/// Rotation axis selector for [`rotmt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotation matrix of angle `alpha` around `axis`.
///
/// The rotation follows the **direct (positive/trigonometric)** sense and is applied to
/// the vector in a fixed frame (`x' = R · x`), not as a change of basis.
///
/// # Arguments
/// * `alpha` - Rotation angle in **radians**.
/// * `axis` - Axis of rotation.
///
/// # Returns
/// An orthonormal 3×3 matrix, `R.transpose() == R.inverse()`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Spherical coordinates (degrees, degrees, km) to a cartesian vector.
///
/// `lon` is measured in the XY plane from +X toward +Y, `lat` from the XY plane toward +Z.
pub fn spherical_to_cartesian(lon: Degree, lat: Degree, distance: Kilometer) -> Vector3<f64> {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    Vector3::new(
        distance * cos_lat * cos_lon,
        distance * cos_lat * sin_lon,
        distance * sin_lat,
    )
}

/// Reduce an angle in degrees to `[0, 360)`.
///
/// `rem_euclid` alone rounds tiny negative inputs up to exactly `360.0`; that case folds
/// back to `0.0`.
pub fn wrap_degrees(angle: Degree) -> Degree {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Cartesian vector to `(lon ∈ [0, 360), lat ∈ [−90, 90], distance)`.
pub fn cartesian_to_spherical(v: &Vector3<f64>) -> (Degree, Degree, Kilometer) {
    let distance = v.norm();
    if distance == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lon = wrap_degrees(v.y.atan2(v.x).to_degrees());
    let lat = (v.z / distance).clamp(-1.0, 1.0).asin().to_degrees();
    (lon, lat, distance)
}

/// Rotate an ecliptic-of-date vector into the equatorial frame of date.
///
/// Arguments
/// ---------
/// * `v`: cartesian vector in the ecliptic frame.
/// * `obliquity`: true obliquity of the ecliptic, radians.
pub fn ecliptic_to_equatorial(v: &Vector3<f64>, obliquity: Radian) -> Vector3<f64> {
    rotmt(obliquity, Axis::X) * v
}

/// Inverse of [`ecliptic_to_equatorial`].
pub fn equatorial_to_ecliptic(v: &Vector3<f64>, obliquity: Radian) -> Vector3<f64> {
    rotmt(-obliquity, Axis::X) * v
}

/// Convert a local hour angle and declination into horizontal coordinates.
///
/// Arguments
/// ---------
/// * `hour_angle`: local hour angle, radians (positive westward).
/// * `declination`: radians.
/// * `latitude`: geodetic latitude of the site, radians.
///
/// Returns
/// --------
/// * `(altitude, azimuth)` in degrees, azimuth measured from North through East in
///   `[0, 360)`. No atmospheric refraction is applied.
pub fn equatorial_to_horizontal(
    hour_angle: Radian,
    declination: Radian,
    latitude: Radian,
) -> (Degree, Degree) {
    let (sin_h, cos_h) = hour_angle.sin_cos();
    let (sin_d, cos_d) = declination.sin_cos();
    let (sin_p, cos_p) = latitude.sin_cos();

    let sin_alt = (sin_p * sin_d + cos_p * cos_d * cos_h).clamp(-1.0, 1.0);
    let altitude = sin_alt.asin();

    let azimuth = (-cos_d * sin_h).atan2(sin_d * cos_p - cos_d * sin_p * cos_h);

    (
        altitude.to_degrees(),
        wrap_degrees(azimuth.to_degrees()),
    )
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrap_degrees_stays_below_full_turn() {
        assert_eq!(wrap_degrees(-1e-15), 0.0);
        assert_eq!(wrap_degrees(-10.0), 350.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.5), 5.5);
        assert!(wrap_degrees(-f64::EPSILON) < 360.0);
    }

    #[test]
    fn rotation_is_orthonormal() {
        let r = rotmt(0.409, Axis::X);
        let identity = r * r.transpose();
        assert_abs_diff_eq!(identity, Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn spherical_roundtrip_keeps_longitude_in_range() {
        let v = spherical_to_cartesian(-10.0, 5.0, 1000.0);
        let (lon, lat, dist) = cartesian_to_spherical(&v);
        assert_abs_diff_eq!(lon, 350.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dist, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn ecliptic_pole_maps_to_obliquity_tilt() {
        let eps = 23.44_f64.to_radians();
        let pole = Vector3::new(0.0, 0.0, 1.0);
        let eq = ecliptic_to_equatorial(&pole, eps);
        let (_, dec, _) = cartesian_to_spherical(&eq);
        assert_abs_diff_eq!(dec, 90.0 - 23.44, epsilon = 1e-9);
        let back = equatorial_to_ecliptic(&eq, eps);
        assert_abs_diff_eq!(back, pole, epsilon = 1e-15);
    }

    #[test]
    fn summer_solstice_sun_declination() {
        // λ = 90°, β = 0 sits at δ = +ε
        let eps = 23.44_f64.to_radians();
        let v = ecliptic_to_equatorial(&spherical_to_cartesian(90.0, 0.0, 1.0), eps);
        let (ra, dec, _) = cartesian_to_spherical(&v);
        assert_abs_diff_eq!(ra, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, 23.44, epsilon = 1e-9);
    }

    #[test]
    fn meridian_transit_altitude() {
        // On the meridian, altitude = 90 − |φ − δ| and azimuth is due South when δ < φ
        let (alt, az) =
            equatorial_to_horizontal(0.0, 10.0_f64.to_radians(), 40.0_f64.to_radians());
        assert_abs_diff_eq!(alt, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(az, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn rising_object_is_in_the_east() {
        // negative hour angle: object east of the meridian
        let (_, az) =
            equatorial_to_horizontal(-1.5, 0.0, (-6.2_f64).to_radians());
        assert!(az > 0.0 && az < 180.0, "azimuth {az} should be eastward");
    }
}
