//! # Ground observer
//!
//! This module provides the [`Observer`](crate::observers::Observer) type: a fixed site on
//! the Earth's surface given by geodetic latitude, longitude and elevation, together with
//! the geometry needed to turn "seen from the centre of the Earth" into "seen from here":
//!
//! - [`geodetic_to_parallax`](crate::observers::geodetic_to_parallax) converts geodetic
//!   latitude and height into the parallax constants (ρ·cosφ′, ρ·sinφ′) on the WGS84
//!   ellipsoid.
//! - [`Observer::local_sidereal_time`](crate::observers::Observer::local_sidereal_time)
//!   gives the local apparent sidereal time at an epoch.
//! - [`Observer::geocentric_position`](crate::observers::Observer::geocentric_position)
//!   gives the site's position vector in the equatorial frame of date, which a provider
//!   subtracts from a geocentric body position to obtain the topocentric one.
//!
//! ## Units
//!
//! - Latitude, longitude: **degrees** (north and east positive).
//! - Elevation: **meters** above the ellipsoid.
//! - Parallax constants: **Earth equatorial radii**.
//! - Position vectors: **kilometers**.
//!
//! ## Design & invariants
//!
//! - An [`Observer`] is immutable once constructed and is shared by reference across all
//!   evaluations of a search.
//! - `NotNan<f64>` forbids NaN in the stored geometry, so the type can be `Eq + Hash`.
//! - Sidereal time uses UTC in place of UT1 (see [`crate::time`]).
//!
//! ## Quick start
//!
//! ```rust
//! use hifitime::Epoch;
//! use syzygy::observers::Observer;
//!
//! let jakarta = Observer::new(-6.2088, 106.8456, 8.0, Some("Jakarta".into()))?;
//! let t = Epoch::from_gregorian_utc_at_midnight(2025, 9, 7);
//! let r = jakarta.geocentric_position(&t);
//! assert!((r.norm() - 6378.0).abs() < 25.0);
//! # Ok::<(), syzygy::syzygy_errors::SyzygyError>(())
//! ```

use hifitime::Epoch;
use nalgebra::Vector3;
use ordered_float::NotNan;

use crate::constants::{Degree, Meter, Radian, DPI, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS};
use crate::constants::EARTH_RADIUS_KM;
use crate::earth_orientation::equequ;
use crate::ref_system::{rotmt, Axis};
use crate::syzygy_errors::SyzygyError;
use crate::time::gmst;

/// A fixed observing site.
///
/// Units
/// -----
/// * `latitude`: geodetic latitude, degrees.
/// * `longitude`: degrees, east positive.
/// * `elevation`: meters above the WGS84 ellipsoid.
/// * `rho_cos_phi`, `rho_sin_phi`: Earth radii.
///
/// See also
/// ------------
/// * [`geodetic_to_parallax`] – Converts geodetic latitude/elevation to (ρ·cosφ′, ρ·sinφ′).
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Observer {
    /// Geodetic latitude in **degrees**, north positive.
    pub latitude: NotNan<f64>,

    /// Longitude in **degrees**, east positive.
    pub longitude: NotNan<f64>,

    /// Height above the ellipsoid in **meters**.
    pub elevation: NotNan<f64>,

    /// Optional human-readable site name.
    pub name: Option<String>,

    /// ρ·cosφ′ (geocentric latitude φ′), in **Earth radii**.
    pub rho_cos_phi: NotNan<f64>,

    /// ρ·sinφ′ (geocentric latitude φ′), in **Earth radii**.
    pub rho_sin_phi: NotNan<f64>,
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: Geodetic latitude in **degrees**, within `[-90, 90]`.
    /// * `longitude`: Longitude in **degrees** (east positive), within `[-360, 360]`.
    /// * `elevation`: Height above the reference ellipsoid in **meters**.
    /// * `name`: Optional site name.
    ///
    /// Return
    /// ----------
    /// * A constructed [`Observer`] with its parallax constants precomputed.
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::NanValue`] if any input is NaN.
    /// * [`SyzygyError::InvalidObserver`] if latitude or longitude is out of range, or
    ///   the elevation is not finite.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
        name: Option<String>,
    ) -> Result<Observer, SyzygyError> {
        let latitude = NotNan::new(latitude)?;
        let longitude = NotNan::new(longitude)?;
        let elevation = NotNan::new(elevation)?;

        if latitude.abs() > 90.0 {
            return Err(SyzygyError::InvalidObserver(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if longitude.abs() > 360.0 {
            return Err(SyzygyError::InvalidObserver(format!(
                "longitude {longitude} is outside [-360, 360]"
            )));
        }
        if !elevation.is_finite() {
            return Err(SyzygyError::InvalidObserver(format!(
                "elevation {elevation} is not finite"
            )));
        }

        let (rho_cos_phi, rho_sin_phi) =
            geodetic_to_parallax(latitude.into_inner(), elevation.into_inner());

        Ok(Observer {
            latitude,
            longitude,
            elevation,
            name,
            rho_cos_phi: NotNan::new(rho_cos_phi)?,
            rho_sin_phi: NotNan::new(rho_sin_phi)?,
        })
    }

    /// Geodetic latitude in radians.
    pub fn latitude_rad(&self) -> Radian {
        self.latitude.to_radians()
    }

    /// Position of the site in the Earth-fixed frame, kilometers.
    ///
    /// X points to the Greenwich meridian on the equator, Z to the north pole.
    pub fn body_fixed_coord(&self) -> Vector3<f64> {
        let (sin_lon, cos_lon) = self.longitude.to_radians().sin_cos();
        Vector3::new(
            EARTH_RADIUS_KM * self.rho_cos_phi.into_inner() * cos_lon,
            EARTH_RADIUS_KM * self.rho_cos_phi.into_inner() * sin_lon,
            EARTH_RADIUS_KM * self.rho_sin_phi.into_inner(),
        )
    }

    /// Greenwich apparent sidereal time at `epoch`, radians in `[0, 2π)`.
    ///
    /// GMST from [`gmst`] plus the equation of the equinoxes from [`equequ`].
    pub fn greenwich_sidereal_time(epoch: &Epoch) -> Radian {
        let gast = gmst(epoch.to_mjd_utc_days()) + equequ(epoch.to_mjd_tt_days());
        gast.rem_euclid(DPI)
    }

    /// Local apparent sidereal time at `epoch`, radians in `[0, 2π)`.
    pub fn local_sidereal_time(&self, epoch: &Epoch) -> Radian {
        (Observer::greenwich_sidereal_time(epoch) + self.longitude.to_radians()).rem_euclid(DPI)
    }

    /// Geocentric position of the site in the **equatorial frame of date**, kilometers.
    ///
    /// The Earth-fixed vector from [`Observer::body_fixed_coord`] is rotated about the polar
    /// axis by the Greenwich apparent sidereal time. Polar motion is neglected.
    ///
    /// See also
    /// ------------
    /// * [`crate::ephemeris::lunisolar::LunisolarEphemeris`] – subtracts this vector to
    ///   obtain topocentric positions.
    pub fn geocentric_position(&self, epoch: &Epoch) -> Vector3<f64> {
        let gast = Observer::greenwich_sidereal_time(epoch);
        rotmt(gast, Axis::Z) * self.body_fixed_coord()
    }
}

impl std::fmt::Display for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lat = self.latitude.into_inner();
        let lon = self.longitude.into_inner();
        let ns = if lat < 0.0 { 'S' } else { 'N' };
        let ew = if lon < 0.0 { 'W' } else { 'E' };
        if let Some(name) = self.name.as_deref() {
            write!(f, "{name} ")?;
        }
        write!(
            f,
            "({:.4}°{ns}, {:.4}°{ew}, {:.0} m)",
            lat.abs(),
            lon.abs(),
            self.elevation.into_inner()
        )
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates
/// on the Earth.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **radians**.
/// * `height` - Observer's altitude above the reference ellipsoid in **meters**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)` in units of the Earth's equatorial radius.
///
/// Details
/// -------
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
///
/// where `a` and `b` are the Earth's semi-major and semi-minor axes,
/// and `h` is the height above the ellipsoid.
pub fn lat_alt_to_parallax(lat: f64, height: f64) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Degree-based wrapper around [`lat_alt_to_parallax`].
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **degrees**.
/// * `height` - Observer's altitude above the reference ellipsoid in **meters**.
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}
