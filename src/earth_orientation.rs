use crate::constants::{ArcSec, Radian, DAYS_PER_CENTURY, MJD, RADEG, RADSEC, T2000};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// This function returns the mean obliquity angle ε, defined as the angle between
/// the Earth's equator and the ecliptic plane, using the standard IAU 1976 polynomial model.
/// The result is expressed in radians and is valid for dates within a few millennia
/// of the J2000 epoch.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³,   T = (tjm - T2000) / 36525
/// ```
/// with the coefficients given in arcseconds, evaluated with Horner's scheme.
///
/// # See also
/// * [`true_obliquity`] – adds the nutation in obliquity.
/// * [`crate::ref_system::ecliptic_to_equatorial`] – consumes the obliquity.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity, both in arcseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    /// Δψ, nutation in longitude \[arcsec\]
    pub dpsi: ArcSec,
    /// Δε, nutation in obliquity \[arcsec\]
    pub deps: ArcSec,
}

/// Short nutation series (four leading terms of the IAU 1980 theory).
///
/// Only the terms driven by the lunar node Ω and the mean longitudes of the Sun (L)
/// and the Moon (L′) are kept:
///
/// ```text
/// Δψ = −17.20″ sin Ω − 1.32″ sin 2L − 0.23″ sin 2L′ + 0.21″ sin 2Ω
/// Δε =  +9.20″ cos Ω + 0.57″ cos 2L + 0.10″ cos 2L′ − 0.09″ cos 2Ω
/// ```
///
/// Accuracy is about 0.5″ in Δψ and 0.1″ in Δε, far below the tolerances an eclipse
/// condition search works with. The same Δψ is added to every body's longitude, so it
/// cancels in a longitude separation anyway.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
pub fn nutation(tjm: MJD) -> Nutation {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    let omega = (125.04452 - 1934.136261 * t) * RADEG;
    let l_sun = (280.4665 + 36000.7698 * t) * RADEG;
    let l_moon = (218.3165 + 481267.8813 * t) * RADEG;

    let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    Nutation { dpsi, deps }
}

/// True obliquity of the ecliptic (mean obliquity plus nutation in obliquity), radians.
pub fn true_obliquity(tjm: MJD) -> Radian {
    obleq(tjm) + nutation(tjm).deps * RADSEC
}

/// Compute the equation of the equinoxes in radians.
///
/// Difference between apparent and mean sidereal time, `Δψ · cos ε`, with Δψ taken
/// from the short [`nutation`] series.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (TT scale)
pub fn equequ(tjm: MJD) -> Radian {
    RADSEC * nutation(tjm).dpsi * obleq(tjm).cos()
}
