//! # Analytic Sun and Moon
//!
//! [`LunisolarEphemeris`] is an [`EphemerisProvider`] built from closed-form theories, with
//! no data file to load:
//!
//! - **Sun** – mean longitude and anomaly plus the equation of the centre, radius vector
//!   from the Keplerian ellipse. About 0.01° in longitude.
//! - **Moon** – the leading periodic terms of the ELP-2000/82 lunar theory in the form
//!   popularized by Meeus (*Astronomical Algorithms*, ch. 47), with the eccentricity
//!   factor `E` on solar-anomaly terms and the three additive planetary/flattening
//!   arguments `A1`, `A2`, `A3`. About 0.01° in longitude, 0.005° in latitude, and a few
//!   tens of kilometers in distance.
//!
//! Both bodies get the nutation in longitude from
//! [`nutation`](crate::earth_orientation::nutation), so their apparent longitudes are
//! referred to the true equinox of date; the Sun also gets the annual aberration.
//!
//! ## Topocentric reduction
//!
//! ```text
//! (λ, β, Δ) geocentric ──ε──▶ r_eq (km) ── − r_obs(t) ──▶ r_topo ──┬─▶ (α, δ)  ──H = LST − α──▶ (alt, az)
//!                                                                   └─ −ε ──▶ (λ′, β′)
//! ```
//!
//! `r_obs(t)` comes from [`Observer::geocentric_position`]. The lunar parallax reaches
//! almost one degree, so seen from the ground the Moon's ecliptic latitude can differ
//! noticeably from the geocentric one; every coordinate returned by the provider is
//! topocentric.
//!
//! Altitudes are **geometric**: no atmospheric refraction is applied.

use hifitime::Epoch;
use log::trace;
use nalgebra::Vector3;

use crate::constants::{Degree, Kilometer, AU, MOON_MEAN_DISTANCE_KM, RADEG, RADSEC};
use crate::earth_orientation::{nutation, true_obliquity};
use crate::ephemeris::{
    AngularPosition, ApparentPosition, Body, EclipticCoords, EphemerisProvider, EquatorialCoords,
};
use crate::observers::Observer;
use crate::ref_system::{
    cartesian_to_spherical, ecliptic_to_equatorial, equatorial_to_ecliptic,
    equatorial_to_horizontal, spherical_to_cartesian, wrap_degrees,
};
use crate::syzygy_errors::EphemerisError;
use crate::time::julian_centuries_tt;

/// Periodic term of the lunar longitude and distance: multipliers of `(D, M, M′, F)`,
/// longitude coefficient (1e-6 degree) and distance coefficient (1e-3 km).
struct LongitudeTerm {
    args: [i8; 4],
    sin_l: f64,
    cos_r: f64,
}

/// Periodic term of the lunar latitude: multipliers of `(D, M, M′, F)` and the sine
/// coefficient (1e-6 degree).
struct LatitudeTerm {
    args: [i8; 4],
    sin_b: f64,
}

const fn lr(d: i8, m: i8, mp: i8, f: i8, sin_l: f64, cos_r: f64) -> LongitudeTerm {
    LongitudeTerm {
        args: [d, m, mp, f],
        sin_l,
        cos_r,
    }
}

const fn b(d: i8, m: i8, mp: i8, f: i8, sin_b: f64) -> LatitudeTerm {
    LatitudeTerm {
        args: [d, m, mp, f],
        sin_b,
    }
}

#[rustfmt::skip]
const MOON_LR: [LongitudeTerm; 32] = [
    lr(0,  0,  1,  0, 6_288_774.0, -20_905_355.0),
    lr(2,  0, -1,  0, 1_274_027.0,  -3_699_111.0),
    lr(2,  0,  0,  0,   658_314.0,  -2_955_968.0),
    lr(0,  0,  2,  0,   213_618.0,    -569_925.0),
    lr(0,  1,  0,  0,  -185_116.0,      48_888.0),
    lr(0,  0,  0,  2,  -114_332.0,      -3_149.0),
    lr(2,  0, -2,  0,    58_793.0,     246_158.0),
    lr(2, -1, -1,  0,    57_066.0,    -152_138.0),
    lr(2,  0,  1,  0,    53_322.0,    -170_733.0),
    lr(2, -1,  0,  0,    45_758.0,    -204_586.0),
    lr(0,  1, -1,  0,   -40_923.0,    -129_620.0),
    lr(1,  0,  0,  0,   -34_720.0,     108_743.0),
    lr(0,  1,  1,  0,   -30_383.0,     104_755.0),
    lr(2,  0,  0, -2,    15_327.0,      10_321.0),
    lr(0,  0,  1,  2,   -12_528.0,           0.0),
    lr(0,  0,  1, -2,    10_980.0,      79_661.0),
    lr(4,  0, -1,  0,    10_675.0,     -34_782.0),
    lr(0,  0,  3,  0,    10_034.0,     -23_210.0),
    lr(4,  0, -2,  0,     8_548.0,     -21_636.0),
    lr(2,  1, -1,  0,    -7_888.0,      24_208.0),
    lr(2,  1,  0,  0,    -6_766.0,      30_824.0),
    lr(1,  0, -1,  0,    -5_163.0,      -8_379.0),
    lr(1,  1,  0,  0,     4_987.0,     -16_675.0),
    lr(2, -1,  1,  0,     4_036.0,     -12_831.0),
    lr(2,  0,  2,  0,     3_994.0,     -10_445.0),
    lr(4,  0,  0,  0,     3_861.0,     -11_650.0),
    lr(2,  0, -3,  0,     3_665.0,      14_403.0),
    lr(0,  1, -2,  0,    -2_689.0,      -7_003.0),
    lr(2,  0, -1,  2,    -2_602.0,           0.0),
    lr(2, -1, -2,  0,     2_390.0,      10_056.0),
    lr(1,  0,  1,  0,    -2_348.0,       6_322.0),
    lr(2, -2,  0,  0,     2_236.0,      -9_884.0),
];

#[rustfmt::skip]
const MOON_B: [LatitudeTerm; 27] = [
    b(0,  0,  0,  1, 5_128_122.0),
    b(0,  0,  1,  1,   280_602.0),
    b(0,  0,  1, -1,   277_693.0),
    b(2,  0,  0, -1,   173_237.0),
    b(2,  0, -1,  1,    55_413.0),
    b(2,  0, -1, -1,    46_271.0),
    b(2,  0,  0,  1,    32_573.0),
    b(0,  0,  2,  1,    17_198.0),
    b(2,  0,  1, -1,     9_266.0),
    b(0,  0,  2, -1,     8_822.0),
    b(2, -1,  0, -1,     8_216.0),
    b(2,  0, -2, -1,     4_324.0),
    b(2,  0,  1,  1,     4_200.0),
    b(2,  1,  0, -1,    -3_359.0),
    b(2, -1, -1,  1,     2_463.0),
    b(2, -1,  0,  1,     2_211.0),
    b(2, -1, -1, -1,     2_065.0),
    b(0,  1, -1, -1,    -1_870.0),
    b(4,  0, -1, -1,     1_828.0),
    b(0,  1,  0,  1,    -1_794.0),
    b(0,  0,  0,  3,    -1_749.0),
    b(0,  1, -1,  1,    -1_565.0),
    b(1,  0,  0,  1,    -1_491.0),
    b(0,  1,  1,  1,    -1_475.0),
    b(0,  1,  1, -1,    -1_410.0),
    b(0,  1,  0, -1,    -1_344.0),
    b(1,  0,  0, -1,    -1_335.0),
];

/// Annual aberration constant, degrees at 1 AU (20.4898″).
const ABERRATION: Degree = 20.4898 / 3600.0;

/// Geocentric ecliptic coordinates of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocentricEcliptic {
    /// Apparent longitude λ, degrees in `[0, 360)`.
    pub longitude: Degree,
    /// Latitude β, degrees.
    pub latitude: Degree,
    pub distance: Kilometer,
}

impl GeocentricEcliptic {
    fn to_cartesian(self) -> Vector3<f64> {
        spherical_to_cartesian(self.longitude, self.latitude, self.distance)
    }
}

fn poly(t: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Apparent geocentric position of the Moon at `epoch`.
///
/// Arguments
/// -----------------
/// * `epoch`: Instant of evaluation (any time scale; converted to TT internally).
///
/// Return
/// ----------
/// * Longitude corrected for nutation, latitude, and Earth–Moon distance in km.
///
/// See also
/// ------------
/// * [`sun_geocentric`] – the solar counterpart.
pub fn moon_geocentric(epoch: &Epoch) -> GeocentricEcliptic {
    let t = julian_centuries_tt(epoch);

    let l_prime = poly(
        t,
        &[218.3164477, 481267.88123421, -0.0015786, 1.0 / 538841.0, -1.0 / 65194000.0],
    );
    let d = poly(
        t,
        &[297.8501921, 445267.1114034, -0.0018819, 1.0 / 545868.0, -1.0 / 113065000.0],
    );
    let m = poly(t, &[357.5291092, 35999.0502909, -0.0001536, 1.0 / 24490000.0]);
    let m_prime = poly(
        t,
        &[134.9633964, 477198.8675055, 0.0087414, 1.0 / 69699.0, -1.0 / 14712000.0],
    );
    let f = poly(
        t,
        &[93.2720950, 483202.0175233, -0.0036539, -1.0 / 3526000.0, 1.0 / 863310000.0],
    );

    // decreasing eccentricity of the Earth orbit
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;

    let args = [d * RADEG, m * RADEG, m_prime * RADEG, f * RADEG];
    let angle = |mult: &[i8; 4]| -> f64 {
        mult.iter()
            .zip(args.iter())
            .map(|(k, a)| f64::from(*k) * a)
            .sum()
    };
    let e_factor = |mult: &[i8; 4]| -> f64 {
        match mult[1].abs() {
            0 => 1.0,
            1 => e,
            _ => e * e,
        }
    };

    let (mut sum_l, sum_r) = MOON_LR.iter().fold((0.0, 0.0), |(sl, sr), term| {
        let arg = angle(&term.args);
        let ef = e_factor(&term.args);
        (
            sl + term.sin_l * ef * arg.sin(),
            sr + term.cos_r * ef * arg.cos(),
        )
    });
    let mut sum_b = MOON_B.iter().fold(0.0, |sb, term| {
        sb + term.sin_b * e_factor(&term.args) * angle(&term.args).sin()
    });

    let a1 = (119.75 + 131.849 * t) * RADEG;
    let a2 = (53.09 + 479264.290 * t) * RADEG;
    let a3 = (313.45 + 481266.484 * t) * RADEG;
    let lp = l_prime * RADEG;
    let fr = f * RADEG;
    let mpr = m_prime * RADEG;

    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp - fr).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - fr).sin()
        + 175.0 * (a1 + fr).sin()
        + 127.0 * (lp - mpr).sin()
        - 115.0 * (lp + mpr).sin();

    let dpsi = nutation(epoch.to_mjd_tt_days()).dpsi / 3600.0;

    GeocentricEcliptic {
        longitude: wrap_degrees(l_prime + sum_l / 1e6 + dpsi),
        latitude: sum_b / 1e6,
        distance: MOON_MEAN_DISTANCE_KM + sum_r / 1e3,
    }
}

/// Apparent geocentric position of the Sun at `epoch`.
///
/// Longitude includes nutation and annual aberration; the latitude is taken as zero
/// (the true solar latitude never exceeds 1.2″).
pub fn sun_geocentric(epoch: &Epoch) -> GeocentricEcliptic {
    let t = julian_centuries_tt(epoch);

    let l0 = poly(t, &[280.46646, 36000.76983, 0.0003032]);
    let m = poly(t, &[357.52911, 35999.05029, -0.0001537]) * RADEG;
    let ecc = poly(t, &[0.016708634, -0.000042037, -0.0000001267]);

    let center = poly(t, &[1.914602, -0.004817, -0.000014]) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    let true_longitude = l0 + center;
    let true_anomaly = m + center * RADEG;
    let radius_au = 1.000001018 * (1.0 - ecc * ecc) / (1.0 + ecc * true_anomaly.cos());

    let dpsi = nutation(epoch.to_mjd_tt_days()).dpsi / 3600.0;
    let aberration = -ABERRATION / radius_au;

    GeocentricEcliptic {
        longitude: wrap_degrees(true_longitude + dpsi + aberration),
        latitude: 0.0,
        distance: radius_au * AU,
    }
}

/// Analytic ephemeris of the Sun and the Moon.
///
/// Stateless and `Copy`; any number of searches may share one instance, across threads
/// included. Asking for any other [`Body`] yields [`EphemerisError::UnsupportedBody`].
///
/// Examples
/// --------
/// ```rust
/// use hifitime::Epoch;
/// use syzygy::ephemeris::{Body, EphemerisProvider, lunisolar::LunisolarEphemeris};
/// use syzygy::observers::Observer;
///
/// let site = Observer::new(-6.2088, 106.8456, 8.0, None)?;
/// let t = Epoch::from_gregorian_utc_hms(2025, 9, 7, 18, 11, 0);
/// let moon = LunisolarEphemeris.angular_position(Body::Moon, &site, t)?;
/// let sun = LunisolarEphemeris.angular_position(Body::Sun, &site, t)?;
/// let elongation = (moon.longitude() - sun.longitude()).rem_euclid(360.0);
/// assert!((elongation - 180.0).abs() < 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LunisolarEphemeris;

impl LunisolarEphemeris {
    const NAME: &'static str = "lunisolar";

    /// Geocentric apparent position of a supported body.
    ///
    /// Errors
    /// ----------
    /// * [`EphemerisError::UnsupportedBody`] for anything but the Sun and the Moon.
    pub fn geocentric(&self, body: Body, epoch: &Epoch) -> Result<GeocentricEcliptic, EphemerisError> {
        match body {
            Body::Sun => Ok(sun_geocentric(epoch)),
            Body::Moon => Ok(moon_geocentric(epoch)),
            other => Err(EphemerisError::UnsupportedBody {
                body: other.to_string(),
                provider: Self::NAME,
            }),
        }
    }

    /// Topocentric position vector of `body` in the equatorial frame of date (km),
    /// together with the true obliquity used for the rotation (radians).
    fn topocentric_equatorial(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<(Vector3<f64>, f64), EphemerisError> {
        let geo = self.geocentric(body, epoch)?;
        let eps = true_obliquity(epoch.to_mjd_tt_days());

        let r_geo = ecliptic_to_equatorial(&geo.to_cartesian(), eps);
        let r_topo = r_geo - observer.geocentric_position(epoch);

        trace!(
            "{body} at {epoch}: geocentric λ={:.6}° β={:.6}° Δ={:.1} km",
            geo.longitude,
            geo.latitude,
            geo.distance
        );

        Ok((r_topo, eps))
    }
}

impl EphemerisProvider for LunisolarEphemeris {
    fn angular_position(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<AngularPosition, EphemerisError> {
        let (r_topo, eps) = self.topocentric_equatorial(body, observer, &epoch)?;

        let (ra, dec, distance) = cartesian_to_spherical(&r_topo);
        let (lon, lat, _) = cartesian_to_spherical(&equatorial_to_ecliptic(&r_topo, eps));

        Ok(AngularPosition {
            ecliptic: EclipticCoords {
                latitude: lat,
                longitude: lon,
            },
            equatorial: Some(EquatorialCoords {
                right_ascension: ra,
                declination: dec,
                distance,
            }),
        })
    }

    fn apparent_alt_az(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<ApparentPosition, EphemerisError> {
        let (r_topo, _) = self.topocentric_equatorial(body, observer, &epoch)?;
        let (ra, dec, distance) = cartesian_to_spherical(&r_topo);

        let hour_angle = observer.local_sidereal_time(&epoch) - ra * RADEG;
        let (altitude, azimuth) =
            equatorial_to_horizontal(hour_angle, dec * RADEG, observer.latitude_rad());

        Ok(ApparentPosition {
            altitude,
            azimuth,
            distance,
        })
    }
}

/// Arcseconds between the topocentric and geocentric directions of a body, handy to
/// gauge the size of the diurnal parallax.
pub fn parallax_shift(
    body: Body,
    observer: &Observer,
    epoch: &Epoch,
) -> Result<f64, EphemerisError> {
    let eph = LunisolarEphemeris;
    let eps = true_obliquity(epoch.to_mjd_tt_days());
    let geo = ecliptic_to_equatorial(&eph.geocentric(body, epoch)?.to_cartesian(), eps);
    let (topo, _) = eph.topocentric_equatorial(body, observer, epoch)?;
    let cos = (geo.dot(&topo) / (geo.norm() * topo.norm())).clamp(-1.0, 1.0);
    Ok(cos.acos() / RADSEC)
}

#[cfg(test)]
mod lunisolar_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hifitime::TimeScale;

    fn jakarta() -> Observer {
        Observer::new(-6.2088, 106.8456, 8.0, Some("Jakarta".into())).unwrap()
    }

    #[test]
    fn test_moon_1992_april_12() {
        // 1992-04-12 0h TD: λ = 133.167265°, β = −3.229126°, Δ = 368409.7 km
        let t = Epoch::from_gregorian(1992, 4, 12, 0, 0, 0, 0, TimeScale::TT);
        let moon = moon_geocentric(&t);
        assert_abs_diff_eq!(moon.longitude, 133.167265, epsilon = 0.05);
        assert_abs_diff_eq!(moon.latitude, -3.229126, epsilon = 0.03);
        assert_abs_diff_eq!(moon.distance, 368409.7, epsilon = 100.0);
    }

    #[test]
    fn test_sun_1992_october_13() {
        // 1992-10-13 0h TD: apparent λ = 199.90895°, R = 0.99766 AU
        let t = Epoch::from_gregorian(1992, 10, 13, 0, 0, 0, 0, TimeScale::TT);
        let sun = sun_geocentric(&t);
        assert_abs_diff_eq!(sun.longitude, 199.90895, epsilon = 0.01);
        assert_abs_diff_eq!(sun.distance / AU, 0.99766, epsilon = 1e-4);
        assert_eq!(sun.latitude, 0.0);
    }

    #[test]
    fn test_sun_at_march_equinox_2025() {
        let t = Epoch::from_gregorian_utc_hms(2025, 3, 20, 9, 1, 0);
        let sun = sun_geocentric(&t);
        let lon = if sun.longitude > 180.0 {
            sun.longitude - 360.0
        } else {
            sun.longitude
        };
        assert_abs_diff_eq!(lon, 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_unsupported_body() {
        let err = LunisolarEphemeris
            .angular_position(Body::Mars, &jakarta(), Epoch::from_gregorian_utc_at_midnight(2025, 1, 1))
            .unwrap_err();
        assert_eq!(
            err,
            EphemerisError::UnsupportedBody {
                body: "Mars".into(),
                provider: "lunisolar"
            }
        );
    }

    #[test]
    fn test_lunar_parallax_below_one_degree() {
        let t = Epoch::from_gregorian_utc_hms(2025, 9, 7, 12, 0, 0);
        let shift = parallax_shift(Body::Moon, &jakarta(), &t).unwrap();
        assert!(shift > 0.0 && shift < 3700.0, "lunar parallax {shift}″");

        let shift = parallax_shift(Body::Sun, &jakarta(), &t).unwrap();
        assert!(shift < 9.0, "solar parallax {shift}″");
    }

    #[test]
    fn test_total_eclipse_2025_september_7_geometry() {
        // greatest eclipse 18:11 UTC, Moon high in the Jakarta sky (01:11 local)
        let site = jakarta();
        let t = Epoch::from_gregorian_utc_hms(2025, 9, 7, 18, 11, 0);

        let moon = LunisolarEphemeris
            .angular_position(Body::Moon, &site, t)
            .unwrap();
        let sun = LunisolarEphemeris
            .angular_position(Body::Sun, &site, t)
            .unwrap();
        let sep = (moon.longitude() - sun.longitude()).rem_euclid(360.0);
        assert_abs_diff_eq!(sep, 180.0, epsilon = 0.75);
        assert!(moon.latitude().abs() < 0.75);

        let alt_az = LunisolarEphemeris
            .apparent_alt_az(Body::Moon, &site, t)
            .unwrap();
        assert!(alt_az.altitude > 30.0, "altitude {}", alt_az.altitude);

        let sun_alt = LunisolarEphemeris
            .apparent_alt_az(Body::Sun, &site, t)
            .unwrap();
        assert!(sun_alt.altitude < -30.0);
    }

    #[test]
    fn test_sun_transit_azimuth_and_altitude() {
        // near local noon at Jakarta (≈ 05:00 UTC) the Sun stands high in the sky
        let site = jakarta();
        let t = Epoch::from_gregorian_utc_hms(2025, 6, 21, 4, 55, 0);
        let pos = LunisolarEphemeris.apparent_alt_az(Body::Sun, &site, t).unwrap();
        // June solstice: δ ≈ +23.4°, site at −6.2° → culmination ≈ 60.4°, due North
        assert_abs_diff_eq!(pos.altitude, 60.4, epsilon = 1.5);
        assert!(pos.azimuth > 330.0 || pos.azimuth < 30.0, "azimuth {}", pos.azimuth);
    }

    #[test]
    fn test_equatorial_projection_is_filled() {
        let t = Epoch::from_gregorian_utc_at_midnight(2025, 1, 1);
        let pos = LunisolarEphemeris
            .angular_position(Body::Sun, &jakarta(), t)
            .unwrap();
        let eq = pos.equatorial.unwrap();
        // early January: Sun near RA 18h48m, δ ≈ −23°
        assert_abs_diff_eq!(eq.right_ascension, 281.9, epsilon = 1.0);
        assert_abs_diff_eq!(eq.declination, -23.0, epsilon = 0.5);
        assert_abs_diff_eq!(eq.distance / AU, 0.9833, epsilon = 1e-3);
    }
}
