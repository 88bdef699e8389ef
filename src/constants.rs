//! # Constants and type definitions for Syzygy
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Time-scale anchors (J2000.0 in JD and MJD)
//! - Earth ellipsoid and mean lunar/solar distances
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, AU ↔ km)
//! - Type aliases documenting the unit carried by an `f64`
//!
//! Angles handed across the public API are always **degrees**; radians only appear inside
//! the trigonometric kernels of [`crate::ephemeris::lunisolar`] and
//! [`crate::earth_orientation`].

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// JD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const JD2000: f64 = 2_451_545.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.;

/// Mean Earth–Moon distance used as the constant term of the lunar distance series (km)
pub const MOON_MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Full opposition: the ecliptic longitudes of the two bodies differ by this angle.
pub const OPPOSITION: f64 = 180.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
