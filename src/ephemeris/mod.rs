//! # Ephemeris capability
//!
//! The eclipse search never computes planetary positions itself: it asks an
//! [`EphemerisProvider`] for them. This module defines that seam and the value types
//! crossing it.
//!
//! - [`Body`] – typed identifier of a solar-system body, convertible from/to NAIF integer
//!   ids and common names.
//! - [`AngularPosition`] – ecliptic latitude/longitude of a body seen from an observer,
//!   with an optional equatorial projection.
//! - [`ApparentPosition`] – altitude/azimuth above the observer's local horizon.
//! - [`EphemerisProvider`] – the capability trait.
//!
//! Two providers ship with the crate:
//!
//! - [`lunisolar::LunisolarEphemeris`] – analytic low-precision Sun and Moon theories.
//! - [`tabulated::TabulatedEphemeris`] – interpolation in per-body CSV tables, e.g.
//!   exported from JPL Horizons for a given site.
//!
//! ## Conventions
//!
//! * All angles are **degrees**. Longitudes and right ascensions are returned in
//!   `[0, 360)`, azimuth is measured from North through East.
//! * Coordinates are **topocentric** (as seen from the observer) and referred to the true
//!   ecliptic / equator of date.
//! * Distances are **kilometers**.

use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;

use crate::constants::{Degree, Kilometer};
use crate::observers::Observer;
use crate::ref_system::wrap_degrees;
use crate::syzygy_errors::EphemerisError;

pub mod lunisolar;
pub mod tabulated;

/// Solar-system bodies a provider can be asked about.
///
/// The discriminant-free enum maps onto NAIF integer ids through [`Body::naif_id`] and
/// [`TryFrom<i32>`]. The Earth is absent: it is where the observer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    /// Every variant, in NAIF id order of the planets after the Sun and Moon.
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// NAIF integer id of the body (mass centre, not barycentre).
    pub fn naif_id(&self) -> i32 {
        match self {
            Body::Sun => 10,
            Body::Moon => 301,
            Body::Mercury => 199,
            Body::Venus => 299,
            Body::Mars => 499,
            Body::Jupiter => 599,
            Body::Saturn => 699,
            Body::Uranus => 799,
            Body::Neptune => 899,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }
}

impl TryFrom<i32> for Body {
    type Error = EphemerisError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Body::ALL
            .into_iter()
            .find(|body| body.naif_id() == id)
            .ok_or_else(|| EphemerisError::UnknownBody(id.to_string()))
    }
}

impl From<Body> for i32 {
    fn from(body: Body) -> Self {
        body.naif_id()
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    /// Parse a body from its English name (case-insensitive) or its NAIF integer id.
    ///
    /// Errors
    /// ----------
    /// * [`EphemerisError::UnknownBody`] when the string is neither.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<i32>() {
            return Body::try_from(id);
        }
        Body::ALL
            .into_iter()
            .find(|body| body.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EphemerisError::UnknownBody(trimmed.to_string()))
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ecliptic coordinates of date, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticCoords {
    /// β, in `[-90, 90]`.
    pub latitude: Degree,
    /// λ, in `[0, 360)`.
    pub longitude: Degree,
}

/// Equatorial coordinates of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoords {
    /// α in degrees, `[0, 360)`.
    pub right_ascension: Degree,
    /// δ in degrees.
    pub declination: Degree,
    pub distance: Kilometer,
}

/// Direction of a body as seen from an observer at one instant.
///
/// The eclipse predicate only reads [`AngularPosition::ecliptic`]; the equatorial
/// projection is carried for reporting when the provider has it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularPosition {
    pub ecliptic: EclipticCoords,
    pub equatorial: Option<EquatorialCoords>,
}

impl AngularPosition {
    /// Position known only in ecliptic coordinates.
    pub fn from_ecliptic(longitude: Degree, latitude: Degree) -> Self {
        AngularPosition {
            ecliptic: EclipticCoords {
                latitude,
                longitude: wrap_degrees(longitude),
            },
            equatorial: None,
        }
    }

    pub fn longitude(&self) -> Degree {
        self.ecliptic.longitude
    }

    pub fn latitude(&self) -> Degree {
        self.ecliptic.latitude
    }
}

/// Position of a body relative to the observer's local horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentPosition {
    /// Degrees above (positive) or below (negative) the geometric horizon.
    pub altitude: Degree,
    /// Degrees from North through East, `[0, 360)`.
    pub azimuth: Degree,
    pub distance: Kilometer,
}

/// Source of body positions for a given observer and instant.
///
/// Implementations must be deterministic for identical inputs: the search engine relies
/// on it to make a search idempotent. Methods take `&self` so a single provider can be
/// shared across threads when it is also `Sync`.
///
/// Errors
/// ----------
/// * [`EphemerisError::UnknownBody`] – the provider has never heard of `body`.
/// * [`EphemerisError::UnsupportedBody`] – the body exists but the provider cannot compute it.
/// * [`EphemerisError::OutOfCoverage`] – `epoch` falls outside the provider's data span.
pub trait EphemerisProvider {
    /// Ecliptic (and optionally equatorial) direction of `body` seen from `observer`.
    fn angular_position(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<AngularPosition, EphemerisError>;

    /// Altitude/azimuth of `body` above `observer`'s horizon.
    fn apparent_alt_az(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<ApparentPosition, EphemerisError>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn angular_position(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<AngularPosition, EphemerisError> {
        (**self).angular_position(body, observer, epoch)
    }

    fn apparent_alt_az(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<ApparentPosition, EphemerisError> {
        (**self).apparent_alt_az(body, observer, epoch)
    }
}
