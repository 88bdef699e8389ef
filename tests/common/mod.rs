#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use hifitime::{Duration, Epoch};
use syzygy::eclipse::EclipseCandidate;
use syzygy::ephemeris::{AngularPosition, ApparentPosition, Body, EphemerisProvider};
use syzygy::observers::Observer;
use syzygy::syzygy_errors::EphemerisError;

pub fn jakarta() -> Observer {
    Observer::new(-6.2088, 106.8456, 8.0, Some("Jakarta".into())).unwrap()
}

pub fn utc(y: i32, mo: u8, d: u8, h: u8, mi: u8) -> Epoch {
    Epoch::from_gregorian_utc_hms(y, mo, d, h, mi, 0)
}

/// Synthetic sky: the reference (Sun) sits at λ = 0°, β = 0°, the target (Moon) moves
/// linearly from λ = 0° at `start` to λ = 180° at `start + span`, at constant latitude.
/// The altitude of every body is `altitude`.
pub struct LinearSky {
    pub start: Epoch,
    pub span: Duration,
    pub moon_latitude: f64,
    pub altitude: f64,
}

impl LinearSky {
    pub fn new(start: Epoch, span: Duration) -> Self {
        LinearSky {
            start,
            span,
            moon_latitude: 0.0,
            altitude: 10.0,
        }
    }

    pub fn with_moon_latitude(mut self, latitude: f64) -> Self {
        self.moon_latitude = latitude;
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn end(&self) -> Epoch {
        self.start + self.span
    }
}

impl EphemerisProvider for LinearSky {
    fn angular_position(
        &self,
        body: Body,
        _observer: &Observer,
        epoch: Epoch,
    ) -> Result<AngularPosition, EphemerisError> {
        match body {
            Body::Sun => Ok(AngularPosition::from_ecliptic(0.0, 0.0)),
            Body::Moon => {
                let fraction = (epoch - self.start).to_seconds() / self.span.to_seconds();
                Ok(AngularPosition::from_ecliptic(
                    180.0 * fraction,
                    self.moon_latitude,
                ))
            }
            other => Err(EphemerisError::UnknownBody(other.to_string())),
        }
    }

    fn apparent_alt_az(
        &self,
        body: Body,
        _observer: &Observer,
        _epoch: Epoch,
    ) -> Result<ApparentPosition, EphemerisError> {
        match body {
            Body::Sun | Body::Moon => Ok(ApparentPosition {
                altitude: self.altitude,
                azimuth: 90.0,
                distance: 384_400.0,
            }),
            other => Err(EphemerisError::UnknownBody(other.to_string())),
        }
    }
}

/// Wraps a provider and fails with `OutOfCoverage` from `cutoff` on, counting calls.
pub struct CoverageLimited<P> {
    pub inner: P,
    pub cutoff: Epoch,
    pub calls: AtomicUsize,
}

impl<P> CoverageLimited<P> {
    pub fn new(inner: P, cutoff: Epoch) -> Self {
        CoverageLimited {
            inner,
            cutoff,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: EphemerisProvider> EphemerisProvider for CoverageLimited<P> {
    fn angular_position(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<AngularPosition, EphemerisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if epoch >= self.cutoff {
            return Err(EphemerisError::OutOfCoverage {
                body: body.to_string(),
                epoch,
            });
        }
        self.inner.angular_position(body, observer, epoch)
    }

    fn apparent_alt_az(
        &self,
        body: Body,
        observer: &Observer,
        epoch: Epoch,
    ) -> Result<ApparentPosition, EphemerisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if epoch >= self.cutoff {
            return Err(EphemerisError::OutOfCoverage {
                body: body.to_string(),
                epoch,
            });
        }
        self.inner.apparent_alt_az(body, observer, epoch)
    }
}

pub fn assert_chronological(candidates: &[EclipseCandidate]) {
    for pair in candidates.windows(2) {
        assert!(
            pair[0].epoch < pair[1].epoch,
            "candidates out of order: {} then {}",
            pair[0].epoch,
            pair[1].epoch
        );
    }
}
