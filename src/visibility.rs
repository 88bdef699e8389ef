//! # Visibility classification
//!
//! A geometric eclipse condition says nothing about whether the event can be watched from
//! the site: the Moon may well be below the horizon at that instant.
//! [`VisibilityReporter`] asks the provider for the target's altitude at each candidate
//! epoch and labels the candidate [`Visibility::Visible`] when it is strictly above the
//! geometric horizon.
//!
//! The reporter only reads the candidate list: the output has the same length and order,
//! one [`VisibilityEntry`] per candidate.

use std::fmt;

use hifitime::Epoch;
use log::{debug, warn};

use crate::constants::Degree;
use crate::eclipse::EclipseCandidate;
use crate::ephemeris::{ApparentPosition, EphemerisProvider};
use crate::observers::Observer;
use crate::syzygy_errors::SyzygyError;

/// Whether the target is above the observer's horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Altitude strictly greater than 0°.
    Visible,
    /// Altitude of 0° or less.
    BelowHorizon,
}

impl Visibility {
    /// Classify an altitude in degrees. Exactly 0° is below the horizon.
    pub fn from_altitude(altitude: Degree) -> Self {
        if altitude > 0.0 {
            Visibility::Visible
        } else {
            Visibility::BelowHorizon
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Visible => write!(f, "visible"),
            Visibility::BelowHorizon => write!(f, "below horizon"),
        }
    }
}

/// A candidate enriched with the target's apparent position and its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub candidate: EclipseCandidate,
    pub apparent: ApparentPosition,
    pub visibility: Visibility,
}

impl VisibilityEntry {
    /// `(epoch, visibility, altitude in degrees)`, the three facts a summary line needs.
    pub fn summary(&self) -> (Epoch, Visibility, Degree) {
        (self.candidate.epoch, self.visibility, self.apparent.altitude)
    }
}

/// Classifies search results as visible or below the horizon.
#[derive(Debug, Clone)]
pub struct VisibilityReporter<'a, P: EphemerisProvider> {
    provider: &'a P,
    observer: &'a Observer,
}

impl<'a, P: EphemerisProvider> VisibilityReporter<'a, P> {
    pub fn new(provider: &'a P, observer: &'a Observer) -> Self {
        VisibilityReporter { provider, observer }
    }

    /// Compute the apparent position of each candidate's target and classify it.
    ///
    /// Arguments
    /// -----------------
    /// * `candidates`: Output of an eclipse search, borrowed read-only.
    ///
    /// Return
    /// ----------
    /// * One [`VisibilityEntry`] per candidate, in the same order.
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::Ephemeris`] if the provider cannot compute an altitude.
    pub fn report(
        &self,
        candidates: &[EclipseCandidate],
    ) -> Result<Vec<VisibilityEntry>, SyzygyError> {
        let entries = candidates
            .iter()
            .map(|candidate| {
                let apparent = self
                    .provider
                    .apparent_alt_az(candidate.target, self.observer, candidate.epoch)
                    .map_err(|err| {
                        warn!(
                            "Visibility report aborted at {}: {err}",
                            candidate.epoch
                        );
                        SyzygyError::from(err)
                    })?;
                Ok(VisibilityEntry {
                    candidate: candidate.clone(),
                    apparent,
                    visibility: Visibility::from_altitude(apparent.altitude),
                })
            })
            .collect::<Result<Vec<_>, SyzygyError>>()?;

        debug!(
            "Visibility report for {}: {} of {} candidate(s) above the horizon",
            self.observer,
            entries.iter().filter(|e| e.visibility.is_visible()).count(),
            entries.len()
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod visibility_test {
    use super::*;

    #[test]
    fn test_horizon_boundary() {
        assert_eq!(Visibility::from_altitude(0.0), Visibility::BelowHorizon);
        assert_eq!(Visibility::from_altitude(-0.0), Visibility::BelowHorizon);
        assert_eq!(Visibility::from_altitude(1e-12), Visibility::Visible);
        assert_eq!(Visibility::from_altitude(-12.0), Visibility::BelowHorizon);
        assert_eq!(Visibility::from_altitude(f64::NAN), Visibility::BelowHorizon);
    }

    #[test]
    fn test_display() {
        assert_eq!(Visibility::Visible.to_string(), "visible");
        assert_eq!(Visibility::BelowHorizon.to_string(), "below horizon");
    }
}
