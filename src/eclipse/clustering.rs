//! Merge runs of adjacent candidates into events.
//!
//! The search keeps every matching sample, so one physical eclipse usually shows up as a
//! handful of consecutive candidates. [`cluster_candidates`] groups candidates separated
//! by at most `max_gap` and keeps, for each group, the sample closest to exact opposition.
//! The candidate list itself is left untouched.

use std::fmt;

use hifitime::{Duration, Epoch};
use itertools::Itertools;

use crate::eclipse::EclipseCandidate;
use crate::time::fmt_utc_minutes;

/// A group of chronologically adjacent candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseEvent {
    /// Epoch of the first candidate of the run.
    pub first: Epoch,
    /// Epoch of the last candidate of the run.
    pub last: Epoch,
    /// Candidate with the smallest opposition deviation (earliest one on ties).
    pub peak: EclipseCandidate,
    /// Number of candidates merged into this event.
    pub samples: usize,
}

impl EclipseEvent {
    /// Time between the first and the last matching sample.
    pub fn span(&self) -> Duration {
        self.last - self.first
    }
}

impl fmt::Display for EclipseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} ({} sample(s)), peak {} at {:.3}° from opposition",
            fmt_utc_minutes(&self.first),
            fmt_utc_minutes(&self.last),
            self.samples,
            fmt_utc_minutes(&self.peak.epoch),
            self.peak.verdict.opposition_deviation
        )
    }
}

/// Group `candidates` into events.
///
/// Two consecutive candidates belong to the same event when their epochs differ by at
/// most `max_gap`. Passing the sampler step (or a small multiple of it) merges exactly the
/// runs of adjacent samples.
///
/// Arguments
/// -----------------
/// * `candidates`: Chronological output of a search.
/// * `max_gap`: Largest gap still considered part of the same event.
///
/// Return
/// ----------
/// * Events in chronological order; empty for an empty input.
pub fn cluster_candidates(candidates: &[EclipseCandidate], max_gap: Duration) -> Vec<EclipseEvent> {
    let mut group_id = 0_usize;
    let mut previous: Option<Epoch> = None;

    let groups = candidates.iter().chunk_by(|candidate| {
        if let Some(prev) = previous {
            if candidate.epoch - prev > max_gap {
                group_id += 1;
            }
        }
        previous = Some(candidate.epoch);
        group_id
    });

    (&groups)
        .into_iter()
        .filter_map(|(_, run)| {
            let run: Vec<&EclipseCandidate> = run.collect();
            let first = run.first()?.epoch;
            let last = run.last()?.epoch;
            let peak = run.iter().copied().min_by(|a, b| {
                a.verdict
                    .opposition_deviation
                    .total_cmp(&b.verdict.opposition_deviation)
            })?;
            Some(EclipseEvent {
                first,
                last,
                peak: peak.clone(),
                samples: run.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod clustering_test {
    use super::*;
    use crate::eclipse::EclipseVerdict;
    use crate::ephemeris::{AngularPosition, Body};

    fn candidate(hours: f64, deviation: f64) -> EclipseCandidate {
        EclipseCandidate {
            epoch: Epoch::from_gregorian_utc_at_midnight(2025, 9, 7) + Duration::from_hours(hours),
            target: Body::Moon,
            target_position: AngularPosition::from_ecliptic(180.0 + deviation, 0.0),
            reference_position: AngularPosition::from_ecliptic(0.0, 0.0),
            verdict: EclipseVerdict {
                matched: true,
                longitude_separation: 180.0 - deviation,
                opposition_deviation: deviation,
                latitude_deviation: 0.0,
            },
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_candidates(&[], Duration::from_hours(2.0)).is_empty());
    }

    #[test]
    fn test_two_runs() {
        let candidates = vec![
            candidate(16.0, 0.6),
            candidate(17.0, 0.2),
            candidate(18.0, 0.1),
            candidate(19.0, 0.4),
            // next lunation
            candidate(720.0, 0.5),
        ];
        let events = cluster_candidates(&candidates, Duration::from_hours(1.5));
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].samples, 4);
        assert_eq!(events[0].first, candidates[0].epoch);
        assert_eq!(events[0].last, candidates[3].epoch);
        assert_eq!(events[0].peak, candidates[2]);
        assert_eq!(events[0].span(), Duration::from_hours(3.0));

        assert_eq!(events[1].samples, 1);
        assert_eq!(events[1].peak, candidates[4]);
    }

    #[test]
    fn test_gap_is_inclusive() {
        let candidates = vec![candidate(0.0, 0.3), candidate(2.0, 0.3)];
        assert_eq!(cluster_candidates(&candidates, Duration::from_hours(2.0)).len(), 1);
        assert_eq!(cluster_candidates(&candidates, Duration::from_hours(1.9)).len(), 2);
    }

    #[test]
    fn test_peak_tie_keeps_earliest() {
        let candidates = vec![candidate(0.0, 0.3), candidate(1.0, 0.3)];
        let events = cluster_candidates(&candidates, Duration::from_hours(1.0));
        assert_eq!(events[0].peak.epoch, candidates[0].epoch);
    }
}
