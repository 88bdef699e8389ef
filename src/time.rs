//! # Time utilities and sampling
//!
//! Everything that touches the time axis of a search lives here:
//!
//! - [`TimeSampler`] – an evenly spaced, inclusive grid of [`Epoch`]s spanning a search
//!   interval. The grid is lazy (epochs are computed on demand), finite, and restartable:
//!   iterating it twice yields the same sequence.
//! - [`gmst`] – Greenwich Mean Sidereal Time, needed to place a ground observer in an
//!   Earth-centred inertial frame.
//! - [`julian_centuries_tt`] – the `T` argument of every polynomial theory in the crate.
//! - [`fmt_utc_minutes`] – compact `YYYY-MM-DD HH:MM UTC` stamps for reports.
//!
//! ## Time scales
//!
//! Epochs are [`hifitime::Epoch`] values, i.e. points on a continuous scale, never wall-clock
//! system time. Analytic theories are evaluated in TT; sidereal time is evaluated with UTC
//! standing in for UT1 (|UT1 − UTC| < 0.9 s, i.e. < 0.004° of Earth rotation).

use hifitime::{Duration, Epoch};

use crate::constants::{DAYS_PER_CENTURY, DPI, JD2000, MJD, SECONDS_PER_DAY, T2000};
use crate::syzygy_errors::SyzygyError;

/// Evenly spaced, inclusive sampling of a time interval.
///
/// A sampler of `n` samples over `[start, end]` yields
///
/// ```text
/// t_i = start + (end − start) · i / (n − 1),   i = 0 … n−1
/// ```
///
/// with `t_0 == start` and `t_{n−1} == end` exactly (the last sample is not recomputed
/// through floating-point arithmetic).
///
/// Invariants
/// -----------------
/// * `end > start`
/// * `n ≥ 2`
/// * consecutive samples are at least one nanosecond apart, so the sequence is strictly
///   increasing.
///
/// See also
/// ------------
/// * [`TimeSampler::new`] – Validating constructor.
/// * [`SampleIter`] – The iterator returned by [`TimeSampler::iter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSampler {
    start: Epoch,
    end: Epoch,
    samples: usize,
    span: Duration,
}

impl TimeSampler {
    /// Build a sampler over `[start, end]` with `samples` instants.
    ///
    /// Arguments
    /// -----------------
    /// * `start`: First instant of the grid.
    /// * `end`: Last instant of the grid, must be strictly after `start`.
    /// * `samples`: Number of instants, endpoints included.
    ///
    /// Return
    /// ----------
    /// * A ready-to-iterate [`TimeSampler`].
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::InvalidRange`] if `end <= start` (checked first).
    /// * [`SyzygyError::InvalidSampleCount`] if `samples < 2`, or if the interval is too short
    ///   to hold `samples` distinct nanosecond-resolution instants.
    pub fn new(start: Epoch, end: Epoch, samples: usize) -> Result<Self, SyzygyError> {
        if end <= start {
            return Err(SyzygyError::InvalidRange { start, end });
        }
        if samples < 2 {
            return Err(SyzygyError::InvalidSampleCount(samples));
        }

        let span = end - start;
        let step_ns = span.total_nanoseconds() / (samples as i128 - 1);
        if step_ns < 1 {
            return Err(SyzygyError::InvalidSampleCount(samples));
        }

        Ok(TimeSampler {
            start,
            end,
            samples,
            span,
        })
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    /// Number of samples, endpoints included.
    pub fn len(&self) -> usize {
        self.samples
    }

    /// Always `false`: a valid sampler holds at least two instants.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Nominal spacing between two consecutive samples, truncated to the nanosecond.
    pub fn step(&self) -> Duration {
        let step_ns = self.span.total_nanoseconds() / (self.samples as i128 - 1);
        Duration::from_total_nanoseconds(step_ns)
    }

    /// Random access to the `index`-th sample, `None` past the end.
    pub fn epoch_at(&self, index: usize) -> Option<Epoch> {
        if index >= self.samples {
            return None;
        }
        if index == 0 {
            return Some(self.start);
        }
        if index == self.samples - 1 {
            return Some(self.end);
        }
        // integer nanoseconds: a spacing of at least 1 ns keeps the grid strictly increasing
        let offset_ns = self.span.total_nanoseconds() * index as i128 / (self.samples as i128 - 1);
        Some(self.start + Duration::from_total_nanoseconds(offset_ns))
    }

    /// Iterate the grid from `start` to `end`.
    ///
    /// Each call returns a fresh iterator: the sampler itself is never consumed.
    pub fn iter(&self) -> SampleIter<'_> {
        SampleIter {
            sampler: self,
            front: 0,
            back: self.samples,
        }
    }
}

impl<'a> IntoIterator for &'a TimeSampler {
    type Item = Epoch;
    type IntoIter = SampleIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the epochs of a [`TimeSampler`].
#[derive(Debug, Clone)]
pub struct SampleIter<'a> {
    sampler: &'a TimeSampler,
    front: usize,
    back: usize,
}

impl Iterator for SampleIter<'_> {
    type Item = Epoch;

    fn next(&mut self) -> Option<Epoch> {
        if self.front >= self.back {
            return None;
        }
        let epoch = self.sampler.epoch_at(self.front);
        self.front += 1;
        epoch
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for SampleIter<'_> {
    fn next_back(&mut self) -> Option<Epoch> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.sampler.epoch_at(self.back)
    }
}

impl ExactSizeIterator for SampleIter<'_> {}

/// Julian centuries of TT elapsed since J2000.0.
pub fn julian_centuries_tt(epoch: &Epoch) -> f64 {
    (epoch.to_jde_tt_days() - JD2000) / DAYS_PER_CENTURY
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / DAYS_PER_CENTURY;

    // GMST at 0h UT1, seconds -> radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    // Earth rotation during the elapsed fraction of the day
    let h = (tjm - itjm) * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Format an epoch as `YYYY-MM-DD HH:MM UTC`, truncated to the minute.
pub fn fmt_utc_minutes(epoch: &Epoch) -> String {
    let (y, mo, d, h, mi, _s, _ns) = epoch.to_gregorian_utc();
    format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02} UTC")
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hifitime::TimeScale;

    fn jan_first(year: i32) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(year, 1, 1)
    }

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_abs_diff_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        let tut = T2000;
        assert_abs_diff_eq!(gmst(tut), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_julian_centuries_at_j2000() {
        let j2000 = Epoch::from_gregorian(2000, 1, 1, 12, 0, 0, 0, TimeScale::TT);
        assert_abs_diff_eq!(julian_centuries_tt(&j2000), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn sampler_endpoints_and_length() {
        let start = jan_first(2025);
        let end = jan_first(2026);
        let sampler = TimeSampler::new(start, end, 5000).unwrap();

        let epochs: Vec<Epoch> = sampler.iter().collect();
        assert_eq!(epochs.len(), 5000);
        assert_eq!(epochs[0], start);
        assert_eq!(epochs[4999], end);
        assert!(epochs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sampler_is_restartable() {
        let sampler = TimeSampler::new(jan_first(2025), jan_first(2026), 17).unwrap();
        let first: Vec<Epoch> = sampler.iter().collect();
        let second: Vec<Epoch> = (&sampler).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn sampler_two_samples_are_the_endpoints() {
        let start = jan_first(2025);
        let end = jan_first(2026);
        let sampler = TimeSampler::new(start, end, 2).unwrap();
        assert_eq!(sampler.iter().collect::<Vec<_>>(), vec![start, end]);
    }

    #[test]
    fn sampler_reverse_iteration() {
        let sampler = TimeSampler::new(jan_first(2025), jan_first(2026), 9).unwrap();
        let mut forward: Vec<Epoch> = sampler.iter().collect();
        forward.reverse();
        let backward: Vec<Epoch> = sampler.iter().rev().collect();
        assert_eq!(forward, backward);
        assert_eq!(sampler.iter().len(), 9);
    }

    #[test]
    fn sampler_epoch_at_matches_iteration() {
        let sampler = TimeSampler::new(jan_first(2025), jan_first(2026), 13).unwrap();
        for (i, epoch) in sampler.iter().enumerate() {
            assert_eq!(sampler.epoch_at(i), Some(epoch));
        }
        assert_eq!(sampler.epoch_at(13), None);
    }

    #[test]
    fn sampler_step_is_even() {
        let start = jan_first(2025);
        let sampler = TimeSampler::new(start, start + Duration::from_days(10.0), 11).unwrap();
        assert_abs_diff_eq!(sampler.step().to_seconds(), 86_400.0, epsilon = 1e-6);
        let third = sampler.epoch_at(3).unwrap();
        assert_abs_diff_eq!((third - start).to_seconds(), 3.0 * 86_400.0, epsilon = 1e-6);
    }

    #[test]
    fn sampler_rejects_empty_range() {
        let start = jan_first(2025);
        assert_eq!(
            TimeSampler::new(start, start, 10),
            Err(SyzygyError::InvalidRange { start, end: start })
        );
        let end = jan_first(2024);
        assert_eq!(
            TimeSampler::new(start, end, 10),
            Err(SyzygyError::InvalidRange { start, end })
        );
    }

    #[test]
    fn sampler_range_is_checked_before_count() {
        let start = jan_first(2025);
        assert!(matches!(
            TimeSampler::new(start, start, 0),
            Err(SyzygyError::InvalidRange { .. })
        ));
    }

    #[test]
    fn sampler_rejects_short_sample_count() {
        let start = jan_first(2025);
        let end = jan_first(2026);
        assert_eq!(
            TimeSampler::new(start, end, 1),
            Err(SyzygyError::InvalidSampleCount(1))
        );
        assert_eq!(
            TimeSampler::new(start, end, 0),
            Err(SyzygyError::InvalidSampleCount(0))
        );
    }

    #[test]
    fn sampler_rejects_sub_nanosecond_spacing() {
        let start = jan_first(2025);
        let end = start + Duration::from_nanoseconds(5.0);
        assert_eq!(
            TimeSampler::new(start, end, 10),
            Err(SyzygyError::InvalidSampleCount(10))
        );
    }

    #[test]
    fn sampler_long_fine_grid_stays_strictly_increasing() {
        let start = jan_first(1900);
        let end = jan_first(2100);
        // ~100 ns spacing over two centuries
        let samples = (end - start).total_nanoseconds() / 100 + 1;
        let sampler = TimeSampler::new(start, end, samples as usize).unwrap();
        assert_eq!(sampler.step().total_nanoseconds(), 100);

        let n = sampler.len();
        for i in (n - 2001)..(n - 1) {
            let a = sampler.epoch_at(i).unwrap();
            let b = sampler.epoch_at(i + 1).unwrap();
            assert!(a < b, "samples {i} and {} collapse at {a}", i + 1);
        }
        for i in 1..2000 {
            assert!(sampler.epoch_at(i - 1).unwrap() < sampler.epoch_at(i).unwrap());
        }
        assert_eq!(sampler.epoch_at(n - 1), Some(end));
    }

    #[test]
    fn sampler_step_is_exact_in_nanoseconds() {
        let start = jan_first(2025);
        let sampler = TimeSampler::new(start, start + Duration::from_seconds(1.0), 4).unwrap();
        assert_eq!(sampler.step().total_nanoseconds(), 333_333_333);
        assert_eq!(
            sampler.epoch_at(1).unwrap() - start,
            Duration::from_total_nanoseconds(333_333_333)
        );
        assert_eq!(
            sampler.epoch_at(2).unwrap() - start,
            Duration::from_total_nanoseconds(666_666_666)
        );
    }

    #[test]
    fn utc_minute_stamp() {
        let epoch = Epoch::from_gregorian_utc_hms(2025, 9, 7, 18, 11, 42);
        assert_eq!(fmt_utc_minutes(&epoch), "2025-09-07 18:11 UTC");
    }
}
