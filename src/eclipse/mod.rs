//! # Eclipse-condition search
//!
//! A lunar eclipse can only happen when, seen from the observer, the Moon stands opposite
//! the Sun (ecliptic longitudes 180° apart) **and** close to the ecliptic (small ecliptic
//! latitude). This module samples a time interval and keeps the instants where both
//! conditions hold within configurable tolerances.
//!
//! ## Pipeline
//!
//! ```text
//! TimeSampler ──▶ EphemerisProvider ──▶ evaluate() ──▶ Vec<EclipseCandidate> ──▶ VisibilityReporter
//!   (time)          (positions)        (predicate)        (chronological)           (alt > 0 ?)
//! ```
//!
//! - [`evaluator`] – the pure opposition/latitude predicate.
//! - [`search`] – [`EclipseSearch`](search::EclipseSearch) drives the sampling loop,
//!   sequentially or (feature `parallel`) on the rayon pool.
//! - [`clustering`] – optional post-processing that merges runs of adjacent candidates
//!   into [`EclipseEvent`](clustering::EclipseEvent)s.
//!
//! ## Configuration
//!
//! [`ToleranceConfig`] holds the two angular tolerances, [`SearchParams`] bundles the
//! interval, the sample count, the tolerances and the body pair. Both validate on
//! construction so that a search never starts with a bad configuration.
//!
//! ## Quick start
//!
//! ```rust
//! use hifitime::Epoch;
//! use syzygy::eclipse::{search::search_eclipses, SearchParams};
//! use syzygy::ephemeris::lunisolar::LunisolarEphemeris;
//! use syzygy::observers::Observer;
//!
//! let site = Observer::new(-6.2088, 106.8456, 8.0, Some("Jakarta".into()))?;
//! let params = SearchParams::builder()
//!     .start(Epoch::from_gregorian_utc_hms(2025, 9, 7, 12, 0, 0))
//!     .end(Epoch::from_gregorian_utc_at_midnight(2025, 9, 8))
//!     .samples(721)
//!     .build()?;
//!
//! let candidates = search_eclipses(&LunisolarEphemeris, &site, &params)?;
//! assert!(!candidates.is_empty());
//! # Ok::<(), syzygy::syzygy_errors::SyzygyError>(())
//! ```

use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use hifitime::{Duration, Epoch};

use crate::constants::Degree;
use crate::ephemeris::{AngularPosition, Body};
use crate::syzygy_errors::SyzygyError;
use crate::time::TimeSampler;

pub mod clustering;
pub mod evaluator;
pub mod search;

pub use evaluator::EclipseVerdict;

/// Angular tolerances of the eclipse predicate, in degrees.
///
/// * `opposition_tolerance` – maximum |Δλ − 180°| between target and reference.
/// * `latitude_tolerance` – maximum |β| of the target.
///
/// Both are non-negative; zero is allowed and only matches exact geometry.
///
/// Presets
/// -----------------
/// * [`ToleranceConfig::STRICT`] – 0.75° / 0.75°, the [`Default`].
/// * [`ToleranceConfig::WIDE`] – 5° / 1°, catches the approach to opposition hours
///   before the tight window opens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceConfig {
    opposition_tolerance: Degree,
    latitude_tolerance: Degree,
}

impl ToleranceConfig {
    pub const STRICT: ToleranceConfig = ToleranceConfig {
        opposition_tolerance: 0.75,
        latitude_tolerance: 0.75,
    };

    pub const WIDE: ToleranceConfig = ToleranceConfig {
        opposition_tolerance: 5.0,
        latitude_tolerance: 1.0,
    };

    /// Build a tolerance pair.
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::InvalidTolerance`] if either value is negative, NaN or infinite.
    pub fn new(
        opposition_tolerance: Degree,
        latitude_tolerance: Degree,
    ) -> Result<Self, SyzygyError> {
        for (name, value) in [
            ("opposition_tolerance", opposition_tolerance),
            ("latitude_tolerance", latitude_tolerance),
        ] {
            let non_negative = matches!(value.partial_cmp(&0.0), Some(Greater) | Some(Equal));
            if !non_negative || !value.is_finite() {
                return Err(SyzygyError::InvalidTolerance(format!(
                    "{name} must be a finite value >= 0, got {value}"
                )));
            }
        }
        Ok(ToleranceConfig {
            opposition_tolerance,
            latitude_tolerance,
        })
    }

    /// Same tolerance on both conditions.
    pub fn uniform(tolerance: Degree) -> Result<Self, SyzygyError> {
        ToleranceConfig::new(tolerance, tolerance)
    }

    pub fn opposition_tolerance(&self) -> Degree {
        self.opposition_tolerance
    }

    pub fn latitude_tolerance(&self) -> Degree {
        self.latitude_tolerance
    }
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        ToleranceConfig::STRICT
    }
}

impl fmt::Display for ToleranceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|Δλ−180°| ≤ {:.3}°, |β| ≤ {:.3}°",
            self.opposition_tolerance, self.latitude_tolerance
        )
    }
}

/// A sampled instant at which the eclipse predicate holds.
///
/// Snapshots of both positions are kept so that a report can show what was matched
/// without querying the provider again.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseCandidate {
    pub epoch: Epoch,
    /// Body whose ecliptic latitude was tested (normally the Moon).
    pub target: Body,
    pub target_position: AngularPosition,
    pub reference_position: AngularPosition,
    pub verdict: EclipseVerdict,
}

/// Full configuration of one eclipse search.
///
/// Defaults
/// -----------------
/// * `start`: 2025-01-01 00:00 UTC
/// * `end`: 2026-01-01 00:00 UTC
/// * `samples`: 5000 (≈ 1 h 45 min spacing over one year)
/// * `tolerance`: [`ToleranceConfig::STRICT`]
/// * `target`: [`Body::Moon`]
/// * `reference`: [`Body::Sun`]
///
/// See also
/// -----------------
/// * [`SearchParams::builder`] – Fluent construction with validation.
/// * [`search::search_eclipses`] – Runs a search from these parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub start: Epoch,
    pub end: Epoch,
    pub samples: usize,
    pub tolerance: ToleranceConfig,
    pub target: Body,
    pub reference: Body,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SearchParamsBuilder`] initialized with the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hifitime::Epoch;
    /// use syzygy::eclipse::SearchParams;
    ///
    /// let params = SearchParams::builder()
    ///     .start(Epoch::from_gregorian_utc_at_midnight(2026, 1, 1))
    ///     .end(Epoch::from_gregorian_utc_at_midnight(2027, 1, 1))
    ///     .samples(10_000)
    ///     .tolerances(5.0, 1.0)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.samples, 10_000);
    /// ```
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::new()
    }

    /// Time grid described by these parameters.
    ///
    /// Errors
    /// ----------
    /// * Same as [`TimeSampler::new`].
    pub fn sampler(&self) -> Result<TimeSampler, SyzygyError> {
        TimeSampler::new(self.start, self.end, self.samples)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            start: Epoch::from_gregorian_utc_at_midnight(2025, 1, 1),
            end: Epoch::from_gregorian_utc_at_midnight(2026, 1, 1),
            samples: 5000,
            tolerance: ToleranceConfig::STRICT,
            target: Body::Moon,
            reference: Body::Sun,
        }
    }
}

/// Builder for [`SearchParams`], with validation.
#[derive(Debug, Clone)]
pub struct SearchParamsBuilder {
    params: SearchParams,
    opposition_tolerance: Degree,
    latitude_tolerance: Degree,
}

impl Default for SearchParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchParamsBuilder {
    pub fn new() -> Self {
        let params = SearchParams::default();
        Self {
            opposition_tolerance: params.tolerance.opposition_tolerance(),
            latitude_tolerance: params.tolerance.latitude_tolerance(),
            params,
        }
    }

    pub fn start(mut self, v: Epoch) -> Self {
        self.params.start = v;
        self
    }

    pub fn end(mut self, v: Epoch) -> Self {
        self.params.end = v;
        self
    }

    pub fn samples(mut self, v: usize) -> Self {
        self.params.samples = v;
        self
    }

    pub fn opposition_tolerance(mut self, v: Degree) -> Self {
        self.opposition_tolerance = v;
        self
    }

    pub fn latitude_tolerance(mut self, v: Degree) -> Self {
        self.latitude_tolerance = v;
        self
    }

    pub fn tolerances(self, opposition: Degree, latitude: Degree) -> Self {
        self.opposition_tolerance(opposition)
            .latitude_tolerance(latitude)
    }

    pub fn tolerance(self, v: ToleranceConfig) -> Self {
        self.tolerances(v.opposition_tolerance(), v.latitude_tolerance())
    }

    pub fn target(mut self, v: Body) -> Self {
        self.params.target = v;
        self
    }

    pub fn reference(mut self, v: Body) -> Self {
        self.params.reference = v;
        self
    }

    /// Finalize the builder and produce a [`SearchParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// Checked in this order, the first failure is returned:
    ///
    /// * `end > start` – otherwise [`SyzygyError::InvalidRange`].
    /// * `samples ≥ 2` – otherwise [`SyzygyError::InvalidSampleCount`].
    /// * both tolerances finite and `≥ 0` – otherwise [`SyzygyError::InvalidTolerance`].
    /// * `target != reference` – otherwise [`SyzygyError::InvalidSearchParameter`].
    pub fn build(mut self) -> Result<SearchParams, SyzygyError> {
        let p = &self.params;

        if p.end <= p.start {
            return Err(SyzygyError::InvalidRange {
                start: p.start,
                end: p.end,
            });
        }
        if p.samples < 2 {
            return Err(SyzygyError::InvalidSampleCount(p.samples));
        }

        let tolerance = ToleranceConfig::new(self.opposition_tolerance, self.latitude_tolerance)?;

        if p.target == p.reference {
            return Err(SyzygyError::InvalidSearchParameter(format!(
                "target and reference must differ, both are {}",
                p.target
            )));
        }

        self.params.tolerance = tolerance;
        Ok(self.params)
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Eclipse Search Parameters")?;
            writeln!(f, "-------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.chars().count() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.chars().count())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            line!("start     = {}", self.start, "First sampled instant")?;
            line!("end       = {}", self.end, "Last sampled instant")?;
            line!("samples   = {}", self.samples, "Instants, endpoints included")?;
            line!(
                "step      = {}",
                Duration::from_seconds(
                    (self.end - self.start).to_seconds() / (self.samples.max(2) - 1) as f64
                ),
                "Spacing between samples"
            )?;
            line!(
                "opposition= {:.3}°",
                self.tolerance.opposition_tolerance(),
                "Max |Δλ − 180°|"
            )?;
            line!(
                "latitude  = {:.3}°",
                self.tolerance.latitude_tolerance(),
                "Max |β| of the target"
            )?;
            line!("target    = {}", self.target, "Body tested against the ecliptic")?;
            line!("reference = {}", self.reference, "Body to stand opposite of")?;
            Ok(())
        } else {
            write!(
                f,
                "SearchParams({} → {}, samples={}, {} opposite {}, {})",
                self.start, self.end, self.samples, self.target, self.reference, self.tolerance
            )
        }
    }
}
