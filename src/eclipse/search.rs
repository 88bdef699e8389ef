//! # Sampling loop
//!
//! [`EclipseSearch`] ties a provider, an observer, a body pair and a tolerance together
//! and scans a [`TimeSampler`]:
//!
//! ```text
//! for t in sampler:
//!     target    = provider.angular_position(target, observer, t)?
//!     reference = provider.angular_position(reference, observer, t)?
//!     if evaluate(observer, t, target, reference, tolerance).matched:
//!         push EclipseCandidate { t, … }
//! ```
//!
//! Properties
//! -----------------
//! * **Chronological** – candidates come out in sample order, no sorting involved.
//! * **No deduplication** – a physical event spanning several samples yields a run of
//!   adjacent candidates. See [`cluster_candidates`](crate::eclipse::clustering::cluster_candidates)
//!   to merge them.
//! * **All or nothing** – the first provider error aborts the scan and is returned as
//!   [`SyzygyError::Ephemeris`]; no partial list is ever produced.
//! * **Idempotent** – with a deterministic provider, two runs over the same sampler give
//!   equal results.
//!
//! Cargo features
//! -----------------
//! * `parallel` – adds [`EclipseSearch::run_parallel`], which spreads samples over the
//!   rayon pool and gathers per-sample results back in sample order.
//! * `progress` – shows an `indicatif` progress bar during [`EclipseSearch::run`].

use hifitime::Epoch;
use log::{debug, info, warn};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::eclipse::evaluator::evaluate;
use crate::eclipse::{EclipseCandidate, SearchParams, ToleranceConfig};
use crate::ephemeris::{Body, EphemerisProvider};
use crate::observers::Observer;
use crate::syzygy_errors::SyzygyError;
use crate::time::TimeSampler;

/// A configured eclipse search, ready to scan any number of samplers.
///
/// The search borrows the provider and the observer; it holds no result state between
/// runs, each [`EclipseSearch::run`] returns a fresh `Vec`.
#[derive(Debug, Clone)]
pub struct EclipseSearch<'a, P: EphemerisProvider> {
    provider: &'a P,
    observer: &'a Observer,
    target: Body,
    reference: Body,
    tolerance: ToleranceConfig,
}

impl<'a, P: EphemerisProvider> EclipseSearch<'a, P> {
    /// Arguments
    /// -----------------
    /// * `provider`: Source of body positions.
    /// * `observer`: Site the sky is seen from.
    /// * `target`: Body tested for opposition and small latitude (the Moon).
    /// * `reference`: Body to stand opposite of (the Sun).
    /// * `tolerance`: Angular tolerances of the predicate.
    pub fn new(
        provider: &'a P,
        observer: &'a Observer,
        target: Body,
        reference: Body,
        tolerance: ToleranceConfig,
    ) -> Self {
        EclipseSearch {
            provider,
            observer,
            target,
            reference,
            tolerance,
        }
    }

    /// Search configured from validated [`SearchParams`].
    pub fn from_params(provider: &'a P, observer: &'a Observer, params: &SearchParams) -> Self {
        EclipseSearch::new(
            provider,
            observer,
            params.target,
            params.reference,
            params.tolerance,
        )
    }

    pub fn tolerance(&self) -> &ToleranceConfig {
        &self.tolerance
    }

    /// Fetch both positions at `epoch` and evaluate the predicate.
    ///
    /// Return
    /// ----------
    /// * `Ok(Some(candidate))` on a match, `Ok(None)` otherwise.
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::Ephemeris`] if either position cannot be obtained.
    pub fn evaluate_at(&self, epoch: Epoch) -> Result<Option<EclipseCandidate>, SyzygyError> {
        let fetch = |body: Body| {
            self.provider
                .angular_position(body, self.observer, epoch)
                .map_err(|err| {
                    warn!("Eclipse search aborted at {epoch}: cannot position {body}: {err}");
                    SyzygyError::from(err)
                })
        };

        let target_position = fetch(self.target)?;
        let reference_position = fetch(self.reference)?;

        let verdict = evaluate(
            self.observer,
            epoch,
            &target_position,
            &reference_position,
            &self.tolerance,
        );

        if !verdict.matched {
            return Ok(None);
        }

        debug!(
            "Candidate at {epoch}: opposition deviation {:.4}°, |β| {:.4}°",
            verdict.opposition_deviation, verdict.latitude_deviation
        );

        Ok(Some(EclipseCandidate {
            epoch,
            target: self.target,
            target_position,
            reference_position,
            verdict,
        }))
    }

    fn log_start(&self, sampler: &TimeSampler) {
        debug!(
            "Eclipse search: {} opposite {} seen from {}, {} samples from {} to {} (step {}), {}",
            self.target,
            self.reference,
            self.observer,
            sampler.len(),
            sampler.start(),
            sampler.end(),
            sampler.step(),
            self.tolerance
        );
    }

    fn log_summary(&self, sampler: &TimeSampler, candidates: &[EclipseCandidate]) {
        info!(
            "Eclipse search over {} samples found {} candidate(s)",
            sampler.len(),
            candidates.len()
        );
    }

    /// Scan `sampler` in order and collect every matching instant.
    ///
    /// Return
    /// ----------
    /// * Chronological list of candidates; empty when nothing matched.
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::Ephemeris`] on the first provider failure.
    pub fn run(&self, sampler: &TimeSampler) -> Result<Vec<EclipseCandidate>, SyzygyError> {
        self.log_start(sampler);

        #[cfg(feature = "progress")]
        let pb = {
            let pb = ProgressBar::new(sampler.len() as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
            ) {
                pb.set_style(style);
            }
            pb
        };

        let mut candidates = Vec::new();
        for epoch in sampler {
            if let Some(candidate) = self.evaluate_at(epoch)? {
                candidates.push(candidate);
                #[cfg(feature = "progress")]
                pb.set_message(format!("{} candidate(s)", candidates.len()));
            }
            #[cfg(feature = "progress")]
            pb.inc(1);
        }

        #[cfg(feature = "progress")]
        pb.finish_and_clear();

        self.log_summary(sampler, &candidates);
        Ok(candidates)
    }
}

#[cfg(feature = "parallel")]
impl<P: EphemerisProvider + Sync> EclipseSearch<'_, P> {
    /// Parallel counterpart of [`EclipseSearch::run`].
    ///
    /// Every sample is evaluated independently on the rayon pool; the per-sample
    /// outcomes are collected in sample order and only then filtered, so the result is
    /// identical to the sequential scan.
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::Ephemeris`] if any sample fails. Which failing sample is reported
    ///   is not specified when several fail.
    pub fn run_parallel(
        &self,
        sampler: &TimeSampler,
    ) -> Result<Vec<EclipseCandidate>, SyzygyError> {
        self.log_start(sampler);

        let epochs: Vec<Epoch> = sampler.iter().collect();
        let outcomes: Vec<Option<EclipseCandidate>> = epochs
            .par_iter()
            .map(|epoch| self.evaluate_at(*epoch))
            .collect::<Result<_, SyzygyError>>()?;

        let candidates: Vec<EclipseCandidate> = outcomes.into_iter().flatten().collect();
        self.log_summary(sampler, &candidates);
        Ok(candidates)
    }
}

/// Validate `params`, build the sampler and run the search.
///
/// Configuration problems are reported before any position is requested.
///
/// Errors
/// ----------
/// * [`SyzygyError::InvalidRange`] / [`SyzygyError::InvalidSampleCount`] from the sampler.
/// * [`SyzygyError::InvalidSearchParameter`] if target and reference are the same body.
/// * [`SyzygyError::Ephemeris`] if the provider fails during the scan.
///
/// See also
/// ------------
/// * [`VisibilityReporter`](crate::visibility::VisibilityReporter) – classify the result.
pub fn search_eclipses<P: EphemerisProvider>(
    provider: &P,
    observer: &Observer,
    params: &SearchParams,
) -> Result<Vec<EclipseCandidate>, SyzygyError> {
    let sampler = params.sampler()?;
    if params.target == params.reference {
        return Err(SyzygyError::InvalidSearchParameter(format!(
            "target and reference must differ, both are {}",
            params.target
        )));
    }
    EclipseSearch::from_params(provider, observer, params).run(&sampler)
}
