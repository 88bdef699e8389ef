//! Opposition/latitude predicate.
//!
//! Pure geometry on two [`AngularPosition`]s: no provider is queried here, so the
//! predicate can be exercised with hand-made positions.

use hifitime::Epoch;
use log::trace;

use crate::constants::{Degree, OPPOSITION};
use crate::eclipse::ToleranceConfig;
use crate::ephemeris::AngularPosition;
use crate::observers::Observer;

/// Outcome of the predicate at one instant, with the raw deviations it was decided on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseVerdict {
    pub matched: bool,
    /// Folded ecliptic longitude separation, `[0, 180]` degrees.
    pub longitude_separation: Degree,
    /// `|separation − 180°|`, `[0, 180]` degrees.
    pub opposition_deviation: Degree,
    /// `|β|` of the target, degrees.
    pub latitude_deviation: Degree,
}

/// Angular distance between two longitudes, folded into `[0, 180]` degrees.
///
/// The raw difference is first reduced modulo 360 (Euclidean, so always non-negative),
/// then reflected: `min(d, 360 − d)`. Longitudes 359° and 1° are thus 2° apart, not 358°.
///
/// ```rust
/// use syzygy::eclipse::evaluator::fold_longitude_separation;
///
/// assert_eq!(fold_longitude_separation(359.0, 1.0), 2.0);
/// assert_eq!(fold_longitude_separation(10.0, 190.0), 180.0);
/// ```
pub fn fold_longitude_separation(lon_a: Degree, lon_b: Degree) -> Degree {
    let d = (lon_a - lon_b).abs().rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Decide whether `target` stands opposite `reference` and close enough to the ecliptic.
///
/// Arguments
/// -----------------
/// * `observer`: Site the positions were computed for.
/// * `epoch`: Instant the positions refer to.
/// * `target`: Position of the body whose latitude is tested (the Moon).
/// * `reference`: Position of the body to be opposite of (the Sun).
/// * `tolerance`: Angular tolerances.
///
/// Return
/// ----------
/// * An [`EclipseVerdict`], matched iff
///   `|sep − 180°| ≤ opposition_tolerance` and `|β_target| ≤ latitude_tolerance`.
///   Both bounds are inclusive.
///
/// The predicate is not symmetric: only the target's latitude is tested, the reference's
/// latitude is ignored.
pub fn evaluate(
    observer: &Observer,
    epoch: Epoch,
    target: &AngularPosition,
    reference: &AngularPosition,
    tolerance: &ToleranceConfig,
) -> EclipseVerdict {
    let longitude_separation = fold_longitude_separation(target.longitude(), reference.longitude());
    let opposition_deviation = (longitude_separation - OPPOSITION).abs();
    let latitude_deviation = target.latitude().abs();

    let matched = opposition_deviation <= tolerance.opposition_tolerance()
        && latitude_deviation <= tolerance.latitude_tolerance();

    trace!(
        "{observer} @ {epoch}: Δλ={longitude_separation:.4}° opp_dev={opposition_deviation:.4}° |β|={latitude_deviation:.4}° → {matched}"
    );

    EclipseVerdict {
        matched,
        longitude_separation,
        opposition_deviation,
        latitude_deviation,
    }
}
