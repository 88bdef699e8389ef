//! # Syzygy
//!
//! Sampled search for lunar-eclipse geometry seen from a ground site: the Moon opposite
//! the Sun and close to the ecliptic, followed by a visible / below-horizon verdict for
//! each matching instant.
//!
//! ```rust,no_run
//! use syzygy::eclipse::{search::search_eclipses, SearchParams};
//! use syzygy::ephemeris::lunisolar::LunisolarEphemeris;
//! use syzygy::observers::Observer;
//! use syzygy::visibility::VisibilityReporter;
//! use syzygy::display::ReportDisplayExt;
//!
//! let jakarta = Observer::new(-6.2088, 106.8456, 8.0, Some("Jakarta".into()))?;
//! let params = SearchParams::default(); // 2025, 5000 samples, 0.75° tolerances
//!
//! let candidates = search_eclipses(&LunisolarEphemeris, &jakarta, &params)?;
//! let report = VisibilityReporter::new(&LunisolarEphemeris, &jakarta).report(&candidates)?;
//! println!("{}", report.table().with_observer(&jakarta));
//! # Ok::<(), syzygy::syzygy_errors::SyzygyError>(())
//! ```

pub mod constants;
pub mod display;
pub mod earth_orientation;
pub mod eclipse;
pub mod ephemeris;
pub mod observers;
pub mod ref_system;
pub mod syzygy_errors;
pub mod time;
pub mod visibility;
