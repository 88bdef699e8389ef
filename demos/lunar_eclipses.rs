use std::env;

use hifitime::{Duration, Epoch};
use syzygy::display::ReportDisplayExt;
use syzygy::eclipse::clustering::cluster_candidates;
use syzygy::eclipse::search::search_eclipses;
use syzygy::eclipse::SearchParams;
use syzygy::ephemeris::lunisolar::LunisolarEphemeris;
use syzygy::ephemeris::tabulated::TabulatedEphemeris;
use syzygy::ephemeris::EphemerisProvider;
use syzygy::observers::Observer;
use syzygy::syzygy_errors::SyzygyError;
use syzygy::visibility::VisibilityReporter;

/// Search one calendar year for lunar-eclipse geometry and print the visibility report.
///
/// Arguments
/// -----------------
/// * `provider`: Source of Moon and Sun positions.
/// * `site`: Ground observer.
/// * `year`: Calendar year scanned from January 1st to January 1st.
/// * `table`: Use the comfy-table layout instead of the compact listing.
///
/// Errors
/// ----------
/// * Any [`SyzygyError`] raised by the search or the report.
fn run_year<P: EphemerisProvider>(
    provider: &P,
    site: &Observer,
    year: i32,
    table: bool,
) -> Result<(), SyzygyError> {
    let params = SearchParams::builder()
        .start(Epoch::from_gregorian_utc_at_midnight(year, 1, 1))
        .end(Epoch::from_gregorian_utc_at_midnight(year + 1, 1, 1))
        .samples(5000)
        .tolerances(0.75, 0.75)
        .build()?;
    println!("{params:#}");

    let candidates = search_eclipses(provider, site, &params)?;
    let report = VisibilityReporter::new(provider, site).report(&candidates)?;

    if table {
        println!("{}", report.table().with_observer(site));
    } else {
        println!("{}", report.show().with_observer(site));
    }

    let max_gap = Duration::from_seconds(params.sampler()?.step().to_seconds() * 1.5);
    for event in cluster_candidates(&candidates, max_gap) {
        println!("{event}");
    }
    Ok(())
}

/// Usage:
///   lunar_eclipses [YEAR] [--table] [--csv PATH]
/// Example:
///   RUST_LOG=debug cargo run --example lunar_eclipses -- 2025 --table
fn main() -> Result<(), SyzygyError> {
    env_logger::init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let table = if let Some(pos) = args.iter().position(|a| a == "--table") {
        args.remove(pos);
        true
    } else {
        false
    };
    let csv = if let Some(pos) = args.iter().position(|a| a == "--csv") {
        args.remove(pos);
        (pos < args.len()).then(|| args.remove(pos))
    } else {
        None
    };

    let year = match args.first() {
        Some(y) => y.parse::<i32>().map_err(|e| {
            SyzygyError::InvalidSearchParameter(format!("invalid year {y:?}: {e}"))
        })?,
        None => 2025,
    };

    let jakarta = Observer::new(-6.2088, 106.8456, 8.0, Some("Jakarta".into()))?;

    match csv {
        Some(path) => run_year(&TabulatedEphemeris::from_path(path)?, &jakarta, year, table),
        None => run_year(&LunisolarEphemeris, &jakarta, year, table),
    }
}
