mod common;

use hifitime::{Duration, Epoch};
use syzygy::eclipse::clustering::cluster_candidates;
use syzygy::eclipse::search::{search_eclipses, EclipseSearch};
use syzygy::eclipse::{SearchParams, ToleranceConfig};
use syzygy::ephemeris::lunisolar::LunisolarEphemeris;
use syzygy::ephemeris::tabulated::{TableRow, TabulatedEphemeris};
use syzygy::ephemeris::{Body, EphemerisProvider};
use syzygy::time::TimeSampler;
use syzygy::visibility::{Visibility, VisibilityReporter};

use crate::common::{assert_chronological, jakarta, utc};

fn within(epoch: Epoch, center: Epoch, half_width: Duration) -> bool {
    (epoch - center).abs() <= half_width
}

#[test]
fn september_total_eclipse_seen_from_jakarta() {
    let _ = env_logger::builder().is_test(true).try_init();

    let site = jakarta();
    let params = SearchParams::builder()
        .start(utc(2025, 9, 7, 12, 0))
        .end(utc(2025, 9, 8, 0, 0))
        .samples(721)
        .build()
        .unwrap();

    let found = search_eclipses(&LunisolarEphemeris, &site, &params).unwrap();
    assert!(!found.is_empty());
    assert_chronological(&found);

    let maximum = utc(2025, 9, 7, 18, 11);
    for candidate in &found {
        assert!(
            within(candidate.epoch, maximum, Duration::from_hours(3.0)),
            "spurious candidate at {}",
            candidate.epoch
        );
        assert!(candidate.verdict.opposition_deviation <= 0.75);
        assert!(candidate.verdict.latitude_deviation <= 0.75);
    }

    let events = cluster_candidates(&found, Duration::from_seconds(90.0));
    assert_eq!(events.len(), 1);
    let peak = &events[0].peak;
    assert!(within(peak.epoch, maximum, Duration::from_hours(1.0)));

    let report = VisibilityReporter::new(&LunisolarEphemeris, &site)
        .report(std::slice::from_ref(peak))
        .unwrap();
    assert_eq!(report[0].visibility, Visibility::Visible);
    assert!(report[0].apparent.altitude > 30.0);
}

#[test]
fn mid_april_full_moon_is_far_from_the_ecliptic() {
    let site = jakarta();
    let params = SearchParams::builder()
        .start(utc(2025, 4, 10, 0, 0))
        .end(utc(2025, 4, 16, 0, 0))
        .samples(2000)
        .build()
        .unwrap();

    let found = search_eclipses(&LunisolarEphemeris, &site, &params).unwrap();
    assert!(found.is_empty());
}

#[test]
fn year_2025_only_matches_near_the_two_eclipses() {
    let site = jakarta();
    let params = SearchParams::default();
    let found = search_eclipses(&LunisolarEphemeris, &site, &params).unwrap();
    assert_chronological(&found);

    let march = utc(2025, 3, 14, 6, 58);
    let september = utc(2025, 9, 7, 18, 11);
    let one_day = Duration::from_days(1.0);
    for candidate in &found {
        assert!(
            within(candidate.epoch, march, one_day) || within(candidate.epoch, september, one_day),
            "spurious candidate at {}",
            candidate.epoch
        );
    }
    assert!(found
        .iter()
        .any(|c| within(c.epoch, september, one_day)));

    // the March eclipse happens in the Jakarta afternoon, before moonrise
    let report = VisibilityReporter::new(&LunisolarEphemeris, &site)
        .report(&found)
        .unwrap();
    for entry in &report {
        if within(entry.candidate.epoch, march, one_day) {
            assert_eq!(entry.visibility, Visibility::BelowHorizon);
        } else {
            assert_eq!(entry.visibility, Visibility::Visible);
        }
    }
}

#[test]
fn tabulated_nodes_reproduce_the_analytic_search() {
    let site = jakarta();
    let sampler = TimeSampler::new(utc(2025, 9, 7, 15, 0), utc(2025, 9, 7, 21, 0), 37).unwrap();

    let mut table = TabulatedEphemeris::new();
    for body in [Body::Moon, Body::Sun] {
        let rows = sampler
            .iter()
            .map(|epoch| {
                let angular = LunisolarEphemeris
                    .angular_position(body, &site, epoch)
                    .unwrap();
                let apparent = LunisolarEphemeris
                    .apparent_alt_az(body, &site, epoch)
                    .unwrap();
                TableRow {
                    epoch,
                    ecl_lon: angular.longitude(),
                    ecl_lat: angular.latitude(),
                    ra_dec: None,
                    distance: apparent.distance,
                    altitude: apparent.altitude,
                    azimuth: apparent.azimuth,
                }
            })
            .collect();
        table.insert_table(body, rows).unwrap();
    }

    let tolerance = ToleranceConfig::STRICT;
    let analytic = EclipseSearch::new(&LunisolarEphemeris, &site, Body::Moon, Body::Sun, tolerance)
        .run(&sampler)
        .unwrap();
    let tabulated = EclipseSearch::new(&table, &site, Body::Moon, Body::Sun, tolerance)
        .run(&sampler)
        .unwrap();

    assert!(!analytic.is_empty());
    assert_eq!(analytic.len(), tabulated.len());
    for (a, t) in analytic.iter().zip(tabulated.iter()) {
        assert_eq!(a.epoch, t.epoch);
        assert_eq!(a.verdict, t.verdict);
    }

    let visible = VisibilityReporter::new(&table, &site)
        .report(&tabulated)
        .unwrap();
    assert!(visible.iter().all(|e| e.visibility.is_visible()));
}
