//! # Tabulated ephemeris
//!
//! [`TabulatedEphemeris`] serves positions read from precomputed tables, for instance an
//! observer ephemeris exported from JPL Horizons for the site of interest. Each body owns
//! a chronologically sorted list of [`TableRow`]s; requests between two rows are linearly
//! interpolated.
//!
//! ## CSV layout
//!
//! One header line, one row per body and epoch. Columns may come in any order:
//!
//! ```text
//! body,epoch,ecl_lon,ecl_lat,ra,dec,distance_km,altitude,azimuth
//! Moon,2025-09-07T18:00:00 UTC,344.71,-0.30,346.2,-6.1,368912.0,61.2,12.4
//! Sun,2025-09-07T18:00:00 UTC,165.23,0.00,167.0,5.8,151050000.0,-58.0,285.1
//! ```
//!
//! * `body` – name or NAIF id, parsed with [`Body::from_str`](std::str::FromStr).
//! * `epoch` – any string [`hifitime::Epoch`] parses (a missing scale means UTC).
//! * `ra`, `dec` – optional; leave the field empty when unknown.
//!
//! Angles are degrees, distances kilometers, and the rows are assumed to be **topocentric
//! for one site**: the observer passed to the provider methods is not used to correct them.
//!
//! ## Interpolation
//!
//! Longitude-like quantities (ecliptic longitude, right ascension, azimuth) are unwrapped
//! across the 0°/360° seam before interpolating, so a body moving from 359.8° to 0.3°
//! passes through 0.05° and not through 180°.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use hifitime::Epoch;
use itertools::Itertools;
use log::debug;

use crate::constants::{Degree, Kilometer};
use crate::ephemeris::{
    AngularPosition, ApparentPosition, Body, EclipticCoords, EphemerisProvider, EquatorialCoords,
};
use crate::observers::Observer;
use crate::ref_system::wrap_degrees;
use crate::syzygy_errors::{EphemerisError, SyzygyError};

/// One CSV line as found on disk.
#[derive(Debug, serde::Deserialize, PartialEq)]
struct RawRow {
    body: String,
    epoch: String,
    ecl_lon: f64,
    ecl_lat: f64,
    ra: Option<f64>,
    dec: Option<f64>,
    distance_km: f64,
    altitude: f64,
    azimuth: f64,
}

/// A tabulated position of one body at one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub epoch: Epoch,
    pub ecl_lon: Degree,
    pub ecl_lat: Degree,
    /// Right ascension and declination, when the table carries them.
    pub ra_dec: Option<(Degree, Degree)>,
    pub distance: Kilometer,
    pub altitude: Degree,
    pub azimuth: Degree,
}

/// Ephemeris backed by per-body tables.
///
/// See also
/// ------------
/// * [`TabulatedEphemeris::from_reader`] – Load every body from one CSV stream.
/// * [`TabulatedEphemeris::insert_table`] – Register rows built in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabulatedEphemeris {
    tables: BTreeMap<Body, Vec<TableRow>>,
}

/// Interpolate between two angles in degrees, taking the short way around the circle.
fn lerp_angle(a: Degree, b: Degree, fraction: f64) -> Degree {
    let delta = (b - a + 540.0).rem_euclid(360.0) - 180.0;
    wrap_degrees(a + fraction * delta)
}

fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    a + fraction * (b - a)
}

impl TableRow {
    fn interpolate(&self, next: &TableRow, epoch: Epoch) -> TableRow {
        let fraction = (epoch - self.epoch).to_seconds() / (next.epoch - self.epoch).to_seconds();

        let ra_dec = match (self.ra_dec, next.ra_dec) {
            (Some((ra0, dec0)), Some((ra1, dec1))) => {
                Some((lerp_angle(ra0, ra1, fraction), lerp(dec0, dec1, fraction)))
            }
            _ => None,
        };

        TableRow {
            epoch,
            ecl_lon: lerp_angle(self.ecl_lon, next.ecl_lon, fraction),
            ecl_lat: lerp(self.ecl_lat, next.ecl_lat, fraction),
            ra_dec,
            distance: lerp(self.distance, next.distance, fraction),
            altitude: lerp(self.altitude, next.altitude, fraction),
            azimuth: lerp_angle(self.azimuth, next.azimuth, fraction),
        }
    }
}

impl TabulatedEphemeris {
    pub fn new() -> Self {
        TabulatedEphemeris::default()
    }

    /// Register (or replace) the table of `body`.
    ///
    /// Rows are sorted by epoch before being stored.
    ///
    /// Errors
    /// ----------
    /// * [`EphemerisError::EmptyTable`] if `rows` is empty.
    /// * [`EphemerisError::InvalidTable`] if two rows share an epoch or a value is not finite.
    pub fn insert_table(
        &mut self,
        body: Body,
        mut rows: Vec<TableRow>,
    ) -> Result<(), EphemerisError> {
        if rows.is_empty() {
            return Err(EphemerisError::EmptyTable(body.to_string()));
        }

        rows.sort_by(|a, b| a.epoch.cmp(&b.epoch));

        if let Some((a, _)) = rows
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.epoch == b.epoch)
        {
            return Err(EphemerisError::InvalidTable(format!(
                "duplicate epoch {} in the {body} table",
                a.epoch
            )));
        }

        let finite = |row: &TableRow| {
            let (ra, dec) = row.ra_dec.unwrap_or((0.0, 0.0));
            [
                row.ecl_lon,
                row.ecl_lat,
                ra,
                dec,
                row.distance,
                row.altitude,
                row.azimuth,
            ]
            .iter()
            .all(|v| v.is_finite())
        };
        if let Some(row) = rows.iter().find(|row| !finite(row)) {
            return Err(EphemerisError::InvalidTable(format!(
                "non-finite value at {} in the {body} table",
                row.epoch
            )));
        }

        debug!(
            "Tabulated ephemeris: {} rows for {body} from {} to {}",
            rows.len(),
            rows[0].epoch,
            rows[rows.len() - 1].epoch
        );

        self.tables.insert(body, rows);
        Ok(())
    }

    /// Read every table from a CSV stream (see the module docs for the layout).
    ///
    /// Errors
    /// ----------
    /// * [`EphemerisError::InvalidTable`] on malformed CSV, unparsable epochs or duplicate
    ///   epochs.
    /// * [`EphemerisError::UnknownBody`] if a `body` cell names no known body.
    /// * [`EphemerisError::EmptyTable`] if the stream holds no data row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EphemerisError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let rows = csv_reader
            .deserialize::<RawRow>()
            .map(|record| {
                let raw = record.map_err(|e| EphemerisError::InvalidTable(e.to_string()))?;
                let body = Body::from_str(&raw.body)?;
                let epoch = Epoch::from_str(&raw.epoch).map_err(|e| {
                    EphemerisError::InvalidTable(format!("bad epoch '{}': {e}", raw.epoch))
                })?;
                let ra_dec = match (raw.ra, raw.dec) {
                    (Some(ra), Some(dec)) => Some((ra, dec)),
                    (None, None) => None,
                    _ => {
                        return Err(EphemerisError::InvalidTable(format!(
                            "{} row at {epoch} has only one of ra/dec",
                            raw.body
                        )))
                    }
                };
                Ok((
                    body,
                    TableRow {
                        epoch,
                        ecl_lon: wrap_degrees(raw.ecl_lon),
                        ecl_lat: raw.ecl_lat,
                        ra_dec,
                        distance: raw.distance_km,
                        altitude: raw.altitude,
                        azimuth: wrap_degrees(raw.azimuth),
                    },
                ))
            })
            .collect::<Result<Vec<(Body, TableRow)>, EphemerisError>>()?;

        if rows.is_empty() {
            return Err(EphemerisError::EmptyTable("CSV input".into()));
        }

        let mut ephem = TabulatedEphemeris::new();
        for (body, body_rows) in rows.into_iter().into_group_map() {
            ephem.insert_table(body, body_rows)?;
        }
        Ok(ephem)
    }

    /// Open `path` and read it with [`TabulatedEphemeris::from_reader`].
    ///
    /// Errors
    /// ----------
    /// * [`SyzygyError::IoError`] if the file cannot be opened.
    /// * [`SyzygyError::Ephemeris`] wrapping any parsing failure.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SyzygyError> {
        let file = std::fs::File::open(path)?;
        Ok(TabulatedEphemeris::from_reader(std::io::BufReader::new(file))?)
    }

    /// Bodies with a registered table.
    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.tables.keys().copied()
    }

    /// First and last tabulated epochs for `body`.
    pub fn coverage(&self, body: Body) -> Option<(Epoch, Epoch)> {
        let rows = self.tables.get(&body)?;
        Some((rows.first()?.epoch, rows.last()?.epoch))
    }

    /// Row of `body` at `epoch`, interpolated when `epoch` falls between two rows.
    ///
    /// Errors
    /// ----------
    /// * [`EphemerisError::UnknownBody`] if `body` has no table.
    /// * [`EphemerisError::OutOfCoverage`] if `epoch` lies outside the table.
    pub fn row_at(&self, body: Body, epoch: Epoch) -> Result<TableRow, EphemerisError> {
        let rows = self
            .tables
            .get(&body)
            .ok_or_else(|| EphemerisError::UnknownBody(body.to_string()))?;

        let out_of_coverage = || EphemerisError::OutOfCoverage {
            body: body.to_string(),
            epoch,
        };

        // index of the first row strictly after `epoch`
        let idx = rows.partition_point(|row| row.epoch <= epoch);
        if idx == 0 {
            return Err(out_of_coverage());
        }

        let before = &rows[idx - 1];
        if before.epoch == epoch {
            return Ok(*before);
        }
        match rows.get(idx) {
            Some(after) => Ok(before.interpolate(after, epoch)),
            None => Err(out_of_coverage()),
        }
    }
}

impl EphemerisProvider for TabulatedEphemeris {
    fn angular_position(
        &self,
        body: Body,
        _observer: &Observer,
        epoch: Epoch,
    ) -> Result<AngularPosition, EphemerisError> {
        let row = self.row_at(body, epoch)?;
        Ok(AngularPosition {
            ecliptic: EclipticCoords {
                latitude: row.ecl_lat,
                longitude: row.ecl_lon,
            },
            equatorial: row.ra_dec.map(|(ra, dec)| EquatorialCoords {
                right_ascension: ra,
                declination: dec,
                distance: row.distance,
            }),
        })
    }

    fn apparent_alt_az(
        &self,
        body: Body,
        _observer: &Observer,
        epoch: Epoch,
    ) -> Result<ApparentPosition, EphemerisError> {
        let row = self.row_at(body, epoch)?;
        Ok(ApparentPosition {
            altitude: row.altitude,
            azimuth: row.azimuth,
            distance: row.distance,
        })
    }
}
