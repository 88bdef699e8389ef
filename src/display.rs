//! # Tabular display for visibility reports
//!
//! Zero-copy renderers that print a slice of [`VisibilityEntry`] produced by
//! [`VisibilityReporter::report`](crate::visibility::VisibilityReporter::report).
//!
//! Two layouts are available through [`ReportDisplay`]:
//!
//! - **Compact** (fixed-width lines, one per candidate):
//!   `YYYY-MM-DD HH:MM UTC  visible        alt  +58.23°`
//! - **Table** (uses `comfy-table`): adds azimuth and the deviations that made the
//!   sample match, `# | UTC | Visibility | Alt [°] | Az [°] | Δλ [°] | |Δλ−180| [°] | |β| [°]`
//!
//! ## Units & conventions
//!
//! - Times are printed in **UTC**, truncated to the minute.
//! - Angles are **degrees**; azimuth from North through East.
//!
//! ## Quick examples
//!
//! ```rust,ignore
//! use syzygy::display::ReportDisplayExt;
//!
//! println!("{}", entries.show());                       // compact
//! println!("{}", entries.table().with_angle_precision(3)); // comfy-table
//! ```
//!
//! [`comfy-table`]: https://crates.io/crates/comfy-table
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::observers::Observer;
use crate::time::fmt_utc_minutes;
use crate::visibility::VisibilityEntry;

/// Layout selector for [`ReportDisplay`].
enum ReportMode {
    Compact,
    Table,
}

/// Display adaptor rendering visibility entries.
///
/// See also
/// ------------
/// * [`ReportDisplayExt`] – Builders on `[VisibilityEntry]`.
pub struct ReportDisplay<'a> {
    entries: &'a [VisibilityEntry],
    /// Printed in the title line when set.
    observer: Option<&'a Observer>,
    mode: ReportMode,
    /// Fractional digits for angles (default = 2).
    angle_prec: usize,
}

impl<'a> ReportDisplay<'a> {
    /// Compact adaptor over `entries`.
    pub fn new(entries: &'a [VisibilityEntry]) -> Self {
        Self {
            entries,
            observer: None,
            mode: ReportMode::Compact,
            angle_prec: 2,
        }
    }

    /// Switch to the comfy-table layout.
    pub fn table(mut self) -> Self {
        self.mode = ReportMode::Table;
        self
    }

    /// Name the observing site in the title line.
    pub fn with_observer(mut self, observer: &'a Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_angle_precision(mut self, p: usize) -> Self {
        self.angle_prec = p;
        self
    }

    fn render_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("#"),
            Cell::new("UTC"),
            Cell::new("Visibility"),
            Cell::new("Alt [°]"),
            Cell::new("Az [°]"),
            Cell::new("Δλ [°]"),
            Cell::new("|Δλ−180| [°]"),
            Cell::new("|β| [°]"),
        ]);

        let p = self.angle_prec;
        for (i, entry) in self.entries.iter().enumerate() {
            let verdict = &entry.candidate.verdict;
            table.add_row(Row::from(vec![
                Cell::new(i).set_alignment(CellAlignment::Right),
                Cell::new(fmt_utc_minutes(&entry.candidate.epoch)),
                Cell::new(entry.visibility),
                Cell::new(format!("{:+.*}", p, entry.apparent.altitude))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.*}", p, entry.apparent.azimuth))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.*}", p, verdict.longitude_separation))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.*}", p, verdict.opposition_deviation))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.*}", p, verdict.latitude_deviation))
                    .set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }
}

/// Builders for [`ReportDisplay`] on a slice of entries.
pub trait ReportDisplayExt {
    /// Compact fixed-width listing.
    fn show(&self) -> ReportDisplay<'_>;

    /// comfy-table listing with azimuth and deviations.
    fn table(&self) -> ReportDisplay<'_> {
        self.show().table()
    }
}

impl ReportDisplayExt for [VisibilityEntry] {
    fn show(&self) -> ReportDisplay<'_> {
        ReportDisplay::new(self)
    }
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible = self
            .entries
            .iter()
            .filter(|e| e.visibility.is_visible())
            .count();
        match self.observer {
            Some(site) => writeln!(
                f,
                "Eclipse candidates from {site} (n={}, visible={visible})",
                self.entries.len()
            )?,
            None => writeln!(
                f,
                "Eclipse candidates (n={}, visible={visible})",
                self.entries.len()
            )?,
        }

        match self.mode {
            ReportMode::Table => f.write_str(&self.render_table())?,
            ReportMode::Compact => {
                for entry in self.entries {
                    let (epoch, visibility, altitude) = entry.summary();
                    writeln!(
                        f,
                        "{}  {:<13}  alt {:>+8.p$}°",
                        fmt_utc_minutes(&epoch),
                        visibility.to_string(),
                        altitude,
                        p = self.angle_prec
                    )?;
                }
            }
        }
        Ok(())
    }
}
