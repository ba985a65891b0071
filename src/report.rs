//! Report views and named output tables.
//!
//! A [`Report`] owns the reconciled rows once; the full, mismatch and overlap
//! views are borrowed filters over those rows. [`NamedTable`] is the
//! rendering-ready form shared by the terminal printer, the CSV writer and the
//! workbook writer.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::{ReportLayout, ReportView},
    io_utils,
    reconcile::{ReconciliationRow, Status},
    xlsx,
};

pub const REPORT_HEADERS: [&str; 6] = [
    "Guest Name",
    "Check-in Date",
    "System Nights",
    "Booking Nights",
    "Net Night Difference",
    "Status",
];

/// Rendered in place of a check-in date when none could be read.
pub const UNKNOWN_DATE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Text(String),
    Integer(i64),
}

impl fmt::Display for ReportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCell::Text(text) => f.write_str(text),
            ReportCell::Integer(value) => write!(f, "{value}"),
        }
    }
}

pub fn report_cells(row: &ReconciliationRow) -> Vec<ReportCell> {
    let checkin = row
        .earliest_checkin()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    vec![
        ReportCell::Text(row.guest().to_string()),
        ReportCell::Text(checkin),
        ReportCell::Integer(row.system_nights()),
        ReportCell::Integer(row.booking_nights()),
        ReportCell::Integer(row.net_difference()),
        ReportCell::Text(row.status().label().to_string()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl NamedTable {
    pub fn from_rows(name: &str, rows: &[&ReconciliationRow]) -> Self {
        Self {
            name: name.to_string(),
            headers: REPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: rows.iter().map(|row| report_cells(row)).collect(),
        }
    }

    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|cells| cells.iter().map(ReportCell::to_string).collect())
            .collect()
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub guests: usize,
    pub matches: usize,
    pub system_extra: usize,
    pub booking_extra: usize,
    pub overlaps: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    rows: Vec<ReconciliationRow>,
}

impl Report {
    pub fn new(rows: Vec<ReconciliationRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ReconciliationRow] {
        &self.rows
    }

    pub fn full(&self) -> Vec<&ReconciliationRow> {
        self.rows.iter().collect()
    }

    pub fn mismatches(&self) -> Vec<&ReconciliationRow> {
        self.rows.iter().filter(|row| row.is_mismatch()).collect()
    }

    pub fn overlaps(&self) -> Vec<&ReconciliationRow> {
        self.rows.iter().filter(|row| row.is_overlap()).collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            guests: self.rows.len(),
            ..ReportSummary::default()
        };
        for row in &self.rows {
            match row.status() {
                Status::Match => summary.matches += 1,
                Status::SystemExtra => summary.system_extra += 1,
                Status::BookingExtra => summary.booking_extra += 1,
            }
            if row.is_overlap() {
                summary.overlaps += 1;
            }
        }
        summary
    }

    /// Output tables for a file layout: `Full`/`Mismatch`/`Overlap`, or a
    /// single `Report`.
    pub fn tables(&self, layout: ReportLayout) -> Vec<NamedTable> {
        match layout {
            ReportLayout::Split => vec![
                NamedTable::from_rows("Full", &self.full()),
                NamedTable::from_rows("Mismatch", &self.mismatches()),
                NamedTable::from_rows("Overlap", &self.overlaps()),
            ],
            ReportLayout::Single => vec![NamedTable::from_rows("Report", &self.full())],
        }
    }

    /// Tables shown on the terminal for the requested view.
    pub fn view_tables(&self, view: ReportView) -> Vec<NamedTable> {
        match view {
            ReportView::All => self.tables(ReportLayout::Split),
            ReportView::Full => vec![NamedTable::from_rows("Full", &self.full())],
            ReportView::Mismatches => {
                vec![NamedTable::from_rows("Mismatch", &self.mismatches())]
            }
            ReportView::Overlaps => vec![NamedTable::from_rows("Overlap", &self.overlaps())],
        }
    }
}

/// Writes `tables` to a workbook (one sheet each) when `path` ends in `.xlsx`,
/// otherwise to one CSV file per table inside the directory `path`.
pub fn write_tables(path: &Path, tables: &[NamedTable]) -> Result<()> {
    if xlsx::is_xlsx_output(path) {
        xlsx::write_workbook(path, tables)?;
        info!("Wrote {} sheet(s) to {:?}", tables.len(), path);
        return Ok(());
    }
    fs::create_dir_all(path).with_context(|| format!("Creating report directory {path:?}"))?;
    for table in tables {
        let target = path.join(table.file_name());
        let mut writer =
            io_utils::open_csv_writer(Some(&target), io_utils::DEFAULT_CSV_DELIMITER)?;
        writer
            .write_record(&table.headers)
            .with_context(|| format!("Writing headers to {target:?}"))?;
        for row in table.display_rows() {
            writer
                .write_record(&row)
                .with_context(|| format!("Writing row to {target:?}"))?;
        }
        writer
            .flush()
            .with_context(|| format!("Flushing {target:?}"))?;
        info!("Wrote {} row(s) to {:?}", table.rows.len(), target);
    }
    Ok(())
}
