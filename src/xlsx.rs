//! Spreadsheet import and report workbook export.
//!
//! Import reads a single worksheet with `calamine`; the first row of the used
//! range supplies the headers. Excel stores dates as day serials, which are
//! converted to [`Value::Date`] or [`Value::DateTime`] here so the aggregator
//! never sees raw serial numbers for date-formatted cells.
//!
//! Export writes one worksheet per [`NamedTable`] with `rust_xlsxwriter`.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    data::{Table, Value},
    report::{NamedTable, ReportCell},
};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

pub fn is_xlsx_output(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

/// Reads `sheet` (or the first worksheet) of the workbook at `path`.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook {path:?} has no worksheets"))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Reading sheet '{sheet_name}' from {path:?}"))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_value(cell).map(|v| v.as_display()).unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_value).collect());
    }
    debug!(
        "Read {} row(s) from sheet '{}' of {:?}",
        table.len(),
        sheet_name,
        path
    );
    Ok(table)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            Some(Value::String(s.clone()))
        }
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) => Some(Value::Float(*f)),
        Data::Bool(b) => Some(Value::Boolean(*b)),
        Data::DateTime(dt) => serial_to_value(dt.as_f64()),
    }
}

/// Converts an Excel 1900-system day serial into a date or datetime.
pub fn serial_to_value(serial: f64) -> Option<Value> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.trunc() as i64;
    let date = epoch.checked_add_signed(Duration::days(days))?;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    if seconds == 0 {
        return Some(Value::Date(date));
    }
    let midnight: NaiveDateTime = date.and_hms_opt(0, 0, 0)?;
    midnight
        .checked_add_signed(Duration::seconds(seconds))
        .map(Value::DateTime)
}

/// Writes each table to its own worksheet, named after the table.
pub fn write_workbook(path: &Path, tables: &[NamedTable]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&table.name)
            .with_context(|| format!("Naming sheet '{}'", table.name))?;
        for (col, header) in table.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .with_context(|| format!("Writing header '{header}'"))?;
        }
        for (row_idx, cells) in table.rows.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                let written = match cell {
                    ReportCell::Text(text) => worksheet.write_string(row, col, text),
                    ReportCell::Integer(value) => worksheet.write_number(row, col, *value as f64),
                };
                written
                    .with_context(|| format!("Writing sheet '{}' row {}", table.name, row + 1))?;
            }
        }
        worksheet.autofit();
    }

    workbook
        .save(path)
        .with_context(|| format!("Saving workbook {path:?}"))?;
    Ok(())
}
