use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{ColumnSelector, parse_selector};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile guest night-stays between a system export and a booking-platform export",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare per-guest night counts and report mismatches
    Reconcile(ReconcileArgs),
    /// Preview the first few rows of an input file in a formatted table
    Preview(PreviewArgs),
    /// List the headers of an input file with their zero-based positions
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// System export (one row per night); `-` reads CSV from stdin
    #[arg(long = "system")]
    pub system: PathBuf,
    /// Booking-platform export (one row per booking)
    #[arg(long = "booking")]
    pub booking: PathBuf,
    /// YAML file mapping the four required columns
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// System guest name column (header name or `#N` zero-based position)
    #[arg(long = "system-guest", value_parser = parse_selector)]
    pub system_guest: Option<ColumnSelector>,
    /// Booking guest name column (header name or `#N`)
    #[arg(long = "booking-guest", value_parser = parse_selector)]
    pub booking_guest: Option<ColumnSelector>,
    /// Booking check-in date column (header name or `#N`)
    #[arg(long = "booking-date", value_parser = parse_selector)]
    pub booking_date: Option<ColumnSelector>,
    /// Booking night count column (header name or `#N`)
    #[arg(long = "booking-nights", value_parser = parse_selector)]
    pub booking_nights: Option<ColumnSelector>,
    /// Worksheet to read from a spreadsheet system export (defaults to the first)
    #[arg(long = "system-sheet")]
    pub system_sheet: Option<String>,
    /// Worksheet to read from a spreadsheet booking export (defaults to the first)
    #[arg(long = "booking-sheet")]
    pub booking_sheet: Option<String>,
    /// CSV delimiter character for delimited inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Tables written to --output: full/mismatch/overlap, or a single report
    #[arg(long, value_enum, default_value = "split")]
    pub layout: ReportLayout,
    /// Which view to print on the terminal
    #[arg(long, value_enum, default_value = "all")]
    pub view: ReportView,
    /// Write the report to an .xlsx workbook, or to a directory of CSV files
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Print the reconciled rows and summary as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum ReportLayout {
    #[default]
    Split,
    Single,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum ReportView {
    #[default]
    All,
    Full,
    Mismatches,
    Overlaps,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input file to preview (.csv, .tsv, .xlsx, .xls, .ods)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Worksheet to read from a spreadsheet input (defaults to the first)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input file whose headers should be listed
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Worksheet to read from a spreadsheet input (defaults to the first)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
