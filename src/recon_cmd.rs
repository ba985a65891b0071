use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::info;
use serde::Serialize;

use crate::{
    cli::ReconcileArgs,
    config::{ColumnMapping, MappingConfig},
    io_utils::{self, InputOptions},
    reconcile::{self, ReconciliationRow},
    report::{self, ReportSummary},
    table,
};

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: ReportSummary,
    rows: &'a [ReconciliationRow],
}

pub fn execute(args: &ReconcileArgs) -> Result<()> {
    if io_utils::is_dash(&args.booking) {
        return Err(anyhow!(
            "Booking input cannot be stdin; provide a file path (only --system accepts '-')"
        ));
    }
    let mapping = build_mapping(args)?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

    let system_options = InputOptions {
        delimiter: args.delimiter,
        encoding,
        sheet: args.system_sheet.clone(),
    };
    let booking_options = InputOptions {
        delimiter: args.delimiter,
        encoding,
        sheet: args.booking_sheet.clone(),
    };

    info!("Loading system export {:?}", args.system);
    let system = io_utils::load_table(&args.system, "system", &system_options)?;
    info!("Loading booking export {:?}", args.booking);
    let booking = io_utils::load_table(&args.booking, "booking", &booking_options)?;
    info!(
        "Loaded {} system row(s) and {} booking row(s)",
        system.len(),
        booking.len()
    );

    let reconciliation = reconcile::reconcile_tables(&system, &booking, &mapping)?;
    let report = &reconciliation.report;
    let summary = report.summary();
    info!(
        "{} guest(s): {} match, {} system extra, {} booking extra, {} overlap",
        summary.guests,
        summary.matches,
        summary.system_extra,
        summary.booking_extra,
        summary.overlaps
    );

    if args.json {
        let payload = JsonReport {
            summary,
            rows: report.rows(),
        };
        let rendered =
            serde_json::to_string_pretty(&payload).context("Serializing report to JSON")?;
        println!("{rendered}");
    } else {
        table::print_named_tables(&report.view_tables(args.view));
    }

    if let Some(output) = &args.output {
        write_report(output, report, args)?;
    }
    Ok(())
}

fn build_mapping(args: &ReconcileArgs) -> Result<ColumnMapping> {
    let base = match &args.config {
        Some(path) => MappingConfig::load(path)
            .with_context(|| format!("Loading column mapping from {path:?}"))?,
        None => MappingConfig::default(),
    };
    let overrides = MappingConfig {
        guest_column_system: args.system_guest.clone(),
        guest_column_booking: args.booking_guest.clone(),
        date_column_booking: args.booking_date.clone(),
        nights_column_booking: args.booking_nights.clone(),
    };
    let mapping = base.merge(overrides).into_mapping()?;
    info!(
        "Column mapping: system guest {}, booking guest {}, check-in {}, nights {}",
        mapping.system_guest, mapping.booking_guest, mapping.booking_date, mapping.booking_nights
    );
    Ok(mapping)
}

fn write_report(output: &Path, report: &report::Report, args: &ReconcileArgs) -> Result<()> {
    let tables = report.tables(args.layout);
    report::write_tables(output, &tables)
        .with_context(|| format!("Writing reconciliation report to {output:?}"))
}
