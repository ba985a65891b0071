//! Outer-join reconciliation of system and booking aggregates.
//!
//! Every guest present in either source yields exactly one row. Missing
//! counts default to zero and a missing check-in date stays `None`. The
//! difference is always `system - booking`, so a positive value means the
//! system export holds more nights than the booking platform.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    aggregate::{self, DataQuality},
    config::ColumnMapping,
    data::Table,
    error::ReconError,
    key::GuestKey,
    report::Report,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Match,
    SystemExtra,
    BookingExtra,
}

impl Status {
    pub fn from_difference(net_difference: i64) -> Self {
        match net_difference {
            0 => Status::Match,
            d if d > 0 => Status::SystemExtra,
            _ => Status::BookingExtra,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Match => "Match",
            Status::SystemExtra => "System Extra",
            Status::BookingExtra => "Booking Extra",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Merged per-guest figures from both sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestAggregate {
    pub guest: GuestKey,
    pub earliest_checkin: Option<NaiveDate>,
    pub system_nights: i64,
    pub booking_nights: i64,
}

/// A guest aggregate with its derived difference and status. The status is
/// always recomputed from the counts; there is no way to set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRow {
    aggregate: GuestAggregate,
}

impl ReconciliationRow {
    pub fn new(aggregate: GuestAggregate) -> Self {
        Self { aggregate }
    }

    pub fn aggregate(&self) -> &GuestAggregate {
        &self.aggregate
    }

    pub fn guest(&self) -> &GuestKey {
        &self.aggregate.guest
    }

    pub fn earliest_checkin(&self) -> Option<NaiveDate> {
        self.aggregate.earliest_checkin
    }

    pub fn system_nights(&self) -> i64 {
        self.aggregate.system_nights
    }

    pub fn booking_nights(&self) -> i64 {
        self.aggregate.booking_nights
    }

    pub fn net_difference(&self) -> i64 {
        self.aggregate
            .system_nights
            .saturating_sub(self.aggregate.booking_nights)
    }

    pub fn status(&self) -> Status {
        Status::from_difference(self.net_difference())
    }

    pub fn is_mismatch(&self) -> bool {
        self.status() != Status::Match
    }

    pub fn is_overlap(&self) -> bool {
        self.aggregate.system_nights > 0 && self.aggregate.booking_nights > 0
    }
}

impl Serialize for ReconciliationRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ReconciliationRow", 6)?;
        state.serialize_field("guest", &self.aggregate.guest)?;
        state.serialize_field("earliest_checkin", &self.aggregate.earliest_checkin)?;
        state.serialize_field("system_nights", &self.aggregate.system_nights)?;
        state.serialize_field("booking_nights", &self.aggregate.booking_nights)?;
        state.serialize_field("net_difference", &self.net_difference())?;
        state.serialize_field("status", &self.status())?;
        state.end()
    }
}

/// Largest booking total, in either direction, carried into a row.
pub const MAX_BOOKING_NIGHTS: i64 = 1_000_000_000;

/// Truncates a summed night count toward zero, clamped to
/// `±MAX_BOOKING_NIGHTS` so later arithmetic cannot overflow.
fn whole_nights(sum: f64) -> i64 {
    let limit = MAX_BOOKING_NIGHTS as f64;
    sum.trunc().clamp(-limit, limit) as i64
}

/// Merges the three per-guest maps into one row per guest, ordered by key.
pub fn reconcile(
    system_counts: &BTreeMap<GuestKey, i64>,
    booking_sums: &BTreeMap<GuestKey, f64>,
    booking_min_dates: &BTreeMap<GuestKey, Option<NaiveDate>>,
) -> Vec<ReconciliationRow> {
    let guests: BTreeSet<&GuestKey> = system_counts.keys().chain(booking_sums.keys()).collect();
    guests
        .into_iter()
        .map(|guest| {
            let system_nights = system_counts.get(guest).copied().unwrap_or(0);
            let booking_nights = booking_sums.get(guest).copied().map_or(0, whole_nights);
            let earliest_checkin = booking_min_dates.get(guest).copied().flatten();
            ReconciliationRow::new(GuestAggregate {
                guest: guest.clone(),
                earliest_checkin,
                system_nights,
                booking_nights,
            })
        })
        .collect()
}

/// Result of a full two-table run.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub report: Report,
    pub booking_quality: DataQuality,
}

/// Validates the mapping against both tables, then aggregates and merges.
/// Nothing is aggregated when any configured column is missing.
pub fn reconcile_tables(
    system: &Table,
    booking: &Table,
    mapping: &ColumnMapping,
) -> Result<Reconciliation, ReconError> {
    let columns = mapping.resolve(&system.headers, &booking.headers)?;
    debug!("Resolved columns: {columns:?}");

    let system_counts = aggregate::count_rows_per_key(system, columns.system_guest);
    let booking_sums =
        aggregate::sum_numeric_per_key(booking, columns.booking_guest, columns.booking_nights);
    let booking_min_dates =
        aggregate::min_date_per_key(booking, columns.booking_guest, columns.booking_date);

    let booking_quality =
        DataQuality::assess(booking, columns.booking_nights, columns.booking_date);
    if booking_quality.all_values_non_numeric() {
        warn!(
            "None of the {} value(s) in booking column '{}' are numeric; every guest will show 0 booking nights. Check the night count mapping.",
            booking_quality.rows,
            booking.headers[columns.booking_nights]
        );
    } else if booking_quality.non_numeric_values > 0 {
        debug!(
            "{} booking night value(s) were not numeric and counted as 0",
            booking_quality.non_numeric_values
        );
    }
    if booking_quality.unparsable_dates > 0 {
        debug!(
            "{} booking check-in value(s) could not be read as dates",
            booking_quality.unparsable_dates
        );
    }

    let rows = reconcile(&system_counts, &booking_sums, &booking_min_dates);
    info!(
        "Reconciled {} guest(s): {} from system rows, {} from booking rows",
        rows.len(),
        system_counts.len(),
        booking_sums.len()
    );
    Ok(Reconciliation {
        report: Report::new(rows),
        booking_quality,
    })
}
