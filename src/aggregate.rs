//! Per-guest aggregation over a single source table.
//!
//! Night counts and check-in dates degrade differently on bad input: a cell
//! that is not a number adds 0 nights but still registers the guest, while a
//! cell that is not a date is left out of the minimum. A guest with no
//! readable dates maps to `None`, never to a placeholder date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    data::Table,
    key::{GuestKey, key_column},
};

/// Number of rows per guest. Used for the system export, where each row is one
/// night.
pub fn count_rows_per_key(table: &Table, key_column_index: usize) -> BTreeMap<GuestKey, i64> {
    let mut counts = BTreeMap::new();
    for key in key_column(table, key_column_index) {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Sum of `value_column` per guest, with unreadable cells counted as 0.
pub fn sum_numeric_per_key(
    table: &Table,
    key_column_index: usize,
    value_column: usize,
) -> BTreeMap<GuestKey, f64> {
    let mut sums = BTreeMap::new();
    let keys = key_column(table, key_column_index);
    for (key, cell) in keys.into_iter().zip(table.column(value_column)) {
        let value = cell.and_then(|v| v.as_number()).unwrap_or(0.0);
        *sums.entry(key).or_insert(0.0) += value;
    }
    sums
}

/// Earliest readable date in `date_column` per guest.
pub fn min_date_per_key(
    table: &Table,
    key_column_index: usize,
    date_column: usize,
) -> BTreeMap<GuestKey, Option<NaiveDate>> {
    let mut earliest: BTreeMap<GuestKey, Option<NaiveDate>> = BTreeMap::new();
    let keys = key_column(table, key_column_index);
    for (key, cell) in keys.into_iter().zip(table.column(date_column)) {
        let parsed = cell.and_then(|v| v.as_date());
        let entry = earliest.entry(key).or_insert(None);
        *entry = match (*entry, parsed) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
    }
    earliest
}

/// Counts of cells that were coerced or skipped while aggregating a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    pub rows: usize,
    pub non_numeric_values: usize,
    pub unparsable_dates: usize,
}

impl DataQuality {
    pub fn assess(table: &Table, value_column: usize, date_column: usize) -> Self {
        let non_numeric_values = table
            .column(value_column)
            .filter(|cell| cell.and_then(|v| v.as_number()).is_none())
            .count();
        let unparsable_dates = table
            .column(date_column)
            .filter(|cell| cell.and_then(|v| v.as_date()).is_none())
            .count();
        Self {
            rows: table.len(),
            non_numeric_values,
            unparsable_dates,
        }
    }

    /// True when the table has rows but none of them carried a usable number,
    /// which usually means the value column was mapped to the wrong field.
    pub fn all_values_non_numeric(&self) -> bool {
        self.rows > 0 && self.non_numeric_values == self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn text(value: &str) -> Option<Value> {
        Some(Value::String(value.to_string()))
    }

    fn booking_table(rows: Vec<(&str, Option<Value>, Option<Value>)>) -> Table {
        Table::with_rows(
            vec!["Guest".into(), "Check-in".into(), "Nights".into()],
            rows.into_iter()
                .map(|(guest, date, nights)| vec![text(guest), date, nights])
                .collect(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_rows_across_spellings() {
        let table = Table::with_rows(
            vec!["Guest".into()],
            vec![
                vec![text("Jane Doe")],
                vec![text("jane doe ")],
                vec![text("JANE DOE")],
                vec![text("John")],
            ],
        );
        let counts = count_rows_per_key(&table, 0);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&GuestKey::from("JANE DOE")], 3);
        assert_eq!(counts[&GuestKey::from("JOHN")], 1);
    }

    #[test]
    fn non_numeric_nights_contribute_zero() {
        let table = booking_table(vec![
            ("Ann", None, text("2")),
            ("Ann", None, text("abc")),
            ("Ann", None, None),
            ("Bob", None, text("abc")),
            ("Cy", None, Some(Value::Float(1.5))),
        ]);
        let sums = sum_numeric_per_key(&table, 0, 2);
        assert_eq!(sums[&GuestKey::from("ANN")], 2.0);
        assert_eq!(sums[&GuestKey::from("BOB")], 0.0);
        assert_eq!(sums[&GuestKey::from("CY")], 1.5);
    }

    #[test]
    fn unparsable_dates_are_excluded_from_minimum() {
        let table = booking_table(vec![
            ("Ann", text("2024-03-10"), None),
            ("Ann", text("garbage"), None),
            ("Ann", text("2024-02-01"), None),
            ("Bob", text("soon"), None),
            ("Bob", None, None),
        ]);
        let earliest = min_date_per_key(&table, 0, 1);
        assert_eq!(earliest[&GuestKey::from("ANN")], Some(date(2024, 2, 1)));
        assert_eq!(earliest[&GuestKey::from("BOB")], None);
    }

    #[test]
    fn typed_date_cells_participate_in_minimum() {
        let table = booking_table(vec![
            ("Ann", Some(Value::Date(date(2024, 1, 9))), None),
            (
                "Ann",
                Some(Value::DateTime(date(2024, 1, 5).and_hms_opt(14, 0, 0).unwrap())),
                None,
            ),
        ]);
        let earliest = min_date_per_key(&table, 0, 1);
        assert_eq!(earliest[&GuestKey::from("ANN")], Some(date(2024, 1, 5)));
    }

    #[test]
    fn aggregation_leaves_input_untouched() {
        let table = booking_table(vec![("Ann", text("2024-01-01"), text("3"))]);
        let snapshot = table.clone();
        let _ = count_rows_per_key(&table, 0);
        let _ = sum_numeric_per_key(&table, 0, 2);
        let _ = min_date_per_key(&table, 0, 1);
        assert_eq!(table, snapshot);
    }

    #[test]
    fn data_quality_flags_fully_non_numeric_column() {
        let table = booking_table(vec![
            ("Ann", text("2024-01-01"), text("two")),
            ("Bob", text("never"), None),
        ]);
        let quality = DataQuality::assess(&table, 2, 1);
        assert_eq!(quality.rows, 2);
        assert_eq!(quality.non_numeric_values, 2);
        assert_eq!(quality.unparsable_dates, 1);
        assert!(quality.all_values_non_numeric());
        assert!(!DataQuality::default().all_values_non_numeric());
    }
}
