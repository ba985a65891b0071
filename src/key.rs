//! Guest key normalization.
//!
//! Both exports spell guest names inconsistently (case, stray spaces), so rows
//! are joined on a normalized [`GuestKey`] rather than the raw cell.

use std::fmt;

use serde::Serialize;

use crate::data::{Table, Value};

/// Key assigned to rows whose guest cell is missing or blank.
pub const MISSING_KEY: &str = "NAN";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GuestKey(String);

impl GuestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_missing(&self) -> bool {
        self.0 == MISSING_KEY
    }
}

impl fmt::Display for GuestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GuestKey {
    fn from(value: &str) -> Self {
        normalize_text(value)
    }
}

/// Normalizes any cell into a join key. Never fails.
pub fn normalize_key(raw: Option<&Value>) -> GuestKey {
    match raw {
        Some(value) => normalize_text(&value.as_display()),
        None => GuestKey(MISSING_KEY.to_string()),
    }
}

/// Trims and uppercases `raw`; blank text maps to [`MISSING_KEY`].
pub fn normalize_text(raw: &str) -> GuestKey {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        GuestKey(MISSING_KEY.to_string())
    } else {
        GuestKey(trimmed.to_uppercase())
    }
}

/// Derives the key column for `column` without touching the table itself.
pub fn key_column(table: &Table, column: usize) -> Vec<GuestKey> {
    table.column(column).map(normalize_key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_collapse_to_one_key() {
        let padded = normalize_text(" Jane Doe ");
        assert_eq!(padded.as_str(), "JANE DOE");
        assert_eq!(padded, normalize_text("JANE DOE"));
        assert_eq!(padded, normalize_text("jane doe"));
    }

    #[test]
    fn missing_and_blank_cells_share_placeholder() {
        assert_eq!(normalize_key(None).as_str(), MISSING_KEY);
        assert_eq!(normalize_text("   ").as_str(), MISSING_KEY);
        assert!(normalize_key(None).is_missing());
        assert_eq!(normalize_text(MISSING_KEY), normalize_key(None));
    }

    #[test]
    fn numeric_cells_stringify_before_normalizing() {
        assert_eq!(normalize_key(Some(&Value::Integer(1042))).as_str(), "1042");
        assert_eq!(normalize_key(Some(&Value::Float(7.0))).as_str(), "7");
        assert_eq!(normalize_key(Some(&Value::Boolean(true))).as_str(), "TRUE");
    }

    #[test]
    fn key_column_follows_row_order() {
        let table = Table::with_rows(
            vec!["Guest".into()],
            vec![
                vec![Some(Value::String("ann".into()))],
                vec![None],
                vec![],
                vec![Some(Value::String(" Bob".into()))],
            ],
        );
        let keys = key_column(&table, 0)
            .into_iter()
            .map(GuestKey::into_string)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["ANN", MISSING_KEY, MISSING_KEY, "BOB"]);
    }
}
