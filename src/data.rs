//! In-memory tables and the scalar cell values they hold.
//!
//! Every ingestion path (CSV, TSV, spreadsheets) produces a [`Table`]: an
//! ordered list of header names plus ordered rows of optional [`Value`] cells.
//! `None` marks a missing cell. The coercion helpers on [`Value`] implement the
//! lenient parsing used during aggregation: [`Value::as_number`] and
//! [`Value::as_date`] return `None` instead of failing on messy input.

use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Interprets the cell as a finite number, or `None` when it is not one.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::String(s) => parse_number(s)?,
            Value::Date(_) | Value::DateTime(_) => return None,
        };
        number.is_finite().then_some(number)
    }

    /// Interprets the cell as a calendar date, dropping any time of day.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            Value::String(s) => {
                let trimmed = s.trim();
                parse_naive_date(trimmed)
                    .or_else(|_| parse_naive_datetime(trimmed).map(|dt| dt.date()))
                    .ok()
            }
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Builds a cell from raw delimited text; empty text is a missing cell.
pub fn value_from_text(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        None
    } else {
        Some(Value::String(raw.to_string()))
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// A loaded source extract: named columns and rows of optional cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(headers: Vec<String>, rows: Vec<Vec<Option<Value>>>) -> Self {
        Self { headers, rows }
    }

    pub fn push_row(&mut self, row: Vec<Option<Value>>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row`/`column`; ragged rows read as missing past their end.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_ref())
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |cells| cells.get(column).and_then(|cell| cell.as_ref()))
    }

    /// String rendering of the first `limit` rows, padded to the header width.
    pub fn display_rows(&self, limit: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(limit)
            .map(|cells| {
                (0..self.headers.len())
                    .map(|idx| {
                        cells
                            .get(idx)
                            .and_then(|cell| cell.as_ref())
                            .map(Value::as_display)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}
