//! Column mapping configuration.
//!
//! Each of the four fields the reconciliation reads is identified by a
//! [`ColumnSelector`]: either a header name or a zero-based column position.
//! Selectors come from a YAML mapping file, from command-line flags, or both
//! (flags win). All four must be present and must resolve against the loaded
//! tables before any aggregation runs.
//!
//! ```yaml
//! guest_column_system: Guest Name
//! guest_column_booking: 3
//! date_column_booking: Check-in
//! nights_column_booking: Room Nights
//! ```

use std::{fmt, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{MissingColumn, ReconError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl ColumnSelector {
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            ColumnSelector::Index(idx) => (*idx < headers.len()).then_some(*idx),
            ColumnSelector::Name(name) => headers.iter().position(|h| h == name).or_else(|| {
                let wanted = name.trim();
                headers.iter().position(|h| h.trim() == wanted)
            }),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(idx) => write!(f, "#{idx}"),
            ColumnSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Parses `#N` as a zero-based position and anything else as a header name.
pub fn parse_selector(value: &str) -> Result<ColumnSelector, String> {
    if value.trim().is_empty() {
        return Err("Column selector cannot be empty".to_string());
    }
    if let Some(position) = value.strip_prefix('#')
        && !position.is_empty()
        && position.chars().all(|c| c.is_ascii_digit())
    {
        return position
            .parse::<usize>()
            .map(ColumnSelector::Index)
            .map_err(|err| format!("Invalid column position '{value}': {err}"));
    }
    Ok(ColumnSelector::Name(value.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingField {
    SystemGuest,
    BookingGuest,
    BookingDate,
    BookingNights,
}

impl MappingField {
    pub const ALL: [MappingField; 4] = [
        MappingField::SystemGuest,
        MappingField::BookingGuest,
        MappingField::BookingDate,
        MappingField::BookingNights,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MappingField::SystemGuest => "system guest name",
            MappingField::BookingGuest => "booking guest name",
            MappingField::BookingDate => "booking check-in date",
            MappingField::BookingNights => "booking night count",
        }
    }

    pub fn config_key(&self) -> &'static str {
        match self {
            MappingField::SystemGuest => "guest_column_system",
            MappingField::BookingGuest => "guest_column_booking",
            MappingField::BookingDate => "date_column_booking",
            MappingField::BookingNights => "nights_column_booking",
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, MappingField::SystemGuest)
    }
}

/// Mapping as written in a config file or assembled from flags; any field may
/// still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_column_system: Option<ColumnSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_column_booking: Option<ColumnSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_column_booking: Option<ColumnSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nights_column_booking: Option<ColumnSelector>,
}

impl MappingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)
            .with_context(|| format!("Parsing column mapping YAML {path:?}"))?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).context("Parsing column mapping YAML")
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing column mapping to YAML")
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: MappingConfig) -> Self {
        Self {
            guest_column_system: overrides.guest_column_system.or(self.guest_column_system),
            guest_column_booking: overrides.guest_column_booking.or(self.guest_column_booking),
            date_column_booking: overrides.date_column_booking.or(self.date_column_booking),
            nights_column_booking: overrides
                .nights_column_booking
                .or(self.nights_column_booking),
        }
    }

    fn get(&self, field: MappingField) -> Option<&ColumnSelector> {
        match field {
            MappingField::SystemGuest => self.guest_column_system.as_ref(),
            MappingField::BookingGuest => self.guest_column_booking.as_ref(),
            MappingField::BookingDate => self.date_column_booking.as_ref(),
            MappingField::BookingNights => self.nights_column_booking.as_ref(),
        }
    }

    pub fn into_mapping(self) -> Result<ColumnMapping, ReconError> {
        let unset = MappingField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect::<Vec<_>>();
        match self {
            MappingConfig {
                guest_column_system: Some(system_guest),
                guest_column_booking: Some(booking_guest),
                date_column_booking: Some(booking_date),
                nights_column_booking: Some(booking_nights),
            } => Ok(ColumnMapping {
                system_guest,
                booking_guest,
                booking_date,
                booking_nights,
            }),
            _ => Err(ReconError::Unmapped { fields: unset }),
        }
    }
}

/// Complete mapping with every field selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub system_guest: ColumnSelector,
    pub booking_guest: ColumnSelector,
    pub booking_date: ColumnSelector,
    pub booking_nights: ColumnSelector,
}

impl ColumnMapping {
    pub fn selector(&self, field: MappingField) -> &ColumnSelector {
        match field {
            MappingField::SystemGuest => &self.system_guest,
            MappingField::BookingGuest => &self.booking_guest,
            MappingField::BookingDate => &self.booking_date,
            MappingField::BookingNights => &self.booking_nights,
        }
    }

    /// Resolves every selector, reporting all missing columns at once.
    pub fn resolve(
        &self,
        system_headers: &[String],
        booking_headers: &[String],
    ) -> Result<ResolvedColumns, ReconError> {
        let mut resolved = [0usize; 4];
        let mut missing = Vec::new();
        for (slot, field) in resolved.iter_mut().zip(MappingField::ALL) {
            let headers = if field.is_system() {
                system_headers
            } else {
                booking_headers
            };
            let selector = self.selector(field);
            match selector.resolve(headers) {
                Some(idx) => *slot = idx,
                None => missing.push(MissingColumn {
                    field,
                    selector: selector.clone(),
                }),
            }
        }
        if !missing.is_empty() {
            return Err(ReconError::Configuration { missing });
        }
        let [system_guest, booking_guest, booking_date, booking_nights] = resolved;
        Ok(ResolvedColumns {
            system_guest,
            booking_guest,
            booking_date,
            booking_nights,
        })
    }
}

/// Column positions after a mapping has been checked against both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub system_guest: usize,
    pub booking_guest: usize,
    pub booking_date: usize,
    pub booking_nights: usize,
}
