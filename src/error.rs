use std::{fmt, path::PathBuf};

use itertools::Itertools;
use thiserror::Error;

use crate::config::{ColumnSelector, MappingField};

/// A configured column that does not exist in its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub field: MappingField,
    pub selector: ColumnSelector,
}

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} column {} ({})",
            self.field.label(),
            self.selector,
            self.field.config_key()
        )
    }
}

#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Configuration error: column(s) not found: {}", .missing.iter().join("; "))]
    Configuration { missing: Vec<MissingColumn> },

    #[error("Configuration error: no column mapping for {}", .fields.iter().map(|f| f.config_key()).join(", "))]
    Unmapped { fields: Vec<MappingField> },

    #[error("Unable to read {label} file {path:?}")]
    UnreadableSource {
        label: &'static str,
        path: PathBuf,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ReconError {
    pub fn unreadable(label: &'static str, path: PathBuf, cause: anyhow::Error) -> Self {
        ReconError::UnreadableSource {
            label,
            path,
            cause: cause.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReconError::Configuration { .. } | ReconError::Unmapped { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message_names_every_missing_column() {
        let err = ReconError::Configuration {
            missing: vec![
                MissingColumn {
                    field: MappingField::BookingGuest,
                    selector: ColumnSelector::Name("Guest".into()),
                },
                MissingColumn {
                    field: MappingField::BookingNights,
                    selector: ColumnSelector::Index(9),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("'Guest'"), "{message}");
        assert!(message.contains("guest_column_booking"), "{message}");
        assert!(message.contains("#9"), "{message}");
        assert!(message.contains("nights_column_booking"), "{message}");
        assert!(err.is_configuration());
    }

    #[test]
    fn unreadable_source_keeps_cause_chain() {
        let err = ReconError::unreadable(
            "booking",
            PathBuf::from("bookings.xlsx"),
            anyhow::anyhow!("zip header missing"),
        );
        assert!(err.to_string().contains("booking"));
        let cause = std::error::Error::source(&err).expect("cause");
        assert_eq!(cause.to_string(), "zip header missing");
        assert!(!err.is_configuration());
    }
}
