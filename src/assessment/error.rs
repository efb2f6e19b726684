use crate::types::observation::Field;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Reasons a station/date produces no risk assessment.
///
/// None of these abort a batch; the station is simply absent from that
/// date's result table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    #[error("Window for station '{station}' on {date} has {found} hourly records, expected {expected}")]
    IncompleteWindow {
        station: String,
        date: NaiveDate,
        expected: usize,
        found: usize,
    },

    #[error("Window for station '{station}' on {date} is not hour-contiguous at slot {slot}: expected {expected}, found {found}")]
    MisalignedWindow {
        station: String,
        date: NaiveDate,
        slot: usize,
        expected: NaiveDateTime,
        found: NaiveDateTime,
    },

    #[error("Unparseable {field} value '{value}' at slot {slot} for station '{station}'")]
    NumericCoercion {
        station: String,
        field: Field,
        slot: usize,
        value: String,
    },

    #[error("{missing} missing {field} values in window for station '{station}'")]
    InvalidInput {
        station: String,
        field: Field,
        missing: usize,
    },
}
