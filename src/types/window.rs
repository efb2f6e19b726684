//! The fixed five-day analysis window the model runs over.
//!
//! A window covers `[target − 4 days 00:00, target 23:00]`, one record per
//! hour, so absolute slot `i` is always hour `i % 24` of day `i / 24`.

use crate::assessment::error::AssessmentError;
use crate::types::observation::{Field, HourlyObservation, RawHourlyRecord};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Number of hourly slots in a window.
pub const WINDOW_HOURS: usize = 120;

/// Days before the target date included in the window.
pub const LEAD_DAYS: i64 = 4;

/// Inclusive start and end of the window for `target`.
pub fn window_bounds(target: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = (target - Duration::days(LEAD_DAYS)).and_time(NaiveTime::MIN);
    let end = start + Duration::hours(WINDOW_HOURS as i64 - 1);
    (start, end)
}

/// Hour of day of an absolute slot.
pub fn hour_of_slot(slot: usize) -> usize {
    slot % 24
}

/// Records handed over by a window provider, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWindow {
    pub station: String,
    pub target_date: NaiveDate,
    pub records: Vec<RawHourlyRecord>,
}

/// An ordered, gap-free run of exactly [`WINDOW_HOURS`] observations for
/// one station.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationWindow {
    station: String,
    target_date: NaiveDate,
    observations: Vec<HourlyObservation>,
}

impl ObservationWindow {
    /// Validates length and hourly contiguity.
    ///
    /// # Errors
    ///
    /// [`AssessmentError::IncompleteWindow`] if there are not exactly 120
    /// observations, [`AssessmentError::MisalignedWindow`] if any slot's
    /// timestamp is not the expected hour.
    pub fn new(
        station: impl Into<String>,
        target_date: NaiveDate,
        observations: Vec<HourlyObservation>,
    ) -> Result<Self, AssessmentError> {
        let station = station.into();
        if observations.len() != WINDOW_HOURS {
            return Err(AssessmentError::IncompleteWindow {
                station,
                date: target_date,
                expected: WINDOW_HOURS,
                found: observations.len(),
            });
        }

        let (start, _) = window_bounds(target_date);
        for (slot, observation) in observations.iter().enumerate() {
            let expected = start + Duration::hours(slot as i64);
            if observation.timestamp != expected {
                return Err(AssessmentError::MisalignedWindow {
                    station,
                    date: target_date,
                    slot,
                    expected,
                    found: observation.timestamp,
                });
            }
        }

        Ok(Self {
            station,
            target_date,
            observations,
        })
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn observations(&self) -> &[HourlyObservation] {
        &self.observations
    }

    /// One field across all 120 slots.
    pub fn series(&self, field: Field) -> Vec<f64> {
        self.observations.iter().map(|o| o.value(field)).collect()
    }

    /// Arithmetic mean temperature over the whole window.
    pub fn five_day_mean_temperature(&self) -> f64 {
        let sum: f64 = self.observations.iter().map(|o| o.temperature_c).sum();
        sum / self.observations.len() as f64
    }
}
