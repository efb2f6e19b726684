//! Invocation driver: validates a provider's window and runs the model.
//!
//! Every failure is reported as an [`AssessmentError`] so that a batch can
//! drop the station for that date and carry on.

pub mod error;

use crate::assessment::error::AssessmentError;
use crate::model::KoshimizuModel;
use crate::types::assessment::RiskAssessment;
use crate::types::observation::{Field, HourlyObservation, RawHourlyRecord, Reading};
use crate::types::window::{ObservationWindow, RawWindow, WINDOW_HOURS};
use log::debug;

/// Validates `raw` and evaluates it.
///
/// # Errors
///
/// * [`AssessmentError::IncompleteWindow`] if the window does not hold
///   exactly 120 records.
/// * [`AssessmentError::MisalignedWindow`] if the records are not one per
///   consecutive hour of the window.
/// * [`AssessmentError::NumericCoercion`] if temperature, wind or rainfall
///   still holds text that is not a number.
/// * [`AssessmentError::InvalidInput`] if one of those fields still has
///   missing values.
pub fn assess_window(
    raw: &RawWindow,
    model: &KoshimizuModel,
) -> Result<RiskAssessment, AssessmentError> {
    let window = validate_window(raw)?;
    Ok(assess(&window, model))
}

/// Evaluates an already validated window.
pub fn assess(window: &ObservationWindow, model: &KoshimizuModel) -> RiskAssessment {
    let output = model.evaluate(window);
    debug!(
        "Station {} on {}: wet period {:?} ({} h, {:.1} °C), five-day mean {:.1} °C, score {}",
        window.station(),
        window.target_date(),
        output.wet_period.start_hour(),
        output.wet_period.duration_hours,
        output.wet_period.mean_temperature,
        output.five_day_mean_temperature,
        output.blast_score
    );

    RiskAssessment {
        station: window.station().to_string(),
        date: window.target_date(),
        wet_period: output.wet_period,
        five_day_mean_temperature: output.five_day_mean_temperature,
        blast_score: output.blast_score,
        wetness: output.wetness,
    }
}

/// Converts raw records into an [`ObservationWindow`].
///
/// Missing or unparseable sunshine is read as no sunshine.
pub fn validate_window(raw: &RawWindow) -> Result<ObservationWindow, AssessmentError> {
    if raw.records.len() != WINDOW_HOURS {
        return Err(AssessmentError::IncompleteWindow {
            station: raw.station.clone(),
            date: raw.target_date,
            expected: WINDOW_HOURS,
            found: raw.records.len(),
        });
    }

    for field in REQUIRED_FIELDS {
        check_numeric(raw, field)?;
    }
    for field in REQUIRED_FIELDS {
        check_present(raw, field)?;
    }

    let observations = raw
        .records
        .iter()
        .map(|record| HourlyObservation {
            timestamp: record.timestamp,
            temperature_c: required(record, Field::Temperature),
            wind_speed_ms: required(record, Field::WindSpeed),
            rainfall_mm: required(record, Field::Rainfall),
            sunshine_fraction_hr: record.sunshine.value().unwrap_or(0.0),
        })
        .collect();

    ObservationWindow::new(raw.station.clone(), raw.target_date, observations)
}

const REQUIRED_FIELDS: [Field; 3] = [Field::Temperature, Field::WindSpeed, Field::Rainfall];

fn check_numeric(raw: &RawWindow, field: Field) -> Result<(), AssessmentError> {
    for (slot, record) in raw.records.iter().enumerate() {
        if let Reading::Unparseable(text) = record.reading(field) {
            return Err(AssessmentError::NumericCoercion {
                station: raw.station.clone(),
                field,
                slot,
                value: text.clone(),
            });
        }
    }
    Ok(())
}

fn check_present(raw: &RawWindow, field: Field) -> Result<(), AssessmentError> {
    let missing = raw
        .records
        .iter()
        .filter(|record| matches!(record.reading(field), Reading::Missing))
        .count();
    if missing > 0 {
        return Err(AssessmentError::InvalidInput {
            station: raw.station.clone(),
            field,
            missing,
        });
    }
    Ok(())
}

// Only called after both checks have passed for `field`.
fn required(record: &RawHourlyRecord, field: Field) -> f64 {
    record.reading(field).value().unwrap_or(f64::NAN)
}
