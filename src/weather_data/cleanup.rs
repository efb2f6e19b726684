//! Quality gate and gap filling applied to a window before it is submitted
//! to the model.

use crate::types::observation::{Field, RawHourlyRecord, Reading};
use crate::weather_data::error::WeatherDataError;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Fields whose gaps disqualify a window. Missing sunshine is read as zero.
pub const QUALITY_FIELDS: [Field; 3] = [Field::Temperature, Field::WindSpeed, Field::Rainfall];

/// How missing or unparseable readings are resolved before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFill {
    /// Leave gaps in place; the driver rejects the window.
    #[default]
    None,
    /// Interpolate linearly between the nearest readings on either side;
    /// gaps at either end take the nearest reading.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Windows with more missing values than this in any quality field are
    /// not submitted.
    #[builder(default = 20)]
    pub max_missing_per_field: usize,
    #[builder(default)]
    pub gap_fill: GapFill,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_missing_per_field: 20,
            gap_fill: GapFill::None,
        }
    }
}

/// Counts readings in `field` that are missing or failed numeric coercion.
pub fn count_missing(records: &[RawHourlyRecord], field: Field) -> usize {
    records
        .iter()
        .filter(|record| record.reading(field).is_missing())
        .count()
}

/// Rejects the window if any quality field exceeds the allowed gaps, then
/// applies the configured gap fill.
pub fn clean_window(
    station: &str,
    records: &mut [RawHourlyRecord],
    options: &ProviderOptions,
) -> Result<(), WeatherDataError> {
    for field in QUALITY_FIELDS {
        let missing = count_missing(records, field);
        if missing > options.max_missing_per_field {
            return Err(WeatherDataError::TooManyMissing {
                station: station.to_string(),
                field,
                missing,
                allowed: options.max_missing_per_field,
            });
        }
    }

    if options.gap_fill == GapFill::Linear {
        for field in QUALITY_FIELDS {
            fill_linear(records, field);
        }
    }
    Ok(())
}

/// Replaces gaps in `field` by linear interpolation over record position.
///
/// Leaves the series untouched when it has no readings at all.
pub fn fill_linear(records: &mut [RawHourlyRecord], field: Field) {
    let known: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| record.reading(field).value().map(|v| (i, v)))
        .collect();
    let (Some(&(first_index, first_value)), Some(&(last_index, last_value))) =
        (known.first(), known.last())
    else {
        return;
    };

    for record in &mut records[..first_index] {
        *record.reading_mut(field) = Reading::Value(first_value);
    }
    for record in &mut records[last_index + 1..] {
        *record.reading_mut(field) = Reading::Value(last_value);
    }

    for pair in known.windows(2) {
        let (start, start_value) = pair[0];
        let (end, end_value) = pair[1];
        if end - start <= 1 {
            continue;
        }
        let slope = (end_value - start_value) / (end - start) as f64;
        for i in start + 1..end {
            let value = start_value + slope * (i - start) as f64;
            *records[i].reading_mut(field) = Reading::Value(value);
        }
    }
}
