//! Hourly weather observations, both as ingested (possibly missing or
//! unparseable values) and as validated input for the leaf wetness model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A field value that could not be interpreted as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a numeric reading")]
pub struct NumericCoercionError {
    pub value: String,
}

/// Coerces raw text into a finite number.
pub fn coerce_numeric(raw: &str) -> Result<f64, NumericCoercionError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(NumericCoercionError {
            value: trimmed.to_string(),
        }),
    }
}

/// A single field reading as delivered by a weather file.
///
/// Unparseable text is kept around so the invocation driver can report
/// exactly what failed coercion, but for quality-threshold purposes it
/// counts the same as a missing value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reading {
    Value(f64),
    #[default]
    Missing,
    Unparseable(String),
}

impl Reading {
    /// Parses an optional raw cell. Empty cells are `Missing`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blastam::Reading;
    ///
    /// assert_eq!(Reading::parse(Some(" 1.5 ")), Reading::Value(1.5));
    /// assert_eq!(Reading::parse(Some("")), Reading::Missing);
    /// assert_eq!(Reading::parse(None), Reading::Missing);
    /// assert_eq!(Reading::parse(Some("--")), Reading::Unparseable("--".to_string()));
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Reading::Missing,
            Some(text) => match coerce_numeric(text) {
                Ok(value) => Reading::Value(value),
                Err(e) => Reading::Unparseable(e.value),
            },
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        !matches!(self, Reading::Value(_))
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Value(value)
    }
}

/// The four meteorological fields consumed by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Temperature,
    WindSpeed,
    Rainfall,
    Sunshine,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Temperature,
        Field::WindSpeed,
        Field::Rainfall,
        Field::Sunshine,
    ];

    /// Column header used in the JMA AMeDAS hourly CSV exports.
    pub(crate) fn column_header(&self) -> &'static str {
        match self {
            Field::Temperature => "気温(℃)",
            Field::WindSpeed => "風速(m/s)",
            Field::Rainfall => "降水量(mm)",
            Field::Sunshine => "日照時間(時間)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Temperature => "temperature",
            Field::WindSpeed => "wind speed",
            Field::Rainfall => "rainfall",
            Field::Sunshine => "sunshine",
        };
        f.write_str(name)
    }
}

/// One hour of ingested data, before quality checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHourlyRecord {
    pub timestamp: NaiveDateTime,
    pub temperature: Reading,
    pub wind_speed: Reading,
    pub rainfall: Reading,
    pub sunshine: Reading,
}

impl RawHourlyRecord {
    pub fn reading(&self, field: Field) -> &Reading {
        match field {
            Field::Temperature => &self.temperature,
            Field::WindSpeed => &self.wind_speed,
            Field::Rainfall => &self.rainfall,
            Field::Sunshine => &self.sunshine,
        }
    }

    pub(crate) fn reading_mut(&mut self, field: Field) -> &mut Reading {
        match field {
            Field::Temperature => &mut self.temperature,
            Field::WindSpeed => &mut self.wind_speed,
            Field::Rainfall => &mut self.rainfall,
            Field::Sunshine => &mut self.sunshine,
        }
    }
}

/// One validated hour of weather at a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    pub timestamp: NaiveDateTime,
    /// Air temperature in °C.
    pub temperature_c: f64,
    /// Mean wind speed in m/s.
    pub wind_speed_ms: f64,
    /// Precipitation in mm over the hour.
    pub rainfall_mm: f64,
    /// Fraction of the hour with sunshine, 0 to 1.
    pub sunshine_fraction_hr: f64,
}

impl HourlyObservation {
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Temperature => self.temperature_c,
            Field::WindSpeed => self.wind_speed_ms,
            Field::Rainfall => self.rainfall_mm,
            Field::Sunshine => self.sunshine_fraction_hr,
        }
    }
}
