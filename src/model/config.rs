//! Thresholds and switches for the Koshimizu model.
//!
//! The defaults reproduce the historical scoring output exactly. Any
//! deviation from it is expressed as an explicit, named setting here rather
//! than as a separate copy of the algorithm.

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Minimum wet-period hours for an infection at each rounded mean
/// temperature from 15 °C to 25 °C.
pub const MIN_WET_HOURS_BY_TEMPERATURE: [u32; 11] = [17, 15, 14, 13, 12, 11, 10, 10, 10, 10, 10];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleTableError {
    #[error("Temperature band {low}..={high} is empty")]
    InvertedBand { low: f64, high: f64 },

    #[error("Temperature band {low}..={high} spans {needed} whole degrees but the minimum wet hours table has {entries} entries")]
    BandWiderThanTable {
        low: f64,
        high: f64,
        needed: usize,
        entries: usize,
    },
}

/// Canonical rule thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    /// Sunshine reading that is treated as a recording artifact when it
    /// coincides with rain.
    pub trace_sunshine: f64,
    /// Accumulated evening sunshine above which leaves dry.
    pub sunshine_drying: f64,
    /// Wind speed (m/s) that dries the leaf on its own.
    pub strong_wind: f64,
    /// Wind speed (m/s) that dries the leaf when sustained or without rain.
    pub moderate_wind: f64,
    /// Daytime sunshine at or below which a neighbour of rain can stay wet.
    pub daytime_sunshine_ceiling: f64,
    /// Wind speed at or below which a single dry daytime hour is bridged.
    pub gap_merge_wind_ceiling: f64,
    /// Hourly rainfall (mm) above which nearby wetness is invalidated.
    pub heavy_rain_mm: f64,
    /// Hours invalidated on either side of a heavy rain hour.
    pub invalidation_radius_hours: usize,
    /// Wet periods shorter than this score as no infection.
    pub min_wet_hours: u32,
    pub temperature_band_low: f64,
    pub temperature_band_high: f64,
    /// Indexed by `round(mean) - temperature_band_low`.
    pub min_wet_hours_by_temperature: [u32; 11],
    pub five_day_hot_limit: f64,
    pub five_day_cool_limit: f64,
}

impl RuleTable {
    pub const KOSHIMIZU: RuleTable = RuleTable {
        trace_sunshine: 0.1,
        sunshine_drying: 0.2,
        strong_wind: 4.0,
        moderate_wind: 3.0,
        daytime_sunshine_ceiling: 0.1,
        gap_merge_wind_ceiling: 3.0,
        heavy_rain_mm: 4.0,
        invalidation_radius_hours: 9,
        min_wet_hours: 10,
        temperature_band_low: 15.0,
        temperature_band_high: 25.0,
        min_wet_hours_by_temperature: MIN_WET_HOURS_BY_TEMPERATURE,
        five_day_hot_limit: 25.0,
        five_day_cool_limit: 20.0,
    };

    /// Looks up the minimum wet hours for a period mean temperature.
    ///
    /// The mean is rounded half-to-even, matching the historical scores.
    /// Returns `None` outside the table.
    pub fn min_wet_hours_for(&self, mean_temperature: f64) -> Option<u32> {
        let index = mean_temperature.round_ties_even() - self.temperature_band_low.round_ties_even();
        if index < 0.0 {
            return None;
        }
        self.min_wet_hours_by_temperature
            .get(index as usize)
            .copied()
    }

    /// Checks that every rounded temperature in the band has a
    /// minimum wet hours entry.
    pub fn validate(&self) -> Result<(), RuleTableError> {
        let (low, high) = (self.temperature_band_low, self.temperature_band_high);
        if !matches!(low.partial_cmp(&high), Some(Ordering::Less | Ordering::Equal)) {
            return Err(RuleTableError::InvertedBand { low, high });
        }
        let needed = (high.round_ties_even() - low.round_ties_even()) as usize + 1;
        let entries = self.min_wet_hours_by_temperature.len();
        if needed > entries {
            return Err(RuleTableError::BandWiderThanTable {
                low,
                high,
                needed,
                entries,
            });
        }
        Ok(())
    }

    pub(crate) fn in_temperature_band(&self, temperature: f64) -> bool {
        (self.temperature_band_low..=self.temperature_band_high).contains(&temperature)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::KOSHIMIZU
    }
}

/// Which night hours the morning wind break applies to.
///
/// The historical guard reads `hour >= 4 or hour <= 7`, which holds for
/// every hour, so the break has always applied across the whole night
/// span. Whether the narrower 04:00–07:00 reading was intended still needs
/// the model owner's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorningWindGuard {
    /// Every hour of the night span, as historically scored.
    #[default]
    Literal,
    /// Only 04:00 through 07:00.
    MorningHoursOnly,
}

impl MorningWindGuard {
    pub(crate) fn applies(self, hour: usize) -> bool {
        match self {
            MorningWindGuard::Literal => true,
            MorningWindGuard::MorningHoursOnly => (4..=7).contains(&hour),
        }
    }
}

/// Per-invocation model configuration.
///
/// # Examples
///
/// ```
/// use blastam::{ModelConfig, MorningWindGuard};
///
/// let config = ModelConfig::builder()
///     .morning_wind_guard(MorningWindGuard::MorningHoursOnly)
///     .trace(true)
///     .build();
/// assert!(config.trace);
/// assert_eq!(ModelConfig::default().morning_wind_guard, MorningWindGuard::Literal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    #[builder(default)]
    pub rules: RuleTable,
    #[builder(default)]
    pub morning_wind_guard: MorningWindGuard,
    /// Log the wetness map after every inference rule at debug level.
    #[builder(default)]
    pub trace: bool,
}
