//! Outputs of the model: the located wet period, the ordinal blast score,
//! and the assessment that bundles them for one station and date.

use crate::types::wetness::WetnessMap;
use crate::types::window::hour_of_slot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The first contiguous run of wet hours in the analysis cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WetPeriodResult {
    /// Absolute slot of the first wet hour.
    pub start: Option<usize>,
    /// Absolute slot of the last wet hour.
    pub end: Option<usize>,
    pub duration_hours: u32,
    /// Mean temperature over the run; 0 when there is no run.
    pub mean_temperature: f64,
}

impl WetPeriodResult {
    pub fn start_hour(&self) -> Option<usize> {
        self.start.map(hour_of_slot)
    }

    pub fn end_hour(&self) -> Option<usize> {
        self.end.map(hour_of_slot)
    }
}

/// Ordinal rice blast infection risk, -1 (none) through 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum BlastScore {
    /// Wet period shorter than the infection minimum.
    NoInfection,
    /// Five-day mean below the cool limit.
    CoolSpell,
    /// Five-day mean above the hot limit.
    HotSpell,
    /// Wet period mean temperature outside the infection band.
    UnfavourableTemperature,
    /// Within the band but too short for its temperature.
    ShortWetPeriod,
    Favourable,
}

impl BlastScore {
    pub fn value(self) -> i8 {
        match self {
            BlastScore::NoInfection => -1,
            BlastScore::CoolSpell => 1,
            BlastScore::HotSpell => 2,
            BlastScore::UnfavourableTemperature => 3,
            BlastScore::ShortWetPeriod => 4,
            BlastScore::Favourable => 5,
        }
    }
}

impl From<BlastScore> for i8 {
    fn from(score: BlastScore) -> Self {
        score.value()
    }
}

impl TryFrom<i8> for BlastScore {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(BlastScore::NoInfection),
            1 => Ok(BlastScore::CoolSpell),
            2 => Ok(BlastScore::HotSpell),
            3 => Ok(BlastScore::UnfavourableTemperature),
            4 => Ok(BlastScore::ShortWetPeriod),
            5 => Ok(BlastScore::Favourable),
            other => Err(format!("{} is not a blast score", other)),
        }
    }
}

impl fmt::Display for BlastScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Result of evaluating one station for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub station: String,
    pub date: NaiveDate,
    pub wet_period: WetPeriodResult,
    pub five_day_mean_temperature: f64,
    pub blast_score: BlastScore,
    pub wetness: WetnessMap,
}
