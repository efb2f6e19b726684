use crate::model::config::RuleTable;
use crate::types::assessment::BlastScore;

/// Maps a wet period and the five-day temperature to a blast score.
///
/// Rules apply in order, each later one overriding the last, except that a
/// wet period below the minimum duration always scores
/// [`BlastScore::NoInfection`]:
///
/// 1. too short for the period temperature: [`BlastScore::ShortWetPeriod`]
/// 2. period temperature outside the band: [`BlastScore::UnfavourableTemperature`]
/// 3. five-day mean above the hot limit: [`BlastScore::HotSpell`]
/// 4. five-day mean below the cool limit: [`BlastScore::CoolSpell`]
pub fn classify_risk(
    duration_hours: u32,
    mean_temperature: f64,
    five_day_mean_temperature: f64,
    rules: &RuleTable,
) -> BlastScore {
    if duration_hours < rules.min_wet_hours {
        return BlastScore::NoInfection;
    }

    let mut score = BlastScore::Favourable;

    if rules.in_temperature_band(mean_temperature) {
        if let Some(required) = rules.min_wet_hours_for(mean_temperature) {
            if duration_hours < required {
                score = BlastScore::ShortWetPeriod;
            }
        }
    }
    if !rules.in_temperature_band(mean_temperature) {
        score = BlastScore::UnfavourableTemperature;
    }
    if five_day_mean_temperature > rules.five_day_hot_limit {
        score = BlastScore::HotSpell;
    }
    if five_day_mean_temperature < rules.five_day_cool_limit {
        score = BlastScore::CoolSpell;
    }

    score
}
