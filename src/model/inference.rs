//! Leaf wetness inference from rainfall, wind and sunshine.
//!
//! Four rules run in a fixed order over one [`WetnessMap`], each free to
//! overwrite what an earlier one set:
//!
//! 1. night rule, 16:00 through 07:00 (slots 88..=103)
//! 2. day rule, 08:00 through 15:00 (slots 104..=111)
//! 3. gap merge over the same daytime hours
//! 4. heavy rainfall invalidation over the whole cycle

use crate::model::config::{ModelConfig, MorningWindGuard, RuleTable};
use crate::types::observation::Field;
use crate::types::wetness::{LeafWetness, WetnessMap, CYCLE_SLOTS};
use crate::types::window::{hour_of_slot, ObservationWindow};
use log::debug;
use std::ops::RangeInclusive;

pub const NIGHT_SLOTS: RangeInclusive<usize> = 88..=103;
pub const DAYTIME_SLOTS: RangeInclusive<usize> = 104..=111;

/// Hours either side of a daytime rain hour that can inherit its wetness.
const RAIN_SPREAD_HOURS: isize = 3;

/// Rainfall, wind and sunshine across the full window.
pub(crate) struct WeatherSeries {
    pub rainfall: Vec<f64>,
    pub wind: Vec<f64>,
    pub sunshine: Vec<f64>,
}

impl WeatherSeries {
    pub fn from_window(window: &ObservationWindow) -> Self {
        Self {
            rainfall: window.series(Field::Rainfall),
            wind: window.series(Field::WindSpeed),
            sunshine: window.series(Field::Sunshine),
        }
    }
}

/// Runs all four rules and returns the final wetness map.
pub fn infer_leaf_wetness(window: &ObservationWindow, config: &ModelConfig) -> WetnessMap {
    let series = WeatherSeries::from_window(window);
    let mut map = WetnessMap::new();
    let rules = &config.rules;

    apply_night_rule(&mut map, &series, rules, config.morning_wind_guard);
    trace_rule(config, window, "night", &map);
    apply_day_rule(&mut map, &series, rules);
    trace_rule(config, window, "day", &map);
    apply_gap_merge(&mut map, &series, rules);
    trace_rule(config, window, "gap merge", &map);
    apply_heavy_rain_invalidation(&mut map, &series, rules);
    trace_rule(config, window, "invalidation", &map);

    map
}

fn trace_rule(config: &ModelConfig, window: &ObservationWindow, rule: &str, map: &WetnessMap) {
    if config.trace {
        debug!(
            "[{} {}] after {} rule: {}",
            window.station(),
            window.target_date(),
            rule,
            map
        );
    }
}

/// Evening and overnight wetness.
///
/// The wet state carries from one hour to the next: rain in the following
/// hour wets the leaf, and only the drying conditions below clear it.
pub(crate) fn apply_night_rule(
    map: &mut WetnessMap,
    series: &WeatherSeries,
    rules: &RuleTable,
    guard: MorningWindGuard,
) {
    let rainfall = &series.rainfall[NIGHT_SLOTS];
    let wind = &series.wind[NIGHT_SLOTS];
    let mut sunshine = series.sunshine[NIGHT_SLOTS].to_vec();
    let last = rainfall.len() - 1;

    let mut wet = false;
    let mut accumulated_sunshine = 0.0;

    for key in 0..rainfall.len() {
        let slot = NIGHT_SLOTS.start() + key;
        let hour = hour_of_slot(slot);

        // Wetness begins one hour before recorded rainfall.
        if key < last && rainfall[key + 1] > 0.0 {
            wet = true;
        }

        // Trace sunshine alongside rain is a recording artifact.
        if rainfall[key] > 0.0 && sunshine[key] == rules.trace_sunshine {
            sunshine[key] = 0.0;
        }

        accumulated_sunshine += sunshine[key];
        if hour == 0 {
            accumulated_sunshine = 0.0;
        }
        if accumulated_sunshine > rules.sunshine_drying {
            wet = false;
        }

        if wind[key] >= rules.strong_wind {
            wet = false;
        }

        if (2..last).contains(&key) && (hour >= 16 || hour <= 4) {
            let sustained = wind[key - 1] >= rules.moderate_wind
                && wind[key] >= rules.moderate_wind
                && wind[key + 1] >= rules.moderate_wind;
            if sustained || wind[key + 1] >= rules.strong_wind {
                wet = false;
            }
        }

        if guard.applies(hour) {
            let dry_wind = rainfall[key] == 0.0 && wind[key] >= rules.moderate_wind;
            let wet_wind = rainfall[key] > 0.0 && wind[key] >= rules.strong_wind;
            if dry_wind || wet_wind {
                wet = false;
            }
        }

        map.set(slot, if wet { LeafWetness::Wet } else { LeafWetness::Dry });
    }
}

/// Daytime wetness spreads from rain hours to calm, overcast neighbours.
pub(crate) fn apply_day_rule(map: &mut WetnessMap, series: &WeatherSeries, rules: &RuleTable) {
    for slot in DAYTIME_SLOTS {
        map.set(slot, LeafWetness::Dry);
    }

    for slot in DAYTIME_SLOTS {
        if series.rainfall[slot] <= 0.0 {
            continue;
        }
        for offset in -RAIN_SPREAD_HOURS..=RAIN_SPREAD_HOURS {
            let Some(target) = slot.checked_add_signed(offset) else {
                continue;
            };
            if !DAYTIME_SLOTS.contains(&target) {
                continue;
            }
            if series.wind[target] < rules.moderate_wind
                && series.sunshine[target] <= rules.daytime_sunshine_ceiling
            {
                map.set(target, LeafWetness::Wet);
            }
        }
    }
}

/// Bridges a single dry daytime hour that sits between two wet hours.
///
/// Runs in slot order and sees its own promotions. A neighbour outside the
/// analysis cycle never counts as wet.
pub(crate) fn apply_gap_merge(map: &mut WetnessMap, series: &WeatherSeries, rules: &RuleTable) {
    for slot in DAYTIME_SLOTS {
        if map.get(slot) != Some(LeafWetness::Dry) {
            continue;
        }
        if map.is_wet(slot - 1)
            && map.is_wet(slot + 1)
            && series.sunshine[slot] <= rules.daytime_sunshine_ceiling
            && series.wind[slot] <= rules.gap_merge_wind_ceiling
        {
            map.set(slot, LeafWetness::Wet);
        }
    }
}

/// Invalidates every hour within the radius of a heavy rainfall hour.
pub(crate) fn apply_heavy_rain_invalidation(
    map: &mut WetnessMap,
    series: &WeatherSeries,
    rules: &RuleTable,
) {
    let radius = rules.invalidation_radius_hours;
    for slot in CYCLE_SLOTS {
        if series.rainfall[slot] <= rules.heavy_rain_mm {
            continue;
        }
        let from = slot.saturating_sub(radius).max(*CYCLE_SLOTS.start());
        let to = slot.saturating_add(radius).min(*CYCLE_SLOTS.end());
        for target in from..=to {
            map.set(target, LeafWetness::Invalidated);
        }
    }
}
