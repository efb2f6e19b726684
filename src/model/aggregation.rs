use crate::types::assessment::WetPeriodResult;
use crate::types::wetness::{LeafWetness, WetnessMap};

/// Locates the first contiguous run of wet hours and its mean temperature.
///
/// Dry or invalidated hours before the run are skipped; the first one after
/// the run has started ends it. `temperature` is indexed by absolute slot.
pub fn aggregate_wet_period(map: &WetnessMap, temperature: &[f64]) -> WetPeriodResult {
    let mut start = None;
    let mut end = None;
    let mut duration_hours = 0u32;
    let mut temperature_sum = 0.0;

    for (slot, state) in map.iter() {
        if state == LeafWetness::Wet {
            start.get_or_insert(slot);
            end = Some(slot);
            duration_hours += 1;
            temperature_sum += temperature[slot];
        } else if start.is_some() {
            break;
        }
    }

    let mean_temperature = if duration_hours > 0 {
        temperature_sum / duration_hours as f64
    } else {
        0.0
    };

    WetPeriodResult {
        start,
        end,
        duration_hours,
        mean_temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::window::WINDOW_HOURS;

    fn temperatures() -> Vec<f64> {
        (0..WINDOW_HOURS).map(|slot| slot as f64 / 10.0).collect()
    }

    #[test]
    fn test_no_wet_hours() {
        let result = aggregate_wet_period(&WetnessMap::new(), &temperatures());
        assert_eq!(result.start, None);
        assert_eq!(result.end, None);
        assert_eq!(result.duration_hours, 0);
        assert_eq!(result.mean_temperature, 0.0);
    }

    #[test]
    fn test_first_run_only() {
        let mut map = WetnessMap::new();
        for slot in [90, 91, 92, 95, 96] {
            map.set(slot, LeafWetness::Wet);
        }
        let result = aggregate_wet_period(&map, &temperatures());
        assert_eq!(result.start, Some(90));
        assert_eq!(result.end, Some(92));
        assert_eq!(result.duration_hours, 3);
        assert!((result.mean_temperature - 9.1).abs() < 1e-9);
    }

    #[test]
    fn test_leading_invalidated_hours_are_skipped() {
        let mut map = WetnessMap::new();
        map.set(88, LeafWetness::Invalidated);
        map.set(89, LeafWetness::Invalidated);
        map.set(90, LeafWetness::Wet);
        map.set(91, LeafWetness::Wet);
        map.set(92, LeafWetness::Invalidated);
        map.set(93, LeafWetness::Wet);
        let result = aggregate_wet_period(&map, &temperatures());
        assert_eq!(result.start, Some(90));
        assert_eq!(result.end, Some(91));
        assert_eq!(result.duration_hours, 2);
    }

    #[test]
    fn test_run_starting_at_midnight() {
        let mut map = WetnessMap::new();
        for slot in 96..=99 {
            map.set(slot, LeafWetness::Wet);
        }
        let result = aggregate_wet_period(&map, &temperatures());
        assert_eq!(result.start_hour(), Some(0));
        assert_eq!(result.end_hour(), Some(3));
        assert_eq!(result.duration_hours, 4);
    }

    #[test]
    fn test_full_cycle_wet() {
        let mut map = WetnessMap::new();
        for slot in 88..=111 {
            map.set(slot, LeafWetness::Wet);
        }
        let result = aggregate_wet_period(&map, &vec![20.0; WINDOW_HOURS]);
        assert_eq!(result.duration_hours, 24);
        assert_eq!(result.end, Some(111));
        assert_eq!(result.mean_temperature, 20.0);
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let mut map = WetnessMap::new();
        for slot in 100..=110 {
            map.set(slot, LeafWetness::Wet);
        }
        let temps = temperatures();
        let first = aggregate_wet_period(&map, &temps);
        let second = aggregate_wet_period(&map, &temps);
        assert_eq!(first, second);
    }
}
