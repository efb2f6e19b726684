//! Hour-by-hour leaf wetness over the 24-hour analysis cycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// First slot of the analysis cycle (16:00 the day before the target date).
pub const CYCLE_FIRST_SLOT: usize = 88;
/// Last slot of the analysis cycle (15:00 on the target date).
pub const CYCLE_LAST_SLOT: usize = 111;
pub const CYCLE_SLOTS: RangeInclusive<usize> = CYCLE_FIRST_SLOT..=CYCLE_LAST_SLOT;
const CYCLE_LEN: usize = CYCLE_LAST_SLOT - CYCLE_FIRST_SLOT + 1;

/// Inferred state of the leaf surface for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeafWetness {
    #[default]
    Dry,
    Wet,
    /// Too close to heavy rainfall to count as an infection onset.
    Invalidated,
}

impl LeafWetness {
    fn symbol(self) -> char {
        match self {
            LeafWetness::Dry => '.',
            LeafWetness::Wet => 'W',
            LeafWetness::Invalidated => 'x',
        }
    }
}

/// Wetness states keyed by absolute window slot, slots 88 to 111.
///
/// Keyed by slot rather than hour of day, so an hour of the previous
/// evening and the same hour on the target date never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WetnessMap {
    states: [LeafWetness; CYCLE_LEN],
}

impl WetnessMap {
    /// All hours `Dry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// State at `slot`, or `None` outside the analysis cycle.
    pub fn get(&self, slot: usize) -> Option<LeafWetness> {
        slot.checked_sub(CYCLE_FIRST_SLOT)
            .and_then(|i| self.states.get(i))
            .copied()
    }

    /// Sets the state at `slot`. Slots outside the cycle are ignored.
    pub fn set(&mut self, slot: usize, state: LeafWetness) {
        if let Some(entry) = slot
            .checked_sub(CYCLE_FIRST_SLOT)
            .and_then(|i| self.states.get_mut(i))
        {
            *entry = state;
        }
    }

    /// `true` only for in-cycle slots that are `Wet`.
    pub fn is_wet(&self, slot: usize) -> bool {
        self.get(slot) == Some(LeafWetness::Wet)
    }

    /// `(slot, state)` pairs in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, LeafWetness)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (CYCLE_FIRST_SLOT + i, *state))
    }

    pub fn count(&self, state: LeafWetness) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }
}

/// Compact trace, one character per hour from 16:00: `W` wet, `.` dry,
/// `x` invalidated.
impl fmt::Display for WetnessMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line: String = self.states.iter().map(|s| s.symbol()).collect();
        f.write_str(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_cycle_slots_are_ignored() {
        let mut map = WetnessMap::new();
        map.set(87, LeafWetness::Wet);
        map.set(112, LeafWetness::Wet);
        assert_eq!(map.get(87), None);
        assert_eq!(map.get(112), None);
        assert!(!map.is_wet(112));
        assert_eq!(map.count(LeafWetness::Dry), 24);
    }

    #[test]
    fn test_display_trace() {
        let mut map = WetnessMap::new();
        map.set(88, LeafWetness::Wet);
        map.set(111, LeafWetness::Invalidated);
        let trace = map.to_string();
        assert_eq!(trace.len(), 24);
        assert!(trace.starts_with('W'));
        assert!(trace.ends_with('x'));
    }

    #[test]
    fn test_iter_yields_absolute_slots() {
        let map = WetnessMap::new();
        let slots: Vec<usize> = map.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots.first(), Some(&88));
        assert_eq!(slots.last(), Some(&111));
    }
}
