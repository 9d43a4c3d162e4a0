//! Cave tallies - the two cave→count maps behind both charts.

use std::collections::BTreeMap;

use crate::constants::{is_cave_key, CAVE_KEYS};
use crate::flow::TickOutcome;

/// All-time entries plus live occupancy for every tracked cave.
///
/// Both maps always hold exactly the keys in
/// [`CAVE_KEYS`](crate::constants::CAVE_KEYS). Occupancy is unsigned and
/// decrements saturate, so it can never go below zero; cumulative counts
/// only ever grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    /// Cave → all-time entry count.
    pub cumulative: BTreeMap<String, u64>,
    /// Cave → visitors inside right now.
    pub occupancy: BTreeMap<String, u64>,
}

impl Tally {
    /// Zeroed tallies for the full cave set.
    pub fn new() -> Self {
        Self {
            cumulative: zeroed(),
            occupancy: zeroed(),
        }
    }

    /// Rebuild from possibly-partial restored maps. Missing caves are
    /// zero-filled and keys outside the tracked set are dropped.
    pub fn from_parts(
        cumulative: BTreeMap<String, u64>,
        occupancy: BTreeMap<String, u64>,
    ) -> Self {
        Self {
            cumulative: normalize(cumulative),
            occupancy: normalize(occupancy),
        }
    }

    /// Register one walk-in: both counters up by one. Returns false for
    /// an unknown cave key, leaving the tallies untouched.
    pub fn record_entry(&mut self, cave: &str) -> bool {
        if !is_cave_key(cave) {
            return false;
        }
        if let Some(c) = self.cumulative.get_mut(cave) {
            *c += 1;
        }
        if let Some(o) = self.occupancy.get_mut(cave) {
            *o += 1;
        }
        true
    }

    /// Apply one tick outcome to a cave. Unknown keys are ignored.
    pub fn apply(&mut self, cave: &str, outcome: TickOutcome) {
        if outcome.entered {
            if let Some(c) = self.cumulative.get_mut(cave) {
                *c += 1;
            }
            if let Some(o) = self.occupancy.get_mut(cave) {
                *o += 1;
            }
        }
        if outcome.exited {
            if let Some(o) = self.occupancy.get_mut(cave) {
                *o = o.saturating_sub(1);
            }
        }
    }

    /// Visitors inside `cave` right now (0 for unknown keys).
    pub fn occupancy_of(&self, cave: &str) -> u64 {
        self.occupancy.get(cave).copied().unwrap_or(0)
    }

    /// All-time entries for `cave` (0 for unknown keys).
    pub fn visits_of(&self, cave: &str) -> u64 {
        self.cumulative.get(cave).copied().unwrap_or(0)
    }

    /// Visitors inside across all caves.
    pub fn total_occupancy(&self) -> u64 {
        self.occupancy.values().sum()
    }

    /// All-time entries across all caves.
    pub fn total_visits(&self) -> u64 {
        self.cumulative.values().sum()
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

/// Project a restored map onto the tracked cave set: zero-fill missing
/// caves, drop unknown keys.
pub fn normalize(map: BTreeMap<String, u64>) -> BTreeMap<String, u64> {
    CAVE_KEYS
        .iter()
        .map(|&key| (key.to_string(), map.get(key).copied().unwrap_or(0)))
        .collect()
}

fn zeroed() -> BTreeMap<String, u64> {
    CAVE_KEYS.iter().map(|&key| (key.to_string(), 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_covers_exact_cave_set() {
        let tally = Tally::new();
        assert_eq!(tally.cumulative.len(), CAVE_KEYS.len());
        assert_eq!(tally.occupancy.len(), CAVE_KEYS.len());
        for key in CAVE_KEYS {
            assert_eq!(tally.visits_of(key), 0);
            assert_eq!(tally.occupancy_of(key), 0);
        }
    }

    #[test]
    fn test_normalize_fills_missing_and_drops_unknown() {
        let mut partial = BTreeMap::new();
        partial.insert("17".to_string(), 42);
        partial.insert("99".to_string(), 7); // not a tracked cave

        let normalized = normalize(partial);
        assert_eq!(normalized.len(), CAVE_KEYS.len());
        assert_eq!(normalized["17"], 42);
        assert_eq!(normalized["18"], 0);
        assert!(!normalized.contains_key("99"));
    }

    #[test]
    fn test_record_entry_bumps_both() {
        let mut tally = Tally::new();
        assert!(tally.record_entry("19"));
        assert_eq!(tally.visits_of("19"), 1);
        assert_eq!(tally.occupancy_of("19"), 1);
    }

    #[test]
    fn test_record_entry_unknown_key_rejected() {
        let mut tally = Tally::new();
        assert!(!tally.record_entry("99"));
        assert_eq!(tally.total_visits(), 0);
        assert_eq!(tally.total_occupancy(), 0);
    }

    #[test]
    fn test_apply_entry_and_exit() {
        let mut tally = Tally::new();
        tally.apply(
            "17",
            TickOutcome {
                entered: true,
                exited: false,
            },
        );
        tally.apply(
            "17",
            TickOutcome {
                entered: true,
                exited: true,
            },
        );
        // Two entries, one exit
        assert_eq!(tally.visits_of("17"), 2);
        assert_eq!(tally.occupancy_of("17"), 1);
    }

    #[test]
    fn test_apply_exit_saturates_at_zero() {
        let mut tally = Tally::new();
        tally.apply(
            "18",
            TickOutcome {
                entered: false,
                exited: true,
            },
        );
        assert_eq!(tally.occupancy_of("18"), 0);
    }

    #[test]
    fn test_totals_sum_per_cave_values() {
        let mut tally = Tally::new();
        tally.record_entry("17");
        tally.record_entry("17");
        tally.record_entry("21");
        assert_eq!(tally.total_visits(), 3);
        assert_eq!(tally.total_occupancy(), 3);
        assert_eq!(
            tally.total_occupancy(),
            CAVE_KEYS.iter().map(|&k| tally.occupancy_of(k)).sum::<u64>()
        );
    }
}
