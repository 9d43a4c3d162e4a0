//! Dashboard constants - cave set, tick timing, series sizing, store keys.
//!
//! Simple values with no I/O dependency. Both the Bevy viewer and the
//! native simtest harness use these.

/// The five exhibit caves the dashboard tracks, keyed by grotto number.
pub const CAVE_KEYS: [&str; 5] = ["17", "18", "19", "20", "21"];

/// Seconds between simulated visitor-flow ticks.
pub const TICK_INTERVAL_SECS: f32 = 5.0;

/// Points kept in the occupancy time series (two hours at 5-minute spacing).
pub const MAX_SAMPLES: usize = 24;

/// Minutes between synthetic backfill samples.
pub const BACKFILL_SPACING_MIN: u32 = 5;

/// Store key for the all-time entry counts.
pub const CUMULATIVE_KEY: &str = "cave_counts";

/// Store key for the live occupancy counts.
pub const OCCUPANCY_KEY: &str = "current_visitors";

/// Returns true if `key` names a tracked cave.
pub fn is_cave_key(key: &str) -> bool {
    CAVE_KEYS.contains(&key)
}

/// Human-readable name for a cave key.
pub fn display_name(key: &str) -> String {
    format!("Cave {}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cave_keys_fixed_set() {
        assert_eq!(CAVE_KEYS.len(), 5);
        assert!(is_cave_key("17"));
        assert!(is_cave_key("21"));
        assert!(!is_cave_key("16"));
        assert!(!is_cave_key("22"));
        assert!(!is_cave_key(""));
    }

    #[test]
    fn test_cave_keys_sorted() {
        // BTreeMap iteration relies on lexicographic order matching numeric order
        let mut sorted = CAVE_KEYS.to_vec();
        sorted.sort();
        assert_eq!(sorted, CAVE_KEYS.to_vec());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("17"), "Cave 17");
    }
}
