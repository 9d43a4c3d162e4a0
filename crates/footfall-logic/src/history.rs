//! Occupancy time series - a bounded FIFO of labelled samples.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::clock::Moment;
use crate::constants::{BACKFILL_SPACING_MIN, MAX_SAMPLES};

/// One point on the flow chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Axis label, `H:MM`.
    pub label: String,
    /// Total occupancy across all caves at sample time.
    pub value: u64,
}

/// Fixed-capacity series. Pushing past capacity evicts the oldest point,
/// so the chart always shows the most recent window.
#[derive(Debug, Clone)]
pub struct History {
    points: VecDeque<SamplePoint>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SAMPLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting from the front if full.
    pub fn push(&mut self, point: SamplePoint) {
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Record a sample taken at `now`.
    pub fn record(&mut self, now: Moment, total_occupancy: u64) {
        self.push(SamplePoint {
            label: now.label(),
            value: total_occupancy,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&SamplePoint> {
        self.points.back()
    }

    /// Points oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter()
    }

    /// Replace the series with synthetic past samples so the chart opens
    /// full instead of growing point by point.
    ///
    /// Samples sit [`BACKFILL_SPACING_MIN`] minutes apart ending at `now`.
    /// Each value is the current total shaped by that hour's typical load
    /// plus a small sine wobble, floored at zero.
    pub fn backfill(&mut self, now: Moment, current_total: u64) {
        self.points.clear();
        let total = current_total as f32;
        for slot in (0..self.capacity).rev() {
            let at = now.minutes_earlier(slot as u32 * BACKFILL_SPACING_MIN);
            let base = total * hour_ratio(at.hour);
            let wobble = (slot as f32 * 0.3).sin() * total * 0.2;
            let value = (base + wobble).floor().max(0.0) as u64;
            self.push(SamplePoint {
                label: at.label(),
                value,
            });
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Typical share of peak load for a given hour: quiet before opening,
/// building through the morning, full afternoons, tapering evenings.
pub fn hour_ratio(hour: u8) -> f32 {
    if hour < 9 {
        0.3
    } else if hour < 12 {
        0.6
    } else if hour < 18 {
        1.0
    } else {
        0.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, value: u64) -> SamplePoint {
        SamplePoint {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_push_within_capacity() {
        let mut history = History::with_capacity(4);
        history.push(point("10:00", 1));
        history.push(point("10:05", 2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().value, 2);
    }

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut history = History::with_capacity(3);
        for i in 0..5u64 {
            history.push(point(&format!("t{}", i), i));
        }
        assert_eq!(history.len(), 3);
        let values: Vec<u64> = history.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2, 3, 4]);
    }

    #[test]
    fn test_default_capacity_bounds_series() {
        let mut history = History::new();
        for i in 0..(MAX_SAMPLES as u64 * 2) {
            history.record(Moment::new(12, (i % 60) as u8), i);
        }
        assert_eq!(history.len(), MAX_SAMPLES);
        assert_eq!(history.latest().unwrap().value, MAX_SAMPLES as u64 * 2 - 1);
    }

    #[test]
    fn test_record_uses_moment_label() {
        let mut history = History::new();
        history.record(Moment::new(9, 5), 12);
        assert_eq!(history.latest().unwrap().label, "9:05");
    }

    #[test]
    fn test_backfill_fills_to_capacity() {
        let mut history = History::new();
        history.backfill(Moment::new(14, 0), 40);
        assert_eq!(history.len(), MAX_SAMPLES);
        // Newest sample carries the current time's label
        assert_eq!(history.latest().unwrap().label, "14:00");
        // Oldest sits 23 slots of 5 minutes earlier
        assert_eq!(history.iter().next().unwrap().label, "12:05");
    }

    #[test]
    fn test_backfill_values_bounded() {
        let mut history = History::new();
        history.backfill(Moment::new(14, 0), 40);
        for p in history.iter() {
            // ratio tops out at 1.0 and the wobble at +20%
            assert!(p.value <= 48, "value {} out of range", p.value);
        }
    }

    #[test]
    fn test_backfill_zero_total_is_flat_zero() {
        let mut history = History::new();
        history.backfill(Moment::new(10, 30), 0);
        assert!(history.iter().all(|p| p.value == 0));
    }

    #[test]
    fn test_backfill_replaces_existing_points() {
        let mut history = History::new();
        history.record(Moment::new(8, 0), 999);
        history.backfill(Moment::new(14, 0), 10);
        assert_eq!(history.len(), MAX_SAMPLES);
        assert!(history.iter().all(|p| p.value <= 12));
    }

    #[test]
    fn test_hour_ratio_tiers() {
        assert_eq!(hour_ratio(0), 0.3);
        assert_eq!(hour_ratio(8), 0.3);
        assert_eq!(hour_ratio(9), 0.6);
        assert_eq!(hour_ratio(11), 0.6);
        assert_eq!(hour_ratio(12), 1.0);
        assert_eq!(hour_ratio(17), 1.0);
        assert_eq!(hour_ratio(18), 0.4);
        assert_eq!(hour_ratio(23), 0.4);
    }
}
