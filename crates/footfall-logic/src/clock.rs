//! Plain-data wall-clock moments for axis labels.
//!
//! The viewer feeds in real local time; tests and the simtest harness
//! feed in fixed values. Nothing here touches a time source.

use serde::{Deserialize, Serialize};

/// An hour/minute pair with no date, zone, or clock attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
}

impl Moment {
    /// Create a moment, wrapping out-of-range values into 0-23 / 0-59.
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }

    /// Axis label in the dashboard format: unpadded hour, padded minute
    /// (`9:05`, `19:30`).
    pub fn label(&self) -> String {
        format!("{}:{:02}", self.hour, self.minute)
    }

    /// The moment `minutes` earlier, wrapping across midnight.
    pub fn minutes_earlier(&self, minutes: u32) -> Moment {
        const DAY: u32 = 24 * 60;
        let total = self.hour as u32 * 60 + self.minute as u32;
        let shifted = (total + DAY - minutes % DAY) % DAY;
        Moment {
            hour: (shifted / 60) as u8,
            minute: (shifted % 60) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_pads_minute_only() {
        assert_eq!(Moment::new(9, 5).label(), "9:05");
        assert_eq!(Moment::new(19, 30).label(), "19:30");
        assert_eq!(Moment::new(0, 0).label(), "0:00");
    }

    #[test]
    fn test_new_wraps() {
        assert_eq!(Moment::new(24, 60), Moment::new(0, 0));
        assert_eq!(Moment::new(25, 61).hour, 1);
        assert_eq!(Moment::new(25, 61).minute, 1);
    }

    #[test]
    fn test_minutes_earlier_same_hour() {
        let m = Moment::new(14, 30).minutes_earlier(10);
        assert_eq!(m, Moment::new(14, 20));
    }

    #[test]
    fn test_minutes_earlier_crosses_hour() {
        let m = Moment::new(14, 5).minutes_earlier(10);
        assert_eq!(m, Moment::new(13, 55));
    }

    #[test]
    fn test_minutes_earlier_wraps_midnight() {
        let m = Moment::new(0, 0).minutes_earlier(5);
        assert_eq!(m, Moment::new(23, 55));
    }

    #[test]
    fn test_minutes_earlier_full_day_is_identity() {
        let m = Moment::new(8, 15);
        assert_eq!(m.minutes_earlier(24 * 60), m);
    }
}
