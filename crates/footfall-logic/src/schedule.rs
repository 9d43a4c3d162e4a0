//! Visiting-hours display values - peak window and mean stay time.

use crate::flow::FlowParams;

/// Expected busiest window for the given hour of day.
///
/// Evenings fall in the night-illumination window, lunchtime in the
/// midday rush, late night in the closing window. Every other hour
/// reports the evening window as the day's overall peak.
pub fn peak_window(hour: u8) -> &'static str {
    match hour {
        19..=21 => "19:30 - 22:00",
        12..=13 => "12:00 - 13:30",
        22..=23 => "22:00 - 23:30",
        _ => "19:30 - 22:00",
    }
}

/// Mean of the per-cave average stays, rounded to whole minutes.
pub fn average_stay_minutes(params: &[FlowParams]) -> u32 {
    if params.is_empty() {
        return 0;
    }
    let sum: f32 = params.iter().map(|p| p.avg_stay_minutes).sum();
    (sum / params.len() as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_window_every_hour_mapped() {
        let windows = ["19:30 - 22:00", "12:00 - 13:30", "22:00 - 23:30"];
        for hour in 0..24 {
            assert!(
                windows.contains(&peak_window(hour)),
                "hour {} gave {}",
                hour,
                peak_window(hour)
            );
        }
    }

    #[test]
    fn test_peak_window_tiers() {
        assert_eq!(peak_window(19), "19:30 - 22:00");
        assert_eq!(peak_window(21), "19:30 - 22:00");
        assert_eq!(peak_window(12), "12:00 - 13:30");
        assert_eq!(peak_window(13), "12:00 - 13:30");
        assert_eq!(peak_window(22), "22:00 - 23:30");
        assert_eq!(peak_window(23), "22:00 - 23:30");
        // Off-peak hours report the evening window
        assert_eq!(peak_window(3), "19:30 - 22:00");
        assert_eq!(peak_window(14), "19:30 - 22:00");
    }

    #[test]
    fn test_average_stay_rounds_mean() {
        let params = [
            FlowParams::from_rolls(0.0, 0.5), // 10 min
            FlowParams::from_rolls(1.0, 0.5), // 20 min
        ];
        assert_eq!(average_stay_minutes(&params), 15);
    }

    #[test]
    fn test_average_stay_single_cave() {
        let params = [FlowParams::from_rolls(0.37, 0.5)]; // 13.7 min
        assert_eq!(average_stay_minutes(&params), 14);
    }

    #[test]
    fn test_average_stay_empty() {
        assert_eq!(average_stay_minutes(&[]), 0);
    }
}
