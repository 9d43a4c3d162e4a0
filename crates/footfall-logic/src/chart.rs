//! Chart-data shaping - pure state → drawable series, no rendering.
//!
//! The viewer draws whatever these structs say, so tests can assert on
//! chart content without a window.

use crate::constants::{display_name, CAVE_KEYS};
use crate::history::History;
use crate::tally::Tally;

/// Number of x-axis labels the flow chart aims to show.
const TARGET_AXIS_LABELS: usize = 6;
/// Y-axis ceilings round up to this step.
const AXIS_STEP: u64 = 5;

/// Data behind the occupancy line/area chart.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowChartData {
    /// X labels, oldest first.
    pub labels: Vec<String>,
    /// Total occupancy per sample, same order as `labels`.
    pub values: Vec<u64>,
    /// Y-axis ceiling, a stable multiple of five.
    pub y_max: u64,
    /// Draw every `label_stride`-th x label; 0 draws them all.
    pub label_stride: usize,
}

/// One bar of the per-cave chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CaveBar {
    pub key: String,
    pub name: String,
    /// Visitors inside now (bar height).
    pub occupancy: u64,
    /// All-time entries (shown alongside the bar).
    pub cumulative: u64,
}

/// Data behind the per-cave bar chart, bars in fixed cave order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialChartData {
    pub bars: Vec<CaveBar>,
    pub y_max: u64,
}

/// Shape the time series for drawing.
pub fn flow_chart(history: &History) -> FlowChartData {
    let labels: Vec<String> = history.iter().map(|p| p.label.clone()).collect();
    let values: Vec<u64> = history.iter().map(|p| p.value).collect();
    let y_max = axis_ceiling(values.iter().copied().max().unwrap_or(0));
    let label_stride = labels.len() / TARGET_AXIS_LABELS;
    FlowChartData {
        labels,
        values,
        y_max,
        label_stride,
    }
}

/// Shape the tallies for drawing.
pub fn spatial_chart(tally: &Tally) -> SpatialChartData {
    let bars: Vec<CaveBar> = CAVE_KEYS
        .iter()
        .map(|&key| CaveBar {
            key: key.to_string(),
            name: display_name(key),
            occupancy: tally.occupancy_of(key),
            cumulative: tally.visits_of(key),
        })
        .collect();
    let y_max = axis_ceiling(bars.iter().map(|b| b.occupancy).max().unwrap_or(0));
    SpatialChartData { bars, y_max }
}

/// Smallest multiple of [`AXIS_STEP`] at or above `max`, never zero, so
/// the axis stays put frame to frame instead of rescaling on every tick.
pub fn axis_ceiling(max: u64) -> u64 {
    let stepped = ((max + AXIS_STEP - 1) / AXIS_STEP) * AXIS_STEP;
    stepped.max(AXIS_STEP)
}
