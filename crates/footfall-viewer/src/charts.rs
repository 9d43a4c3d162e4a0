//! Chart drawing - the two dashboard charts, rendered with gizmos.
//!
//! Layout derives from the window size every frame, so resizes just
//! work. What to draw comes from `footfall_logic::chart`; this module
//! never reads the tallies directly.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use footfall_logic::chart::{self, FlowChartData, SpatialChartData};
use footfall_logic::constants::CAVE_KEYS;

use crate::parallax::{self, ScrollState};
use crate::SimWrapper;

const FRAME_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.22);
const GRID_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.07);
const SERIES_COLOR: Color = Color::srgba(0.55, 0.78, 0.95, 0.85);
const AREA_COLOR: Color = Color::srgba(0.55, 0.78, 0.95, 0.10);
const BAR_COLOR: Color = Color::srgba(0.95, 0.78, 0.45, 0.85);
const BAR_FILL_COLOR: Color = Color::srgba(0.95, 0.78, 0.45, 0.18);

/// Number of x-axis label slots under the flow chart.
const FLOW_AXIS_SLOTS: usize = 6;

// ============================================================================
// LAYOUT
// ============================================================================

/// Screen rectangle a chart draws into, world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub center: Vec2,
    pub size: Vec2,
}

impl Frame {
    /// Bottom-left corner.
    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    /// X of sample `i` of `n`, spread edge to edge.
    pub fn x_at(&self, i: usize, n: usize) -> f32 {
        if n <= 1 {
            return self.center.x;
        }
        self.min().x + self.size.x * i as f32 / (n - 1) as f32
    }

    /// Y for `value` against the `y_max` ceiling.
    pub fn y_at(&self, value: u64, y_max: u64) -> f32 {
        let t = if y_max == 0 {
            0.0
        } else {
            (value as f32 / y_max as f32).min(1.0)
        };
        self.min().y + self.size.y * t
    }

    /// X center of bar slot `i` of `n`.
    pub fn slot_x(&self, i: usize, n: usize) -> f32 {
        self.min().x + self.size.x * (i as f32 + 0.5) / n as f32
    }
}

/// Flow chart area for the current window, shifted by the dashboard
/// scroll offset.
pub fn flow_frame(w: f32, h: f32, offset_y: f32) -> Frame {
    Frame {
        center: Vec2::new(-w * 0.25, -h * 0.17 + offset_y),
        size: Vec2::new(w * 0.38, h * 0.28),
    }
}

pub fn spatial_frame(w: f32, h: f32, offset_y: f32) -> Frame {
    Frame {
        center: Vec2::new(w * 0.25, -h * 0.17 + offset_y),
        size: Vec2::new(w * 0.38, h * 0.28),
    }
}

// ============================================================================
// LABELS
// ============================================================================

/// Role of one pooled chart label. Spawned once, repositioned and
/// rewritten every frame like the rest of the text overlays.
#[derive(Component)]
pub enum ChartLabel {
    FlowTitle,
    /// X-axis slot under the flow chart.
    FlowAxis(usize),
    FlowScale,
    SpatialTitle,
    /// Cave name under bar `slot`.
    BarName(usize),
    /// All-time entries under bar `slot`.
    BarTotal(usize),
    /// Occupancy above bar `slot`.
    BarValue(usize),
    SpatialScale,
}

pub fn setup_chart_labels(mut commands: Commands) {
    commands.spawn((
        Text2d::new("On-site visitors"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.75)),
        Transform::default(),
        ChartLabel::FlowTitle,
    ));
    commands.spawn((
        Text2d::new("Occupancy by cave"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.75)),
        Transform::default(),
        ChartLabel::SpatialTitle,
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 11.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
        Transform::default(),
        ChartLabel::FlowScale,
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 11.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
        Transform::default(),
        ChartLabel::SpatialScale,
    ));

    for slot in 0..FLOW_AXIS_SLOTS {
        commands.spawn((
            Text2d::new(""),
            TextFont {
                font_size: 11.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            Transform::default(),
            ChartLabel::FlowAxis(slot),
        ));
    }

    for slot in 0..CAVE_KEYS.len() {
        commands.spawn((
            Text2d::new(""),
            TextFont {
                font_size: 11.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
            Transform::default(),
            ChartLabel::BarName(slot),
        ));
        commands.spawn((
            Text2d::new(""),
            TextFont {
                font_size: 10.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.4)),
            Transform::default(),
            ChartLabel::BarTotal(slot),
        ));
        commands.spawn((
            Text2d::new(""),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(Color::srgba(0.95, 0.78, 0.45, 0.9)),
            Transform::default(),
            ChartLabel::BarValue(slot),
        ));
    }
}

pub fn update_chart_labels(
    sim: Res<SimWrapper>,
    scroll: Res<ScrollState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut labels: Query<(&ChartLabel, &mut Text2d, &mut Transform)>,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    let offset_y = parallax::dashboard_offset(scroll.progress(), h);

    let flow = chart::flow_chart(&sim.0.history);
    let spatial = chart::spatial_chart(&sim.0.tally);
    let flow_area = flow_frame(w, h, offset_y);
    let spatial_area = spatial_frame(w, h, offset_y);
    let bar_count = spatial.bars.len();

    for (label, mut text, mut transform) in &mut labels {
        match label {
            ChartLabel::FlowTitle => {
                transform.translation = Vec3::new(
                    flow_area.center.x,
                    flow_area.center.y + flow_area.size.y / 2.0 + 18.0,
                    5.0,
                );
            }
            ChartLabel::SpatialTitle => {
                transform.translation = Vec3::new(
                    spatial_area.center.x,
                    spatial_area.center.y + spatial_area.size.y / 2.0 + 18.0,
                    5.0,
                );
            }
            ChartLabel::FlowScale => {
                **text = format!("{}", flow.y_max);
                transform.translation = Vec3::new(
                    flow_area.min().x - 16.0,
                    flow_area.min().y + flow_area.size.y,
                    5.0,
                );
            }
            ChartLabel::SpatialScale => {
                **text = format!("{}", spatial.y_max);
                transform.translation = Vec3::new(
                    spatial_area.min().x - 16.0,
                    spatial_area.min().y + spatial_area.size.y,
                    5.0,
                );
            }
            ChartLabel::FlowAxis(slot) => {
                // Same thinning the stride asks for: slots land on every
                // (stride + 1)-th sample
                let n = flow.labels.len();
                let index = slot * (flow.label_stride + 1);
                if index >= n {
                    **text = String::new();
                } else {
                    **text = flow.labels[index].clone();
                    transform.translation =
                        Vec3::new(flow_area.x_at(index, n), flow_area.min().y - 12.0, 5.0);
                }
            }
            ChartLabel::BarName(slot) => {
                if let Some(bar) = spatial.bars.get(*slot) {
                    **text = bar.name.clone();
                    transform.translation = Vec3::new(
                        spatial_area.slot_x(*slot, bar_count),
                        spatial_area.min().y - 12.0,
                        5.0,
                    );
                }
            }
            ChartLabel::BarTotal(slot) => {
                if let Some(bar) = spatial.bars.get(*slot) {
                    **text = format!("{} total", bar.cumulative);
                    transform.translation = Vec3::new(
                        spatial_area.slot_x(*slot, bar_count),
                        spatial_area.min().y - 26.0,
                        5.0,
                    );
                }
            }
            ChartLabel::BarValue(slot) => {
                if let Some(bar) = spatial.bars.get(*slot) {
                    **text = format!("{}", bar.occupancy);
                    transform.translation = Vec3::new(
                        spatial_area.slot_x(*slot, bar_count),
                        spatial_area.y_at(bar.occupancy, spatial.y_max) + 12.0,
                        5.0,
                    );
                }
            }
        }
    }
}

// ============================================================================
// DRAWING
// ============================================================================

pub fn draw_charts(
    sim: Res<SimWrapper>,
    scroll: Res<ScrollState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    let offset_y = parallax::dashboard_offset(scroll.progress(), h);

    // Section still fully below the viewport
    if offset_y <= -h {
        return;
    }

    let flow = chart::flow_chart(&sim.0.history);
    draw_flow_chart(&mut gizmos, flow_frame(w, h, offset_y), &flow);

    let spatial = chart::spatial_chart(&sim.0.tally);
    draw_spatial_chart(&mut gizmos, spatial_frame(w, h, offset_y), &spatial);
}

fn draw_grid(gizmos: &mut Gizmos, area: Frame) {
    gizmos.rect_2d(
        Isometry2d::from_translation(area.center),
        area.size,
        FRAME_COLOR,
    );
    // Gridline at each fifth of the y range
    let min = area.min();
    for i in 1..5 {
        let y = min.y + area.size.y * i as f32 / 5.0;
        gizmos.line_2d(
            Vec2::new(min.x, y),
            Vec2::new(min.x + area.size.x, y),
            GRID_COLOR,
        );
    }
}

fn draw_flow_chart(gizmos: &mut Gizmos, area: Frame, data: &FlowChartData) {
    draw_grid(gizmos, area);

    let n = data.values.len();
    let mut prev: Option<Vec2> = None;
    for (i, &value) in data.values.iter().enumerate() {
        let point = Vec2::new(area.x_at(i, n), area.y_at(value, data.y_max));

        // One stroke from the baseline up to the curve reads as the
        // area fill
        gizmos.line_2d(Vec2::new(point.x, area.min().y), point, AREA_COLOR);

        if let Some(prev) = prev {
            gizmos.line_2d(prev, point, SERIES_COLOR);
        }
        gizmos.circle_2d(Isometry2d::from_translation(point), 2.0, SERIES_COLOR);
        prev = Some(point);
    }
}

fn draw_spatial_chart(gizmos: &mut Gizmos, area: Frame, data: &SpatialChartData) {
    draw_grid(gizmos, area);

    let n = data.bars.len();
    for (i, bar) in data.bars.iter().enumerate() {
        if bar.occupancy == 0 {
            continue;
        }

        let slot_width = area.size.x / n as f32;
        let bar_width = slot_width * 0.5;
        let bottom = area.min().y;
        let top = area.y_at(bar.occupancy, data.y_max);
        let center = Vec2::new(area.slot_x(i, n), (top + bottom) / 2.0);

        gizmos.rect_2d(
            Isometry2d::from_translation(center),
            Vec2::new(bar_width, top - bottom),
            BAR_COLOR,
        );

        // Vertical strokes inside stand in for the translucent fill
        let mut x = center.x - bar_width / 2.0 + 3.0;
        while x < center.x + bar_width / 2.0 - 2.0 {
            gizmos.line_2d(
                Vec2::new(x, bottom + 1.0),
                Vec2::new(x, top - 1.0),
                BAR_FILL_COLOR,
            );
            x += 4.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Frame {
        Frame {
            center: Vec2::ZERO,
            size: Vec2::new(200.0, 100.0),
        }
    }

    #[test]
    fn test_x_at_spreads_edge_to_edge() {
        let a = area();
        assert_eq!(a.x_at(0, 5), -100.0);
        assert_eq!(a.x_at(4, 5), 100.0);
        // Single sample sits in the middle
        assert_eq!(a.x_at(0, 1), 0.0);
    }

    #[test]
    fn test_y_at_maps_value_range() {
        let a = area();
        assert_eq!(a.y_at(0, 10), -50.0);
        assert_eq!(a.y_at(10, 10), 50.0);
        assert_eq!(a.y_at(5, 10), 0.0);
        // Values above the ceiling pin to the top
        assert_eq!(a.y_at(99, 10), 50.0);
    }

    #[test]
    fn test_slot_x_centers_bars() {
        let a = area();
        assert_eq!(a.slot_x(0, 2), -50.0);
        assert_eq!(a.slot_x(1, 2), 50.0);
    }

    #[test]
    fn test_frames_sit_side_by_side() {
        let flow = flow_frame(1280.0, 720.0, 0.0);
        let spatial = spatial_frame(1280.0, 720.0, 0.0);
        assert!(flow.center.x < 0.0);
        assert!(spatial.center.x > 0.0);
        // No horizontal overlap
        assert!(flow.center.x + flow.size.x / 2.0 < spatial.center.x - spatial.size.x / 2.0);
    }

    #[test]
    fn test_frames_follow_scroll_offset() {
        let parked = flow_frame(1280.0, 720.0, -720.0);
        let shown = flow_frame(1280.0, 720.0, 0.0);
        assert!((parked.center.y + 720.0 - shown.center.y).abs() < 1e-3);
    }
}
