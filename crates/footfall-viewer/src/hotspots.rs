//! Cave hotspots - clickable markers that log walk-in entries.
//!
//! A row of five circles, one per cave, sits above the charts. Clicking
//! one bumps that cave's counters through the engine, which persists on
//! the spot; a short ring pulse confirms the hit.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use footfall_logic::constants::CAVE_KEYS;

use crate::parallax::{self, ScrollState};
use crate::SimWrapper;

/// Marker circle radius, world units.
const MARKER_RADIUS: f32 = 26.0;
/// How far from a marker center a click still counts.
const CLICK_RADIUS: f32 = 30.0;
/// Seconds the click pulse rings outward.
const FLASH_SECS: f32 = 0.4;

/// One clickable cave marker; `slot` fixes its place in the row. The
/// entity doubles as the cave-number label.
#[derive(Component)]
pub struct Hotspot {
    pub cave: &'static str,
    pub slot: usize,
}

/// Short-lived pulse over the most recently clicked cave.
#[derive(Resource, Default)]
pub struct ClickFlash {
    slot: Option<usize>,
    timer: f32,
}

/// World position of marker `slot` for the current window and scroll.
pub fn marker_position(slot: usize, w: f32, h: f32, offset_y: f32) -> Vec2 {
    let count = CAVE_KEYS.len();
    let spread = w * 0.6;
    let step = spread / (count - 1) as f32;
    Vec2::new(-spread / 2.0 + step * slot as f32, h * 0.14 + offset_y)
}

pub fn setup_hotspots(mut commands: Commands) {
    for (slot, &cave) in CAVE_KEYS.iter().enumerate() {
        commands.spawn((
            Text2d::new(cave),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
            Transform::default(),
            Hotspot { cave, slot },
        ));
    }
}

pub fn handle_click(
    mouse: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    scroll: Res<ScrollState>,
    hotspots: Query<&Hotspot>,
    mut sim: ResMut<SimWrapper>,
    mut flash: ResMut<ClickFlash>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) else {
        return;
    };

    let (w, h) = (window.width(), window.height());
    let offset_y = parallax::dashboard_offset(scroll.progress(), h);

    // Nearest marker within the click radius wins; anything else is a
    // miss and the click falls through
    let mut closest: Option<(&Hotspot, f32)> = None;
    for hotspot in &hotspots {
        let dist = world_pos.distance(marker_position(hotspot.slot, w, h, offset_y));
        if dist <= CLICK_RADIUS && (closest.is_none() || dist < closest.unwrap().1) {
            closest = Some((hotspot, dist));
        }
    }

    if let Some((hotspot, _)) = closest {
        if sim.0.record_entry(hotspot.cave) {
            flash.slot = Some(hotspot.slot);
            flash.timer = FLASH_SECS;
        }
    }
}

pub fn draw_hotspots(
    time: Res<Time>,
    sim: Res<SimWrapper>,
    scroll: Res<ScrollState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut hotspot_query: Query<(&Hotspot, &mut Transform)>,
    mut flash: ResMut<ClickFlash>,
    mut gizmos: Gizmos,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    let offset_y = parallax::dashboard_offset(scroll.progress(), h);

    flash.timer = (flash.timer - time.delta_secs()).max(0.0);
    if flash.timer == 0.0 {
        flash.slot = None;
    }

    for (hotspot, mut transform) in &mut hotspot_query {
        let center = marker_position(hotspot.slot, w, h, offset_y);
        transform.translation = center.extend(5.0);

        // Busier caves draw a brighter ring
        let occupancy = sim.0.tally.occupancy_of(hotspot.cave);
        let alpha = 0.35 + (occupancy as f32 * 0.05).min(0.45);
        gizmos.circle_2d(
            Isometry2d::from_translation(center),
            MARKER_RADIUS,
            Color::srgba(1.0, 1.0, 1.0, alpha),
        );
        gizmos.circle_2d(
            Isometry2d::from_translation(center),
            MARKER_RADIUS - 3.0,
            Color::srgba(1.0, 1.0, 1.0, 0.10),
        );

        if flash.slot == Some(hotspot.slot) {
            // Ring expands and fades over the flash window
            let t = 1.0 - flash.timer / FLASH_SECS;
            gizmos.circle_2d(
                Isometry2d::from_translation(center),
                MARKER_RADIUS + t * 18.0,
                Color::srgba(1.0, 1.0, 1.0, 0.6 * (1.0 - t)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_spread_symmetrically() {
        let left = marker_position(0, 1280.0, 720.0, 0.0);
        let right = marker_position(CAVE_KEYS.len() - 1, 1280.0, 720.0, 0.0);
        assert_eq!(left.x, -right.x);
        assert_eq!(left.y, right.y);
    }

    #[test]
    fn test_markers_stay_inside_window() {
        for slot in 0..CAVE_KEYS.len() {
            let pos = marker_position(slot, 1280.0, 720.0, 0.0);
            assert!(pos.x.abs() + MARKER_RADIUS < 640.0);
            assert!(pos.y.abs() + MARKER_RADIUS < 360.0);
        }
    }

    #[test]
    fn test_markers_ride_the_scroll_offset() {
        let parked = marker_position(2, 1280.0, 720.0, -720.0);
        let shown = marker_position(2, 1280.0, 720.0, 0.0);
        assert!((parked.y + 720.0 - shown.y).abs() < 1e-3);
        assert_eq!(parked.x, shown.x);
    }
}
