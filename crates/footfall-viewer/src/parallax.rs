//! Opening scene - a scroll-linked landscape in front of the dashboard.
//!
//! Scroll position is a single normalized offset: 0 shows the landscape,
//! 1 shows the statistics section. Wheel and keys move a target and the
//! shown offset chases it each frame, so every jump eases. Seven depth
//! layers travel different distances across the range, which is what
//! sells the depth.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Fraction of the scroll range one wheel notch covers.
const SCROLL_STEP: f32 = 0.12;
/// Per-second rate at which the shown offset closes on the target.
const SCROLL_CHASE_RATE: f32 = 4.0;
/// Window height the layer travel distances were authored against.
const REFERENCE_HEIGHT: f32 = 900.0;
/// Clickable radius around the scroll arrow, world units.
const ARROW_RADIUS: f32 = 36.0;

// ============================================================================
// LAYER TRAVEL TABLE
// ============================================================================

/// One depth layer. `start` and `end` are authored vertical offsets
/// (positive = down) covered across the full scroll range; bigger travel
/// reads as closer.
pub struct Layer {
    pub start: f32,
    pub end: f32,
}

pub const SKY: Layer = Layer {
    start: 0.0,
    end: -1200.0,
};
pub const CLOUD_NEAR: Layer = Layer {
    start: 100.0,
    end: -4400.0,
};
pub const CLOUD_MID: Layer = Layer {
    start: -150.0,
    end: -4000.0,
};
pub const CLOUD_FAR: Layer = Layer {
    start: -50.0,
    end: -3650.0,
};
pub const RIDGE_BG: Layer = Layer {
    start: -10.0,
    end: -1100.0,
};
pub const RIDGE_MID: Layer = Layer {
    start: -30.0,
    end: -2250.0,
};
pub const RIDGE_FG: Layer = Layer {
    start: -50.0,
    end: -1600.0,
};

impl Layer {
    /// World-space y offset at scroll `progress`, scaled to the window.
    /// Authored y grows downward, so the sign flips here.
    pub fn offset(&self, progress: f32, window_height: f32) -> f32 {
        let authored = self.start + (self.end - self.start) * progress;
        -authored * window_height / REFERENCE_HEIGHT
    }
}

// ============================================================================
// SCROLL STATE
// ============================================================================

/// Normalized scroll position: 0 = opening scene, 1 = dashboard.
#[derive(Resource, Default)]
pub struct ScrollState {
    current: f32,
    target: f32,
}

impl ScrollState {
    /// Offset actually shown this frame.
    pub fn progress(&self) -> f32 {
        self.current
    }

    pub fn scroll_to(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    pub fn nudge(&mut self, delta: f32) {
        let target = self.target + delta;
        self.scroll_to(target);
    }

    /// Close part of the remaining distance to the target, snapping once
    /// the remainder is invisible.
    pub fn chase(&mut self, delta_secs: f32) {
        let step = (SCROLL_CHASE_RATE * delta_secs).min(1.0);
        self.current += (self.target - self.current) * step;
        if (self.target - self.current).abs() < 0.0005 {
            self.current = self.target;
        }
    }
}

/// How far the opening scene has risen out of view.
pub fn scene_offset(progress: f32, window_height: f32) -> f32 {
    progress * window_height
}

/// Vertical offset of the dashboard section: one window below the view
/// at 0, centered at 1.
pub fn dashboard_offset(progress: f32, window_height: f32) -> f32 {
    (progress - 1.0) * window_height
}

/// World position of the scroll arrow (bob is applied at draw time).
pub fn arrow_position(progress: f32, window_height: f32) -> Vec2 {
    Vec2::new(
        0.0,
        -window_height * 0.38 + scene_offset(progress, window_height),
    )
}

// ============================================================================
// SYSTEMS
// ============================================================================

pub fn scroll_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel_events: EventReader<MouseWheel>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut scroll: ResMut<ScrollState>,
) {
    // Wheel-down (negative y) moves toward the dashboard
    for event in wheel_events.read() {
        scroll.nudge(-event.y * SCROLL_STEP);
    }

    if keyboard.just_pressed(KeyCode::PageDown) {
        scroll.scroll_to(1.0);
    }
    if keyboard.just_pressed(KeyCode::PageUp) || keyboard.just_pressed(KeyCode::Home) {
        scroll.scroll_to(0.0);
    }
    // Enter follows the arrow down to the statistics section
    if keyboard.just_pressed(KeyCode::Enter) {
        scroll.scroll_to(1.0);
    }

    // Clicking the arrow does the same
    if mouse.just_pressed(MouseButton::Left) {
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

        let arrow = arrow_position(scroll.progress(), window.height());
        if world_pos.distance(arrow) <= ARROW_RADIUS {
            scroll.scroll_to(1.0);
        }
    }
}

pub fn ease_scroll(time: Res<Time>, mut scroll: ResMut<ScrollState>) {
    scroll.chase(time.delta_secs());
}

pub fn draw_scene(
    time: Res<Time>,
    scroll: Res<ScrollState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    let progress = scroll.progress();

    // Every layer has left the viewport once the dashboard is in place
    if progress >= 1.0 {
        return;
    }

    draw_sky(&mut gizmos, w, h, SKY.offset(progress, h));

    draw_ridge(
        &mut gizmos,
        w,
        RidgeBand {
            base_y: -h * 0.02 + RIDGE_BG.offset(progress, h),
            amplitude: h * 0.045,
            wavelength: w * 0.38,
            phase: 1.7,
            rgb: (0.42, 0.38, 0.37),
            alpha: 0.40,
        },
    );

    draw_cloud_row(
        &mut gizmos,
        w,
        h * 0.26 + CLOUD_FAR.offset(progress, h),
        &CLOUD_FAR_PUFFS,
        0.8,
        Color::srgba(0.9, 0.9, 0.95, 0.15),
    );
    draw_cloud_row(
        &mut gizmos,
        w,
        h * 0.18 + CLOUD_MID.offset(progress, h),
        &CLOUD_MID_PUFFS,
        1.0,
        Color::srgba(0.92, 0.92, 0.96, 0.22),
    );

    draw_ridge(
        &mut gizmos,
        w,
        RidgeBand {
            base_y: -h * 0.16 + RIDGE_MID.offset(progress, h),
            amplitude: h * 0.06,
            wavelength: w * 0.30,
            phase: 4.2,
            rgb: (0.52, 0.45, 0.41),
            alpha: 0.55,
        },
    );

    draw_cloud_row(
        &mut gizmos,
        w,
        h * 0.33 + CLOUD_NEAR.offset(progress, h),
        &CLOUD_NEAR_PUFFS,
        1.3,
        Color::srgba(0.95, 0.95, 0.98, 0.30),
    );

    draw_ridge(
        &mut gizmos,
        w,
        RidgeBand {
            base_y: -h * 0.30 + RIDGE_FG.offset(progress, h),
            amplitude: h * 0.075,
            wavelength: w * 0.24,
            phase: 0.6,
            rgb: (0.63, 0.53, 0.45),
            alpha: 0.75,
        },
    );

    draw_arrow(&mut gizmos, h, progress, time.elapsed_secs());
}

// ============================================================================
// SCENE PIECES
// ============================================================================

/// Puff placements per cloud layer: (x as window fraction, y wobble in
/// world units, puff scale).
const CLOUD_FAR_PUFFS: [(f32, f32, f32); 3] = [(-0.36, 10.0, 1.0), (0.05, -6.0, 0.7), (0.33, 4.0, 0.9)];
const CLOUD_MID_PUFFS: [(f32, f32, f32); 3] = [(-0.15, -8.0, 1.1), (0.22, 12.0, 0.8), (0.44, -4.0, 1.0)];
const CLOUD_NEAR_PUFFS: [(f32, f32, f32); 3] = [(-0.42, 6.0, 1.2), (-0.05, -10.0, 0.9), (0.38, 0.0, 1.4)];

fn draw_sky(gizmos: &mut Gizmos, w: f32, h: f32, offset_y: f32) {
    // Low sun with a halo
    let sun = Vec2::new(w * 0.30, h * 0.24 + offset_y);
    gizmos.circle_2d(
        Isometry2d::from_translation(sun),
        h * 0.045,
        Color::srgba(0.95, 0.85, 0.60, 0.8),
    );
    gizmos.circle_2d(
        Isometry2d::from_translation(sun),
        h * 0.06,
        Color::srgba(0.95, 0.85, 0.60, 0.25),
    );

    // Haze bands across the upper sky
    for (i, &band_y) in [h * 0.36, h * 0.31, h * 0.27].iter().enumerate() {
        let half = w * (0.28 - 0.05 * i as f32);
        let y = band_y + offset_y;
        gizmos.line_2d(
            Vec2::new(-half, y),
            Vec2::new(half, y),
            Color::srgba(0.8, 0.8, 0.9, 0.08),
        );
    }
}

struct RidgeBand {
    base_y: f32,
    amplitude: f32,
    wavelength: f32,
    phase: f32,
    rgb: (f32, f32, f32),
    alpha: f32,
}

/// A ridge is a wavy crest line plus two fading echoes underneath that
/// read as the body of the hill.
fn draw_ridge(gizmos: &mut Gizmos, w: f32, band: RidgeBand) {
    const SEGMENTS: usize = 48;
    let tau = std::f32::consts::TAU;

    let points: Vec<Vec2> = (0..=SEGMENTS)
        .map(|i| {
            let x = -w / 2.0 + w * i as f32 / SEGMENTS as f32;
            let crest = (x / band.wavelength * tau + band.phase).sin()
                + 0.4 * (x / (band.wavelength * 0.37) * tau).sin();
            Vec2::new(x, band.base_y + crest * band.amplitude)
        })
        .collect();

    let (r, g, b) = band.rgb;
    for echo in 0..3 {
        let drop = echo as f32 * 14.0;
        let faded = Color::srgba(r, g, b, band.alpha * (1.0 - echo as f32 * 0.35));
        for pair in points.windows(2) {
            gizmos.line_2d(
                pair[0] - Vec2::new(0.0, drop),
                pair[1] - Vec2::new(0.0, drop),
                faded,
            );
        }
    }
}

fn draw_cloud_row(
    gizmos: &mut Gizmos,
    w: f32,
    row_y: f32,
    puffs: &[(f32, f32, f32)],
    scale: f32,
    color: Color,
) {
    for &(x_frac, wobble, puff_scale) in puffs {
        let s = scale * puff_scale;
        let center = Vec2::new(w * x_frac, row_y + wobble);
        gizmos.ellipse_2d(
            Isometry2d::from_translation(center),
            Vec2::new(40.0 * s, 13.0 * s),
            color,
        );
        gizmos.ellipse_2d(
            Isometry2d::from_translation(center + Vec2::new(-30.0 * s, -3.0)),
            Vec2::new(24.0 * s, 9.0 * s),
            color,
        );
        gizmos.ellipse_2d(
            Isometry2d::from_translation(center + Vec2::new(28.0 * s, -2.0)),
            Vec2::new(20.0 * s, 8.0 * s),
            color,
        );
    }
}

fn draw_arrow(gizmos: &mut Gizmos, h: f32, progress: f32, elapsed: f32) {
    let bob = (elapsed * 2.0).sin() * 6.0;
    let tip = arrow_position(progress, h) + Vec2::new(0.0, bob - 8.0);

    let bright = Color::srgba(1.0, 1.0, 1.0, 0.8);
    gizmos.line_2d(tip + Vec2::new(-14.0, 14.0), tip, bright);
    gizmos.line_2d(tip + Vec2::new(14.0, 14.0), tip, bright);

    // Trailing chevron above, fainter
    let upper = tip + Vec2::new(0.0, 12.0);
    let faint = Color::srgba(1.0, 1.0, 1.0, 0.35);
    gizmos.line_2d(upper + Vec2::new(-14.0, 14.0), upper, faint);
    gizmos.line_2d(upper + Vec2::new(14.0, 14.0), upper, faint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_offset_endpoints() {
        // At the reference height the authored distances come through
        // unscaled, with the sign flipped to y-up
        assert_eq!(SKY.offset(0.0, 900.0), 0.0);
        assert_eq!(SKY.offset(1.0, 900.0), 1200.0);
        assert_eq!(CLOUD_NEAR.offset(0.0, 900.0), -100.0);
        assert_eq!(CLOUD_NEAR.offset(1.0, 900.0), 4400.0);
    }

    #[test]
    fn test_layer_offset_scales_with_window() {
        assert_eq!(RIDGE_BG.offset(1.0, 450.0), 550.0);
    }

    #[test]
    fn test_closer_layers_travel_farther() {
        let far = RIDGE_BG.offset(1.0, 900.0) - RIDGE_BG.offset(0.0, 900.0);
        let near = RIDGE_MID.offset(1.0, 900.0) - RIDGE_MID.offset(0.0, 900.0);
        assert!(near > far);
    }

    #[test]
    fn test_dashboard_offset_endpoints() {
        assert_eq!(dashboard_offset(0.0, 720.0), -720.0);
        assert_eq!(dashboard_offset(1.0, 720.0), 0.0);
    }

    #[test]
    fn test_scroll_target_clamps() {
        let mut scroll = ScrollState::default();
        scroll.nudge(3.0);
        scroll.chase(10.0);
        assert_eq!(scroll.progress(), 1.0);

        scroll.nudge(-5.0);
        scroll.chase(10.0);
        assert_eq!(scroll.progress(), 0.0);
    }

    #[test]
    fn test_chase_converges() {
        let mut scroll = ScrollState::default();
        scroll.scroll_to(1.0);
        for _ in 0..120 {
            scroll.chase(1.0 / 60.0);
        }
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn test_chase_moves_monotonically_toward_target() {
        let mut scroll = ScrollState::default();
        scroll.scroll_to(1.0);
        let mut last = scroll.progress();
        for _ in 0..30 {
            scroll.chase(1.0 / 60.0);
            assert!(scroll.progress() >= last);
            assert!(scroll.progress() <= 1.0);
            last = scroll.progress();
        }
    }
}
