//! Dashboard text - headline, totals, peak window, and key hints.
//!
//! Every Text2d overlay outside the charts lives here. Content and
//! transforms are rewritten each frame from the engine and the scroll
//! offset, so the labels slide with their sections.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use footfall_logic::schedule;

use crate::parallax::{self, ScrollState};
use crate::{local_moment, SimWrapper};

/// Role of one text overlay.
#[derive(Component)]
pub enum UiText {
    /// Headline of the opening scene.
    SceneTitle,
    SceneSubtitle,
    DashboardTitle,
    /// Caption over the hotspot row.
    CaveCaption,
    Totals,
    PeakWindow,
    AverageStay,
    /// Pause / speed indicator, fixed to the window corner.
    Status,
    /// Key hints, fixed to the bottom edge.
    Hint,
}

pub fn setup_ui(mut commands: Commands) {
    commands.spawn((
        Text2d::new("F O O T F A L L"),
        TextFont {
            font_size: 42.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.92)),
        Transform::default(),
        UiText::SceneTitle,
    ));
    commands.spawn((
        Text2d::new("Grotto visitor statistics"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
        Transform::default(),
        UiText::SceneSubtitle,
    ));
    commands.spawn((
        Text2d::new("Visitor Flow Overview"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
        Transform::default(),
        UiText::DashboardTitle,
    ));
    commands.spawn((
        Text2d::new("Exhibit caves - click one to log an entry"),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.55)),
        Transform::default(),
        UiText::CaveCaption,
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::default(),
        UiText::Totals,
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.95, 0.78, 0.45, 0.9)),
        Transform::default(),
        UiText::PeakWindow,
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.55, 0.78, 0.95, 0.9)),
        Transform::default(),
        UiText::AverageStay,
    ));
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.95, 0.6, 0.4, 0.9)),
        Transform::default(),
        UiText::Status,
    ));
    commands.spawn((
        Text2d::new("[Wheel] Scroll   [Enter] Dashboard   [Space] Pause   [-/=] Speed"),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.35)),
        Transform::default(),
        UiText::Hint,
    ));
}

pub fn update_text_ui(
    sim: Res<SimWrapper>,
    scroll: Res<ScrollState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut labels: Query<(&UiText, &mut Text2d, &mut Transform)>,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    let progress = scroll.progress();
    let scene_y = parallax::scene_offset(progress, h);
    let dash_y = parallax::dashboard_offset(progress, h);

    let snap = sim.0.snapshot();
    let now = local_moment();

    for (role, mut text, mut transform) in &mut labels {
        match role {
            UiText::SceneTitle => {
                transform.translation = Vec3::new(0.0, h * 0.16 + scene_y, 5.0);
            }
            UiText::SceneSubtitle => {
                transform.translation = Vec3::new(0.0, h * 0.09 + scene_y, 5.0);
            }
            UiText::DashboardTitle => {
                transform.translation = Vec3::new(0.0, h * 0.42 + dash_y, 5.0);
            }
            UiText::CaveCaption => {
                transform.translation = Vec3::new(0.0, h * 0.22 + dash_y, 5.0);
            }
            UiText::Totals => {
                **text = format!(
                    "{} on site now | {} all-time entries",
                    snap.current_visitors, snap.total_visits
                );
                transform.translation = Vec3::new(0.0, h * 0.33 + dash_y, 5.0);
            }
            UiText::PeakWindow => {
                **text = format!("Peak hours: {}", schedule::peak_window(now.hour));
                transform.translation = Vec3::new(-w * 0.32, h * 0.33 + dash_y, 5.0);
            }
            UiText::AverageStay => {
                **text = format!("Avg stay: {} min", sim.0.average_stay_minutes());
                transform.translation = Vec3::new(w * 0.32, h * 0.33 + dash_y, 5.0);
            }
            UiText::Status => {
                **text = if sim.0.paused() {
                    "[PAUSED]".to_string()
                } else if (sim.0.time_scale() - 1.0).abs() > f32::EPSILON {
                    format!("Speed: {}x", sim.0.time_scale())
                } else {
                    String::new()
                };
                transform.translation = Vec3::new(w * 0.40, h * 0.45, 5.0);
            }
            UiText::Hint => {
                transform.translation = Vec3::new(0.0, -h * 0.46, 5.0);
            }
        }
    }
}
