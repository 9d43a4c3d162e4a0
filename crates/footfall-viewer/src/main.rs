//! Footfall Viewer - Bevy-rendered grotto visitor dashboard
//!
//! The window opens on a parallax landscape scene; scrolling down slides
//! the statistics section into view with both charts, the clickable cave
//! hotspots, and the live totals. All counters live in the [`Engine`]
//! resource; the systems here feed it time and input and draw whatever
//! it holds.

mod charts;
mod hotspots;
mod parallax;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowFocused;
use chrono::{Local, Timelike};

use footfall_core::engine::Engine;
use footfall_core::persistence::FileStore;
use footfall_logic::clock::Moment;

fn main() {
    let config = ViewerConfig::from_args();
    let engine = Engine::new(
        Box::new(FileStore::new(config.data_dir.clone())),
        local_moment(),
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Footfall - Grotto Visitor Dashboard".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .insert_resource(SimWrapper(engine))
        .insert_resource(config)
        .insert_resource(parallax::ScrollState::default())
        .insert_resource(hotspots::ClickFlash::default())
        .add_systems(
            Startup,
            (
                setup,
                ui::setup_ui,
                charts::setup_chart_labels,
                hotspots::setup_hotspots,
            ),
        )
        .add_systems(
            Update,
            (
                update_simulation,
                refresh_on_focus,
                parallax::scroll_input,
                parallax::ease_scroll,
                parallax::draw_scene,
                hotspots::handle_click,
                hotspots::draw_hotspots,
                charts::draw_charts,
                charts::update_chart_labels,
                ui::update_text_ui,
            ),
        )
        .run();
}

#[derive(Resource)]
pub struct SimWrapper(pub Engine);

/// Viewer settings from the command line.
#[derive(Resource)]
pub struct ViewerConfig {
    /// Directory the two counter maps persist into.
    pub data_dir: String,
    pub time_scale: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: "./footfall-data".to_string(),
            time_scale: 1.0,
        }
    }
}

impl ViewerConfig {
    /// Parse command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--data-dir" | "-d" if i + 1 < args.len() => {
                    config.data_dir = args[i + 1].clone();
                    i += 2;
                }
                "--time-scale" | "-t" if i + 1 < args.len() => {
                    config.time_scale = args[i + 1].parse().unwrap_or(1.0);
                    i += 2;
                }
                _ => i += 1,
            }
        }

        config
    }
}

/// Local wall clock as a plain hour/minute pair for tick labels.
pub fn local_moment() -> Moment {
    let now = Local::now();
    Moment::new(now.hour() as u8, now.minute() as u8)
}

fn setup(mut commands: Commands, mut sim: ResMut<SimWrapper>, config: Res<ViewerConfig>) {
    commands.spawn(Camera2d::default());

    sim.0.set_time_scale(config.time_scale);

    let snap = sim.0.snapshot();
    info!(
        "Restored {} all-time entries, {} on site (data dir: {})",
        snap.total_visits, snap.current_visitors, config.data_dir
    );
}

fn update_simulation(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<SimWrapper>,
) {
    // Space pauses the flow ticks; +/= and - halve or double the speed
    if keyboard.just_pressed(KeyCode::Space) {
        sim.0.toggle_paused();
    }
    if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        let current = sim.0.time_scale();
        sim.0.set_time_scale((current * 2.0).min(64.0));
    }
    if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        let current = sim.0.time_scale();
        sim.0.set_time_scale((current / 2.0).max(0.25));
    }

    sim.0.advance(time.delta_secs(), local_moment());
}

/// Regaining focus re-reads both maps from disk, so counts edited by
/// another process (or a second viewer) show up without a restart.
fn refresh_on_focus(mut events: EventReader<WindowFocused>, mut sim: ResMut<SimWrapper>) {
    for event in events.read() {
        if event.focused {
            sim.0.refresh_from_store();
        }
    }
}
