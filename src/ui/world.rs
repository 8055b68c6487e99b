//! Startup systems for the camera, the engine and the metrics overlay

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::components::{EngineResource, MainCamera, MetricsText};
use crate::render::{palette, RecordingSurface};
use crate::simulation::SimulationEngine;

/// System to set up the camera and bind the engine to the window size
pub fn setup_world(mut commands: Commands, window_query: Query<&Window, With<PrimaryWindow>>) {
    let background = palette::BACKGROUND;
    commands.insert_resource(ClearColor(Color::srgb_u8(
        background.r,
        background.g,
        background.b,
    )));
    commands.spawn((MainCamera, Camera2d));

    let (width, height, scale) = match window_query.single() {
        Ok(window) => (window.width(), window.height(), window.scale_factor()),
        Err(_) => (0.0, 0.0, 1.0),
    };
    let surface = RecordingSurface::new(width, height).with_pixel_ratio(scale);

    match SimulationEngine::new(surface) {
        Ok(mut engine) => {
            engine.draw();
            commands.insert_resource(EngineResource(engine));
        }
        Err(err) => error!("Failed to initialize simulation engine: {err:#}"),
    }

    commands.spawn((
        MetricsText,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.1, 0.15)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}
