//! Window viewer for the simulation using Bevy
//!
//! The engine renders into a `RecordingSurface`; this module replays the
//! recorded commands with 2D gizmos and maps the keyboard onto the engine's
//! controls. All simulation logic stays in the `simulation` module.

mod components;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::EngineResource;

use input::handle_input;
use sync::{draw_scene, drive_engine, handle_window_resized, update_metrics_text};
use world::setup_world;

/// Plugin to register all UI systems
pub struct TrafficSimUIPlugin;

impl Plugin for TrafficSimUIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_world).add_systems(
            Update,
            (
                handle_window_resized,
                handle_input,
                drive_engine,
                draw_scene,
                update_metrics_text,
            )
                .chain(),
        );
    }
}
