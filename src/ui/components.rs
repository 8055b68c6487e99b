//! UI components and resources for linking Bevy to the simulation engine

use bevy::prelude::*;

use crate::render::RecordingSurface;
use crate::simulation::SimulationEngine;

/// Resource wrapper for the simulation engine, bound to a recording surface
/// whose commands are replayed with gizmos every frame
#[derive(Resource)]
pub struct EngineResource(pub SimulationEngine<RecordingSurface>);

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for the metrics overlay text
#[derive(Component)]
pub struct MetricsText;

/// Spacing in logical pixels between the scanlines used to fill shapes
pub const FILL_SPACING: f32 = 2.0;

/// Segments used to approximate circles
pub const CIRCLE_SEGMENTS: usize = 32;
