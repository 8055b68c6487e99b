//! Standalone traffic simulation module
//!
//! All simulation logic lives here: the entity model, the per-frame motion
//! and sensing rules, scenario presets, metrics and the engine lifecycle.
//! It draws through the `render` module's surface traits and never depends
//! on a window.

mod engine;
mod metrics;
mod scenario;
mod sensing;
mod state;
mod types;
mod vehicle;

pub use engine::{FrameHandle, SimulationEngine, FRAME_DURATION_MS};
pub use metrics::{average_speed, flow_rate, success_rate, CongestionLevel, FpsCounter, Metrics};
pub use scenario::{Scenario, ScenarioLayout};
pub use sensing::{avoidance_heading, centroid, detect_hazards, Hazard};
pub use state::{
    SimulationState, DEFAULT_SCENARIO, DEFAULT_SPEED, DEFAULT_TRAFFIC_DENSITY, MAX_SPEED,
    MAX_TRAFFIC_DENSITY, MIN_SPEED, MIN_TRAFFIC_DENSITY,
};
pub use types::{
    Color, Obstacle, ObstacleKind, Point, Size, Weather, AVOIDANCE_SPEED_FACTOR, BASE_SPEED,
    DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH, MIN_SURFACE_HEIGHT, MIN_SURFACE_WIDTH,
    VEHICLE_HEIGHT, VEHICLE_WIDTH, WAYPOINT_ARRIVAL_DISTANCE,
};
pub use vehicle::{
    advance_vehicles, MotionContext, Vehicle, VehicleKind, VehicleUpdate, AI_VEHICLE_COLOR,
    REGULAR_SENSOR_RADIUS, REGULAR_VEHICLE_COLOR,
};
