//! The engine's whole mutable world plus session controls

use super::metrics::Metrics;
use super::scenario::Scenario;
use super::types::{Obstacle, Point, Weather, BASE_SPEED};
use super::vehicle::Vehicle;

pub const DEFAULT_SPEED: f32 = 1.0;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 3.0;

pub const DEFAULT_TRAFFIC_DENSITY: u32 = 5;
pub const MIN_TRAFFIC_DENSITY: u32 = 1;
pub const MAX_TRAFFIC_DENSITY: u32 = 10;

pub const DEFAULT_SCENARIO: Scenario = Scenario::CityIntersection;

/// Everything the engine simulates and draws
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub vehicles: Vec<Vehicle>,
    pub obstacles: Vec<Obstacle>,
    pub pedestrians: Vec<Point>,
    pub metrics: Metrics,
    pub is_running: bool,
    /// Time multiplier applied to every tick
    pub speed: f32,
    pub traffic_density: u32,
    pub weather: Weather,
    /// Preset id as requested; may name no known preset
    pub scenario: String,
    pub show_sensor_radius: bool,
    pub show_decision_points: bool,
    pub show_path_prediction: bool,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            vehicles: Vec::new(),
            obstacles: Vec::new(),
            pedestrians: Vec::new(),
            metrics: Metrics::default(),
            is_running: false,
            speed: DEFAULT_SPEED,
            traffic_density: DEFAULT_TRAFFIC_DENSITY,
            weather: Weather::Clear,
            scenario: DEFAULT_SCENARIO.id().to_string(),
            show_sensor_radius: true,
            show_decision_points: true,
            show_path_prediction: false,
        }
    }
}

impl SimulationState {
    /// The known preset currently loaded, if any
    pub fn preset(&self) -> Option<Scenario> {
        Scenario::from_id(&self.scenario)
    }

    /// Speed AI vehicles steer at: base speed scaled by weather and preset
    pub fn cruise_speed(&self) -> f32 {
        let scenario_factor = self.preset().map_or(1.0, Scenario::speed_factor);
        BASE_SPEED * self.weather.speed_factor() * scenario_factor
    }

    pub fn ai_vehicle_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_ai()).count()
    }

    pub fn regular_vehicle_count(&self) -> usize {
        self.vehicles.len() - self.ai_vehicle_count()
    }

    /// One-line status for logs
    pub fn summary(&self) -> String {
        format!(
            "Scenario: {} | Vehicles: {} ({} AI) | Weather: {} | Speed: {:.1}x | Density: {} | Near misses: {} | Avg speed: {} | Flow: {:.0}% | Congestion: {}",
            self.scenario,
            self.vehicles.len(),
            self.ai_vehicle_count(),
            self.weather,
            self.speed,
            self.traffic_density,
            self.metrics.near_misses,
            self.metrics.avg_speed,
            self.metrics.flow_rate,
            self.metrics.congestion_level,
        )
    }
}
