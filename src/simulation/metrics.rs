//! Display metrics derived from the world each tick
//!
//! Two kinds of numbers live here. Speed, flow, congestion and success rate
//! are derived from real state. Processing time, decisions per second and
//! response time are cosmetic telemetry drawn from fixed random ranges.

use rand::Rng;
use std::fmt;

use super::vehicle::Vehicle;

/// Three-tier traffic density classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CongestionLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    pub fn from_density(density: u32) -> Self {
        if density > 7 {
            CongestionLevel::High
        } else if density > 4 {
            CongestionLevel::Medium
        } else {
            CongestionLevel::Low
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Medium => "Medium",
            CongestionLevel::High => "High",
        })
    }
}

/// Snapshot of display numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub fps: u32,
    /// Milliseconds; synthetic
    pub processing_time: f32,
    pub memory_usage: String,
    /// Synthetic, resampled whenever an AI vehicle decides
    pub decisions_per_second: f32,
    /// Percent
    pub success_rate: f32,
    /// Milliseconds; synthetic, resampled with decisions per second
    pub avg_response_time: f32,
    /// Lifetime count of avoidance maneuvers
    pub near_misses: u32,
    pub collisions: u32,
    pub safety_score: String,
    pub avg_speed: i32,
    pub flow_rate: f32,
    pub congestion_level: CongestionLevel,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            fps: 60,
            processing_time: 2.3,
            memory_usage: "45MB".to_string(),
            decisions_per_second: 12.0,
            success_rate: 98.7,
            avg_response_time: 120.0,
            near_misses: 0,
            collisions: 0,
            safety_score: "A+".to_string(),
            avg_speed: 35,
            flow_rate: 85.0,
            congestion_level: CongestionLevel::Low,
        }
    }
}

impl Metrics {
    /// Recompute every per-tick metric from the current world
    pub fn update(&mut self, vehicles: &[Vehicle], traffic_density: u32, rng: &mut impl Rng) {
        self.processing_time = rng.random_range(1.0..3.0);
        self.success_rate = success_rate(self.collisions);
        self.avg_speed = average_speed(vehicles);
        self.flow_rate = flow_rate(traffic_density);
        self.congestion_level = CongestionLevel::from_density(traffic_density);
    }

    /// Resample the decision telemetry after an AI vehicle moved
    pub fn sample_decision(&mut self, rng: &mut impl Rng) {
        self.decisions_per_second = rng.random_range(10.0..15.0);
        self.avg_response_time = rng.random_range(100.0..150.0);
    }

    pub fn record_near_miss(&mut self) {
        self.near_misses += 1;
    }
}

pub fn success_rate(collisions: u32) -> f32 {
    (100.0 - collisions as f32 * 5.0).max(95.0)
}

/// Mean vehicle speed times ten, rounded; zero for an empty world
pub fn average_speed(vehicles: &[Vehicle]) -> i32 {
    if vehicles.is_empty() {
        return 0;
    }
    let total: f32 = vehicles.iter().map(Vehicle::speed).sum();
    (total / vehicles.len() as f32 * 10.0).round() as i32
}

pub fn flow_rate(traffic_density: u32) -> f32 {
    (100.0 - traffic_density as f32 * 5.0).max(50.0)
}

/// Rolling frames-per-second counter over roughly one second windows
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start_ms: Option<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame at `now_ms`. Returns the new fps figure when a window
    /// of at least one second has closed.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;

        let elapsed = now_ms - start;
        if elapsed < 1000.0 {
            return None;
        }

        let fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start_ms = Some(now_ms);
        Some(fps)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
