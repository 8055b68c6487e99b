//! Autonomous Vehicle Traffic Simulation Library
//!
//! A 2D traffic simulation that visualizes simple autonomous-vehicle behavior
//! (waypoint following, sensing, collision avoidance). The engine runs
//! independently of any window and draws onto an abstract surface; a Bevy
//! viewer is available behind the `ui` feature.

pub mod render;
pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
